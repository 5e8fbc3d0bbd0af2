use chrono::{DateTime, Local, Utc};
use prettytable::Table;
use serde::Serialize;

use crate::board::Board;
use crate::departure::{Departure, Station};

const NO_STATION: &str = "❌ Keine Station in der Nähe gefunden";
const NO_DEPARTURES: &str = "Keine Abfahrten gefunden";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text { compact: bool },
    Json,
    Table,
}

/// Renders a fetched board. `now` anchors the relative time labels.
pub fn render(board: &Board, mode: OutputMode, now: DateTime<Utc>) -> Result<String, serde_json::Error> {
    match mode {
        OutputMode::Json => render_json(board),
        OutputMode::Text { compact } => Ok(match board {
            Board::Found { station, departures } => format_departures(station, departures, compact, now),
            Board::NoStation => NO_STATION.to_string(),
        }),
        OutputMode::Table => Ok(match board {
            Board::Found { station, departures } => format_table(station, departures, now),
            Board::NoStation => NO_STATION.to_string(),
        }),
    }
}

/// Relative departure label, e.g. `5 min (+2)`
pub fn format_time(time: DateTime<Utc>, delay: Option<i64>, now: DateTime<Utc>) -> String {
    let minutes = (time - now).num_milliseconds().div_euclid(60_000);

    let mut label = match minutes {
        m if m < 0 => "jetzt".to_string(),
        0 => "< 1 min".to_string(),
        m => format!("{} min", m),
    };

    if let Some(delay) = delay.filter(|d| *d > 0) {
        label.push_str(&format!(" (+{})", delay));
    }

    label
}

fn header(station: &Station) -> String {
    format!("📍 **{}** ({})", station.name, station.place)
}

fn line_label(departure: &Departure) -> String {
    if departure.cancelled {
        format!("~~{}~~ ❌", departure.line)
    } else {
        departure.line.clone()
    }
}

pub fn format_departures(station: &Station, departures: &[Departure], compact: bool, now: DateTime<Utc>) -> String {
    let mut lines = vec![header(station), String::new()];

    if departures.is_empty() {
        lines.push(NO_DEPARTURES.to_string());
        return lines.join("\n");
    }

    for departure in departures {
        let icon = departure.transport_type.icon();
        let time = format_time(departure.time, departure.delay, now);
        let line = line_label(departure);

        if compact {
            lines.push(format!("{} {} → {} ({})", icon, line, departure.destination, time));
        } else {
            let platform = departure
                .platform
                .as_ref()
                .map(|p| format!(" · Gl. {}", p))
                .unwrap_or_default();

            lines.push(format!("{} **{}** → {}", icon, line, departure.destination));
            lines.push(format!("   ⏱ {}{}", time, platform));
        }
    }

    lines.join("\n")
}

fn format_table(station: &Station, departures: &[Departure], now: DateTime<Utc>) -> String {
    if departures.is_empty() {
        return format!("{}\n\n{}", header(station), NO_DEPARTURES);
    }

    let mut table = Table::new();
    table.add_row(row![b->"Typ", b->"Linie", b->"Ziel", b->"Abfahrt", b->"In", b->"Gleis"]);

    for departure in departures {
        let clock = departure.time.with_timezone(&Local).format("%H:%M").to_string();

        table.add_row(row![
            departure.transport_type.display_name(),
            line_label(departure),
            departure.destination,
            clock,
            format_time(departure.time, departure.delay, now),
            departure.platform.as_deref().unwrap_or("")]);
    }

    format!("{}\n\n{}", header(station), table)
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonDocument<'a> {
    Board {
        station: &'a Station,
        departures: &'a [Departure],
    },
    Error {
        error: &'static str,
    },
}

fn render_json(board: &Board) -> Result<String, serde_json::Error> {
    let document = match board {
        Board::Found { station, departures } => JsonDocument::Board { station, departures },
        Board::NoStation => JsonDocument::Error {
            error: "No station found",
        },
    };

    serde_json::to_string_pretty(&document)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use serde_json::Value as JsonValue;

    use super::*;
    use crate::board::tests::marienplatz;
    use crate::departure::TransportType;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn u3(seconds_from_now: i64, delay: Option<i64>) -> Departure {
        let time = now() + Duration::seconds(seconds_from_now);
        Departure {
            transport_type: TransportType::UBahn,
            line: "U3".to_string(),
            destination: "Moosach".to_string(),
            time,
            planned_time: time,
            delay,
            platform: None,
            cancelled: false,
            realtime: true,
        }
    }

    fn found(departures: Vec<Departure>) -> Board {
        Board::Found {
            station: marienplatz(),
            departures,
        }
    }

    #[test]
    fn time_in_the_past_is_now() {
        assert_eq!(format_time(now() - Duration::seconds(1), None, now()), "jetzt");
        assert_eq!(format_time(now() - Duration::minutes(5), None, now()), "jetzt");
    }

    #[test]
    fn time_under_a_minute() {
        assert_eq!(format_time(now(), None, now()), "< 1 min");
        assert_eq!(format_time(now() + Duration::seconds(59), None, now()), "< 1 min");
    }

    #[test]
    fn sub_second_offsets_round_down() {
        let now = Utc.timestamp_opt(1_700_000_000, 500_000_000).unwrap();
        let departed = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(format_time(departed, None, now), "jetzt");

        let soon = Utc.timestamp_millis_opt(1_700_000_060_400).unwrap();
        assert_eq!(format_time(soon, None, now), "< 1 min");

        let in_a_minute = Utc.timestamp_millis_opt(1_700_000_060_500).unwrap();
        assert_eq!(format_time(in_a_minute, None, now), "1 min");
    }

    #[test]
    fn time_in_whole_minutes() {
        assert_eq!(format_time(now() + Duration::seconds(60), None, now()), "1 min");
        assert_eq!(format_time(now() + Duration::seconds(299), None, now()), "4 min");
        assert_eq!(format_time(now() + Duration::seconds(300), None, now()), "5 min");
    }

    #[test]
    fn positive_delay_is_appended() {
        assert_eq!(format_time(now() + Duration::minutes(3), Some(4), now()), "3 min (+4)");
        assert_eq!(format_time(now() - Duration::minutes(1), Some(1), now()), "jetzt (+1)");
        assert_eq!(format_time(now(), Some(2), now()), "< 1 min (+2)");
    }

    #[test]
    fn non_positive_delay_is_omitted() {
        for delay in &[None, Some(0), Some(-3)] {
            let label = format_time(now() + Duration::minutes(7), *delay, now());
            assert_eq!(label, "7 min");
            assert!(!label.contains("(+"));
        }
    }

    #[test]
    fn compact_line_matches_example() {
        let text = render(&found(vec![u3(300, Some(2))]), OutputMode::Text { compact: true }, now()).unwrap();
        assert_eq!(text.lines().last(), Some("🚇 U3 → Moosach (5 min (+2))"));
    }

    #[test]
    fn header_names_station_and_place() {
        let text = render(&found(vec![]), OutputMode::Text { compact: false }, now()).unwrap();
        assert_eq!(text.lines().next(), Some("📍 **Marienplatz** (München)"));
    }

    #[test]
    fn empty_departures_message() {
        for compact in &[true, false] {
            let text = render(&found(vec![]), OutputMode::Text { compact: *compact }, now()).unwrap();
            assert!(text.ends_with("Keine Abfahrten gefunden"));
            assert_eq!(text.lines().count(), 3);
        }
    }

    #[test]
    fn line_count_per_density() {
        let departures = vec![u3(60, None), u3(120, None), u3(600, Some(1))];

        let compact = render(&found(departures.clone()), OutputMode::Text { compact: true }, now()).unwrap();
        assert_eq!(compact.lines().count(), 2 + 3);

        let normal = render(&found(departures), OutputMode::Text { compact: false }, now()).unwrap();
        assert_eq!(normal.lines().count(), 2 + 6);
    }

    #[test]
    fn normal_density_shows_platform_when_present() {
        let mut with_platform = u3(120, None);
        with_platform.platform = Some("2".to_string());

        let text = render(
            &found(vec![with_platform, u3(180, None)]),
            OutputMode::Text { compact: false },
            now(),
        )
        .unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[2], "🚇 **U3** → Moosach");
        assert_eq!(lines[3], "   ⏱ 2 min · Gl. 2");
        assert_eq!(lines[5], "   ⏱ 3 min");
    }

    #[test]
    fn cancelled_departures_are_struck_through() {
        let mut cancelled = u3(240, None);
        cancelled.cancelled = true;

        let compact = render(&found(vec![cancelled.clone()]), OutputMode::Text { compact: true }, now()).unwrap();
        assert!(compact.contains("~~U3~~ ❌"));

        let normal = render(&found(vec![cancelled]), OutputMode::Text { compact: false }, now()).unwrap();
        assert!(normal.contains("**~~U3~~ ❌**"));
    }

    #[test]
    fn unknown_mode_uses_default_icon() {
        let mut other = u3(120, None);
        other.transport_type = TransportType::Unknown;

        let text = render(&found(vec![other]), OutputMode::Text { compact: true }, now()).unwrap();
        assert!(text.lines().last().unwrap().starts_with("🚏 "));
    }

    #[test]
    fn departure_order_is_preserved() {
        let mut late = u3(900, None);
        late.line = "U6".to_string();

        let text = render(&found(vec![late, u3(60, None)]), OutputMode::Text { compact: true }, now()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[2].contains("U6"));
        assert!(lines[3].contains("U3"));
    }

    #[test]
    fn no_station_text() {
        let text = render(&Board::NoStation, OutputMode::Text { compact: false }, now()).unwrap();
        assert_eq!(text, "❌ Keine Station in der Nähe gefunden");
    }

    #[test]
    fn json_document_carries_station_and_departures() {
        let json = render(&found(vec![u3(300, Some(2))]), OutputMode::Json, now()).unwrap();
        let value: JsonValue = serde_json::from_str(&json).unwrap();

        assert_eq!(value["station"]["id"], "de:09162:2");
        assert_eq!(value["station"]["place"], "München");
        assert_eq!(value["departures"][0]["type"], "UBAHN");
        assert_eq!(value["departures"][0]["line"], "U3");
        assert_eq!(value["departures"][0]["time"], 1_700_000_300);
        assert_eq!(value["departures"][0]["delay"], 2);
        assert!(value["departures"][0]["platform"].is_null());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn json_no_station_is_error_document() {
        let json = render(&Board::NoStation, OutputMode::Json, now()).unwrap();
        let value: JsonValue = serde_json::from_str(&json).unwrap();

        assert_eq!(value, serde_json::json!({ "error": "No station found" }));
    }

    #[test]
    fn table_lists_every_departure() {
        let mut cancelled = u3(600, None);
        cancelled.cancelled = true;
        cancelled.platform = Some("1".to_string());

        let text = render(&found(vec![u3(300, Some(2)), cancelled]), OutputMode::Table, now()).unwrap();

        assert!(text.starts_with("📍 **Marienplatz** (München)"));
        assert!(text.contains("Linie"));
        assert!(text.contains("U-Bahn"));
        assert!(text.contains("5 min (+2)"));
        assert!(text.contains("~~U3~~ ❌"));
    }

    #[test]
    fn table_without_departures() {
        let text = render(&found(vec![]), OutputMode::Table, now()).unwrap();
        assert!(text.ends_with("Keine Abfahrten gefunden"));
    }
}
