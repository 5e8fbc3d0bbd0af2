use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transport modes reported by the MVG API
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransportType {
    #[serde(rename = "UBAHN")]
    UBahn,
    #[serde(rename = "SBAHN")]
    SBahn,
    #[serde(rename = "BUS")]
    Bus,
    #[serde(rename = "TRAM")]
    Tram,
    #[serde(rename = "REGIONAL_BUS")]
    RegionalBus,
    #[serde(rename = "BAHN")]
    Bahn,
    #[serde(rename = "SCHIFF")]
    Schiff,
    #[serde(rename = "UNKNOWN", other)]
    Unknown,
}

impl TransportType {
    /// Modes requested when no filter is given
    pub const REQUESTABLE: [TransportType; 7] = [
        TransportType::UBahn,
        TransportType::SBahn,
        TransportType::Bus,
        TransportType::Tram,
        TransportType::RegionalBus,
        TransportType::Bahn,
        TransportType::Schiff,
    ];

    /// Maps a user supplied filter code, already upper-cased
    pub fn from_code(code: &str) -> Option<TransportType> {
        match code {
            "U" | "UBAHN" => Some(TransportType::UBahn),
            "S" | "SBAHN" => Some(TransportType::SBahn),
            "BUS" => Some(TransportType::Bus),
            "TRAM" => Some(TransportType::Tram),
            "REGIONAL" => Some(TransportType::RegionalBus),
            _ => None,
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            TransportType::UBahn => "UBAHN",
            TransportType::SBahn => "SBAHN",
            TransportType::Bus => "BUS",
            TransportType::Tram => "TRAM",
            TransportType::RegionalBus => "REGIONAL_BUS",
            TransportType::Bahn => "BAHN",
            TransportType::Schiff => "SCHIFF",
            TransportType::Unknown => "UNKNOWN",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            TransportType::UBahn => "🚇",
            TransportType::SBahn => "🚆",
            TransportType::Bus => "🚌",
            TransportType::Tram => "🚃",
            TransportType::RegionalBus => "🚐",
            TransportType::Bahn => "🚄",
            TransportType::Schiff => "⛴️",
            TransportType::Unknown => "🚏",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TransportType::UBahn => "U-Bahn",
            TransportType::SBahn => "S-Bahn",
            TransportType::Bus => "Bus",
            TransportType::Tram => "Tram",
            TransportType::RegionalBus => "Regionalbus",
            TransportType::Bahn => "Bahn",
            TransportType::Schiff => "Schiff",
            TransportType::Unknown => "Sonstige",
        }
    }
}

/// Set of modes restricting the departure request; empty means unrestricted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportTypeFilter(BTreeSet<TransportType>);

impl TransportTypeFilter {
    /// Parses a comma separated list such as `U,s, tram`. Unknown codes are dropped.
    pub fn parse(csv: &str) -> TransportTypeFilter {
        let mut types = BTreeSet::new();

        for code in csv.split(',').map(|c| c.trim().to_uppercase()) {
            match TransportType::from_code(&code) {
                Some(transport_type) => {
                    types.insert(transport_type);
                }
                None if code.is_empty() => {}
                None => tracing::debug!(%code, "ignoring unknown transport type"),
            }
        }

        TransportTypeFilter(types)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, transport_type: TransportType) -> bool {
        self.0.contains(&transport_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = TransportType> + '_ {
        self.0.iter().copied()
    }

    /// Value of the `transportTypes` query parameter
    pub fn query_value(&self) -> String {
        let names: Vec<&str> = if self.is_empty() {
            TransportType::REQUESTABLE.iter().map(|t| t.wire_name()).collect()
        } else {
            self.iter().map(TransportType::wire_name).collect()
        };

        names.join(",")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub place: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Departure {
    #[serde(rename = "type")]
    pub transport_type: TransportType,
    pub line: String,
    pub destination: String,
    /// Realtime departure instant
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time: DateTime<Utc>,
    #[serde(rename = "planned", with = "chrono::serde::ts_seconds")]
    pub planned_time: DateTime<Utc>,
    /// Minutes behind schedule, absent when the provider has no realtime data
    pub delay: Option<i64>,
    pub platform: Option<String>,
    pub cancelled: bool,
    pub realtime: bool,
}

/// Parameters of a departure request
#[derive(Debug, Clone)]
pub struct DepartureQuery {
    pub limit: u32,
    pub offset_minutes: i32,
    pub types: TransportTypeFilter,
}

impl Default for DepartureQuery {
    fn default() -> Self {
        Self {
            limit: 8,
            offset_minutes: 0,
            types: TransportTypeFilter::default(),
        }
    }
}
