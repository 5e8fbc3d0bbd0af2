//! MVG API client
//!
//! Talks to the `bgw-pt/v3` endpoints used by mvg.de: `stations/nearby` for
//! the coordinate lookup and `departures` for the station board.

use std::convert::TryFrom;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::departure::{Departure, DepartureQuery, Station, TransportType};
use crate::error::TransitError;

/// The two lookups the departure board needs from a transit provider
pub trait TransitClient {
    /// Nearest station to the coordinate, `None` when the provider knows none
    fn nearest_station(&self, latitude: f64, longitude: f64) -> Result<Option<Station>, TransitError>;

    /// Upcoming departures at `station_id`, in provider order
    fn departures(&self, station_id: &str, query: &DepartureQuery) -> Result<Vec<Departure>, TransitError>;
}

#[derive(Debug)]
pub struct MvgClient {
    client: Client,
    base_url: String,
}

impl MvgClient {
    pub fn new(config: &ClientConfig) -> Result<Self, TransitError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Response, TransitError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, ?params, "GET");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(params)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TransitError::Api { status, body });
        }

        Ok(response)
    }
}

impl TransitClient for MvgClient {
    #[instrument(skip(self))]
    fn nearest_station(&self, latitude: f64, longitude: f64) -> Result<Option<Station>, TransitError> {
        let params = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
        ];

        let stations = self.get("stations/nearby", &params)?.json::<Vec<RawStation>>()?;
        debug!(count = stations.len(), "stations nearby");

        Ok(stations.into_iter().next().map(Station::from))
    }

    #[instrument(skip(self, query), fields(limit = query.limit, offset = query.offset_minutes))]
    fn departures(&self, station_id: &str, query: &DepartureQuery) -> Result<Vec<Departure>, TransitError> {
        let params = [
            ("globalId", station_id.to_string()),
            ("limit", query.limit.to_string()),
            ("offsetInMinutes", query.offset_minutes.to_string()),
            ("transportTypes", query.types.query_value()),
        ];

        let raw = self.get("departures", &params)?.json::<Vec<RawDeparture>>()?;
        debug!(count = raw.len(), "departures received");

        raw.into_iter().map(Departure::try_from).collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStation {
    global_id: String,
    name: String,
    #[serde(default)]
    place: String,
    latitude: f64,
    longitude: f64,
}

impl From<RawStation> for Station {
    fn from(raw: RawStation) -> Self {
        Station {
            id: raw.global_id,
            name: raw.name,
            place: raw.place,
            latitude: raw.latitude,
            longitude: raw.longitude,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPlatform {
    Number(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDeparture {
    planned_departure_time: i64,
    realtime_departure_time: Option<i64>,
    delay_in_minutes: Option<i64>,
    #[serde(default)]
    realtime: bool,
    transport_type: TransportType,
    label: String,
    destination: String,
    #[serde(default)]
    cancelled: bool,
    platform: Option<RawPlatform>,
}

fn instant(millis: i64) -> Result<DateTime<Utc>, TransitError> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or(TransitError::InvalidTimestamp(millis))
}

impl TryFrom<RawDeparture> for Departure {
    type Error = TransitError;

    fn try_from(raw: RawDeparture) -> Result<Self, Self::Error> {
        let planned_time = instant(raw.planned_departure_time)?;
        let time = match raw.realtime_departure_time {
            Some(millis) => instant(millis)?,
            None => planned_time,
        };

        let platform = match raw.platform {
            Some(RawPlatform::Number(n)) => Some(n.to_string()),
            Some(RawPlatform::Text(s)) if !s.is_empty() => Some(s),
            _ => None,
        };

        Ok(Departure {
            transport_type: raw.transport_type,
            line: raw.label,
            destination: raw.destination,
            time,
            planned_time,
            delay: raw.delay_in_minutes,
            platform,
            cancelled: raw.cancelled,
            realtime: raw.realtime,
        })
    }
}
