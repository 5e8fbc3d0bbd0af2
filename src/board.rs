use tracing::{info, warn};

use crate::client::TransitClient;
use crate::departure::{Departure, DepartureQuery, Station};
use crate::error::TransitError;

/// Result of one lookup, shared by every output mode
#[derive(Debug, Clone, PartialEq)]
pub enum Board {
    Found {
        station: Station,
        departures: Vec<Departure>,
    },
    NoStation,
}

/// Resolves the nearest station and lists its departures. Each client
/// operation runs at most once.
pub fn fetch_board<C: TransitClient + ?Sized>(
    client: &C,
    latitude: f64,
    longitude: f64,
    query: &DepartureQuery,
) -> Result<Board, TransitError> {
    let station = match client.nearest_station(latitude, longitude)? {
        Some(station) => station,
        None => {
            warn!(latitude, longitude, "no station nearby");
            return Ok(Board::NoStation);
        }
    };
    info!(id = %station.id, name = %station.name, "nearest station");

    let departures = client.departures(&station.id, query)?;
    if departures.is_empty() {
        warn!(id = %station.id, "no departures");
    }

    Ok(Board::Found { station, departures })
}
