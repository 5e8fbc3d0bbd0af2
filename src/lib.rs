//! Departure board for the station nearest to a coordinate, backed by the
//! MVG (Münchner Verkehrsgesellschaft) API.

#[macro_use] extern crate prettytable;

pub mod board;
pub mod cli;
pub mod client;
pub mod config;
pub mod departure;
pub mod error;
pub mod render;

pub use board::{fetch_board, Board};
pub use client::{MvgClient, TransitClient};
pub use config::ClientConfig;
pub use departure::{Departure, DepartureQuery, Station, TransportType, TransportTypeFilter};
pub use error::TransitError;
pub use render::{render, OutputMode};
