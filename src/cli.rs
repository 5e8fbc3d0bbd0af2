use clap::{value_t, App, AppSettings, Arg, ArgMatches};

use crate::config::DEFAULT_BASE_URL;
use crate::departure::{DepartureQuery, TransportTypeFilter};
use crate::render::OutputMode;

/// Validated command line options
#[derive(Debug, Clone)]
pub struct Options {
    pub latitude: f64,
    pub longitude: f64,
    pub query: DepartureQuery,
    pub mode: OutputMode,
    pub verbosity: u64,
    pub api_base: String,
}

pub fn app() -> App<'static, 'static> {
    App::new("mvg-departures")
        .version("0.1.0")
        .about("Shows upcoming MVG departures at the station nearest to a coordinate")
        .setting(AppSettings::AllowNegativeNumbers)
        .arg(Arg::with_name("lat")
            .required(true)
            .index(1)
            .help("Latitude"))
        .arg(Arg::with_name("lng")
            .required(true)
            .index(2)
            .help("Longitude"))
        .arg(Arg::with_name("limit")
            .short("l")
            .long("limit")
            .takes_value(true)
            .default_value("8")
            .help("Max departures"))
        .arg(Arg::with_name("offset")
            .short("o")
            .long("offset")
            .takes_value(true)
            .allow_hyphen_values(true)
            .default_value("0")
            .help("Walking time offset in minutes"))
        .arg(Arg::with_name("types")
            .short("t")
            .long("types")
            .takes_value(true)
            .help("Filter by types: U,S,BUS,TRAM,REGIONAL (comma-separated)"))
        .arg(Arg::with_name("compact")
            .short("c")
            .long("compact")
            .help("Compact output"))
        .arg(Arg::with_name("json")
            .short("j")
            .long("json")
            .conflicts_with("table")
            .help("Output raw JSON"))
        .arg(Arg::with_name("table")
            .long("table")
            .conflicts_with("compact")
            .help("Output departures as a table"))
        .arg(Arg::with_name("verbose")
            .short("v")
            .long("verbose")
            .multiple(true)
            .help("Log more details to stderr (-v info, -vv debug)"))
        .arg(Arg::with_name("api-base")
            .long("api-base")
            .takes_value(true)
            .default_value(DEFAULT_BASE_URL)
            .help("Base URL of the MVG API"))
}

pub fn parse_from<I, T>(args: I) -> Result<Options, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = app().get_matches_from_safe(args)?;
    options(&matches)
}

fn options(matches: &ArgMatches) -> Result<Options, clap::Error> {
    let latitude = value_t!(matches, "lat", f64)?;
    let longitude = value_t!(matches, "lng", f64)?;
    let limit = value_t!(matches, "limit", u32)?;
    let offset_minutes = value_t!(matches, "offset", i32)?;

    let types = matches
        .value_of("types")
        .map(TransportTypeFilter::parse)
        .unwrap_or_default();

    let mode = if matches.is_present("json") {
        OutputMode::Json
    } else if matches.is_present("table") {
        OutputMode::Table
    } else {
        OutputMode::Text {
            compact: matches.is_present("compact"),
        }
    };

    Ok(Options {
        latitude,
        longitude,
        query: DepartureQuery {
            limit,
            offset_minutes,
            types,
        },
        mode,
        verbosity: matches.occurrences_of("verbose"),
        api_base: matches.value_of("api-base").unwrap_or(DEFAULT_BASE_URL).to_string(),
    })
}
