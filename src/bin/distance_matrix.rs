//! distance-matrix: query the Distance Matrix API from the command line
//!
//! Usage:
//!   distance-matrix <origins> <destinations>
//!
//! Places are separated by `|`; a place of the form `<lat>,<lng>` is sent as
//! coordinates, anything else as an address. Configuration is read from
//! `DISTANCE_MATRIX_*` environment variables, logging from `RUST_LOG`.

use anyhow::{bail, Context};
use distance_matrix::configuration::ENV_PREFIX;
use distance_matrix::{Configuration, DistanceMatrixClient, Place};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("help" | "--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some("version" | "--version" | "-V") => {
            println!("distance-matrix {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }
    if args.len() != 3 {
        print_usage();
        bail!("expected exactly two arguments, got {}", args.len().saturating_sub(1));
    }

    let config = Configuration::from_env();
    let errors = config.errors();
    if !errors.is_empty() {
        bail!("invalid configuration: {}", errors);
    }

    let origins = parse_places(&args[1]);
    let destinations = parse_places(&args[2]);
    let client = DistanceMatrixClient::new(config);
    let body = client
        .fetch_json(&origins, &destinations)
        .await
        .context("distance matrix request failed")?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn print_usage() {
    eprintln!(
        r#"distance-matrix: Distance Matrix API client

USAGE:
    distance-matrix <ORIGINS> <DESTINATIONS>

    Places are separated by '|'. "59.91,10.75" is a coordinate pair,
    anything else is an address.

ENVIRONMENT:
    {prefix}GOOGLE_API_KEY      API key
    {prefix}MODE                driving | walking | bicycling | transit
    {prefix}<ATTRIBUTE>         any other configuration attribute
    RUST_LOG                    log filter (e.g. distance_matrix=debug)"#,
        prefix = ENV_PREFIX
    );
}

fn parse_places(arg: &str) -> Vec<Place> {
    arg.split('|')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(parse_place)
        .collect()
}

fn parse_place(token: &str) -> Place {
    if let Some((lat, lng)) = token.split_once(',') {
        if let (Ok(lat), Ok(lng)) = (lat.trim().parse::<f64>(), lng.trim().parse::<f64>()) {
            return Place::lat_lng(lat, lng);
        }
    }
    Place::address(token)
}
