//! Compute multi-modal routes between two points and print them as JSON.

use anyhow::{Context, Result};
use carbon_cli::parse_coordinates;
use carbon_core::{
    Coordinates, Geocoder, Offline, RoadRouter, RouteRequest, RouteSynthesizer, TransportMode,
};
use carbon_mapbox::{MapboxClient, MapboxConfig};
use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Compute land, sea and air routes with CO2 estimates
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Origin as LAT,LON
    #[arg(long, value_parser = parse_coordinates, allow_hyphen_values = true)]
    origin: Coordinates,

    /// Origin place name, e.g. "Mumbai, India"
    #[arg(long)]
    origin_name: String,

    /// Destination as LAT,LON
    #[arg(long, value_parser = parse_coordinates, allow_hyphen_values = true)]
    destination: Coordinates,

    /// Destination place name
    #[arg(long)]
    destination_name: String,

    /// Cargo weight in kilograms
    #[arg(long)]
    weight: f64,

    /// Compute a single mode instead of the full analysis
    #[arg(long, value_parser = parse_mode)]
    mode: Option<TransportMode>,

    /// Mapbox token; without one, routes use geometric estimates
    #[arg(long, env = "MAPBOX_ACCESS_TOKEN", hide_env_values = true)]
    mapbox_token: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn parse_mode(value: &str) -> Result<TransportMode, String> {
    value.parse().map_err(|e: carbon_core::CoreError| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let request = RouteRequest {
        origin_name: args.origin_name.clone(),
        origin_coordinates: args.origin,
        destination_name: args.destination_name.clone(),
        destination_coordinates: args.destination,
        weight_kg: args.weight,
    };

    let token = args
        .mapbox_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let output = match token {
        Some(token) => {
            let client = MapboxClient::new(MapboxConfig::new(token))
                .context("building Mapbox client")?;
            compute(RouteSynthesizer::new(client.clone(), client), &request, args.mode).await?
        }
        None => {
            tracing::info!("No Mapbox token; using geometric estimates");
            compute(RouteSynthesizer::new(Offline, Offline), &request, args.mode).await?
        }
    };

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);
    Ok(())
}

async fn compute<G: Geocoder, R: RoadRouter>(
    synthesizer: RouteSynthesizer<G, R>,
    request: &RouteRequest,
    mode: Option<TransportMode>,
) -> Result<Value> {
    let value = match mode {
        Some(mode) => serde_json::to_value(
            synthesizer
                .compute_mode_route(mode, request)
                .await
                .with_context(|| format!("computing {mode} route"))?,
        )?,
        None => serde_json::to_value(
            synthesizer
                .compute_all_routes(request)
                .await
                .context("computing routes")?,
        )?,
    };
    Ok(value)
}
