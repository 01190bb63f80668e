//! `LAT,LON` argument parsing.

use carbon_core::Coordinates;

/// Parse `"lat,lon"` in decimal degrees. Usable as a clap value parser.
pub fn parse_coordinates(value: &str) -> Result<Coordinates, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON but got '{value}'"))?;
    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let longitude: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lon.trim()))?;

    let coords = Coordinates::new(latitude, longitude);
    if !coords.is_valid() {
        return Err(format!("coordinates out of range: {latitude},{longitude}"));
    }
    Ok(coords)
}
