//! Mapbox HTTP client.

use anyhow::{Context, Result};
use carbon_core::{Coordinates, GeocodeResult, Geocoder, RoadRoute, RoadRouter};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";
const GEOCODING_LIMIT: &str = "5";

#[derive(Debug, Error)]
pub enum MapboxError {
    #[error("invalid Mapbox base URL '{0}'")]
    InvalidBaseUrl(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Client settings; an empty token leaves both capabilities unavailable.
#[derive(Debug, Clone)]
pub struct MapboxConfig {
    pub access_token: String,
    pub base_url: String,
    pub geocoding_timeout: Duration,
    pub directions_timeout: Duration,
}

impl MapboxConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            geocoding_timeout: Duration::from_secs(15),
            directions_timeout: Duration::from_secs(30),
        }
    }
}

/// Geocoding and driving directions backed by the Mapbox REST APIs.
#[derive(Debug, Clone)]
pub struct MapboxClient {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
    geocoding_timeout: Duration,
    directions_timeout: Duration,
}

impl MapboxClient {
    pub fn new(config: MapboxConfig) -> Result<Self, MapboxError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|_| MapboxError::InvalidBaseUrl(config.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(MapboxError::InvalidBaseUrl(config.base_url));
        }
        let access_token = Some(config.access_token.trim().to_string()).filter(|t| !t.is_empty());

        Ok(Self {
            client: Client::builder().build()?,
            base_url,
            access_token,
            geocoding_timeout: config.geocoding_timeout,
            directions_timeout: config.directions_timeout,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.access_token.is_some()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn geocoding_url(
        &self,
        query: &str,
        proximity: Option<Coordinates>,
        country: Option<&str>,
        token: &str,
    ) -> Url {
        let mut url = self.endpoint(&[
            "geocoding",
            "v5",
            "mapbox.places",
            &format!("{query}.json"),
        ]);
        {
            let mut params = url.query_pairs_mut();
            params
                .append_pair("access_token", token)
                .append_pair("limit", GEOCODING_LIMIT);
            if let Some(near) = proximity {
                params.append_pair(
                    "proximity",
                    &format!("{},{}", near.longitude, near.latitude),
                );
            }
            if let Some(country) = country.filter(|c| !c.is_empty()) {
                params.append_pair("country", country);
            }
        }
        url
    }

    pub(crate) fn directions_url(&self, from: Coordinates, to: Coordinates, token: &str) -> Url {
        let coords = format!(
            "{},{};{},{}",
            from.longitude, from.latitude, to.longitude, to.latitude
        );
        let mut url = self.endpoint(&["directions", "v5", "mapbox", "driving", &coords]);
        url.query_pairs_mut()
            .append_pair("access_token", token)
            .append_pair("geometries", "geojson")
            .append_pair("overview", "full");
        url
    }

    /// Raw geocoding call. Use the [`Geocoder`] impl for the
    /// degrade-to-empty behaviour.
    pub async fn geocode(
        &self,
        query: &str,
        proximity: Option<Coordinates>,
        country: Option<&str>,
    ) -> Result<Vec<GeocodeResult>> {
        let Some(token) = self.access_token.as_deref() else {
            return Ok(Vec::new());
        };
        let url = self.geocoding_url(query, proximity, country, token);

        let response = self
            .client
            .get(url)
            .timeout(self.geocoding_timeout)
            .send()
            .await
            .context("Failed to reach Mapbox geocoding")?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("Mapbox geocoding returned {}", status));
        }
        let payload: GeocodingResponse = response
            .json()
            .await
            .context("Failed to parse Mapbox geocoding response")?;
        Ok(parse_geocoding(payload))
    }

    /// Raw directions call; `Ok(None)` when Mapbox found no route.
    pub async fn directions(&self, from: Coordinates, to: Coordinates) -> Result<Option<RoadRoute>> {
        let Some(token) = self.access_token.as_deref() else {
            return Ok(None);
        };
        let url = self.directions_url(from, to, token);

        let response = self
            .client
            .get(url)
            .timeout(self.directions_timeout)
            .send()
            .await
            .context("Failed to reach Mapbox directions")?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("Mapbox directions returned {}", status));
        }
        let payload: DirectionsResponse = response
            .json()
            .await
            .context("Failed to parse Mapbox directions response")?;
        Ok(parse_directions(payload))
    }
}

impl Geocoder for MapboxClient {
    async fn search(
        &self,
        query: &str,
        proximity: Option<Coordinates>,
        country: Option<&str>,
    ) -> Vec<GeocodeResult> {
        match self.geocode(query, proximity, country).await {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!(query, "Geocoding unavailable: {:#}", err);
                Vec::new()
            }
        }
    }
}

impl RoadRouter for MapboxClient {
    async fn route(&self, from: Coordinates, to: Coordinates) -> Option<RoadRoute> {
        match self.directions(from, to).await {
            Ok(route) => route,
            Err(err) => {
                tracing::warn!("Directions unavailable: {:#}", err);
                None
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GeocodingResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    text: Option<String>,
    place_name: Option<String>,
    #[serde(default)]
    place_type: Vec<String>,
    geometry: Option<PointGeometry>,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DirectionsResponse {
    code: Option<String>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    /// Metres.
    #[serde(default)]
    distance: f64,
    /// Seconds.
    #[serde(default)]
    duration: f64,
    geometry: Option<LineGeometry>,
}

#[derive(Debug, Deserialize)]
struct LineGeometry {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

pub(crate) fn parse_geocoding(payload: GeocodingResponse) -> Vec<GeocodeResult> {
    payload
        .features
        .into_iter()
        .filter_map(|feature| {
            let coords = feature.geometry?.coordinates;
            if coords.len() < 2 {
                return None;
            }
            Some(GeocodeResult {
                name: feature.text.unwrap_or_else(|| "Unknown".to_string()),
                full_name: feature.place_name.unwrap_or_default(),
                coordinates: Coordinates::new(coords[1], coords[0]),
                place_type: feature.place_type,
            })
        })
        .collect()
}

pub(crate) fn parse_directions(payload: DirectionsResponse) -> Option<RoadRoute> {
    if payload.code.as_deref() != Some("Ok") {
        return None;
    }
    let route = payload.routes.into_iter().next()?;
    Some(RoadRoute {
        distance_km: route.distance / 1000.0,
        duration_hours: route.duration / 3600.0,
        geometry: route.geometry.map(|g| g.coordinates).unwrap_or_default(),
    })
}
