//! Capability interfaces for external geocoding and road routing.
//!
//! Both capabilities report unavailability as an empty result or `None`,
//! never as an error; callers always have a geometric fallback.

use crate::models::Coordinates;
use std::future::Future;

/// A single geocoding hit.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub name: String,
    pub full_name: String,
    pub coordinates: Coordinates,
    pub place_type: Vec<String>,
}

/// Free-text place search with proximity and country biasing.
pub trait Geocoder: Send + Sync {
    fn search(
        &self,
        query: &str,
        proximity: Option<Coordinates>,
        country: Option<&str>,
    ) -> impl Future<Output = Vec<GeocodeResult>> + Send;
}

/// A road route between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadRoute {
    pub distance_km: f64,
    pub duration_hours: f64,
    /// `[lon, lat]` pairs.
    pub geometry: Vec<[f64; 2]>,
}

pub trait RoadRouter: Send + Sync {
    fn route(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> impl Future<Output = Option<RoadRoute>> + Send;
}

/// Provider used when no external service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl Geocoder for Offline {
    async fn search(
        &self,
        _query: &str,
        _proximity: Option<Coordinates>,
        _country: Option<&str>,
    ) -> Vec<GeocodeResult> {
        Vec::new()
    }
}

impl RoadRouter for Offline {
    async fn route(&self, _from: Coordinates, _to: Coordinates) -> Option<RoadRoute> {
        None
    }
}
