//! Core data models for route synthesis and emission estimates.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum cargo weight accepted by a route request, in kilograms.
pub const MAX_WEIGHT_KG: f64 = 1_000_000.0;
/// Maximum length of a location name in a route request.
pub const MAX_NAME_LEN: usize = 200;

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both components are finite and inside their valid ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// GeoJSON ordering: `[lon, lat]`.
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// Supported transport modes for cargo movement.
///
/// The mode order, the average speed table and the default emission factor
/// table live together here so that adding a mode touches one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Land,
    Sea,
    Air,
}

impl TransportMode {
    /// Fixed precedence used for listing and tie-breaking.
    pub const ALL: [TransportMode; 3] = [TransportMode::Land, TransportMode::Sea, TransportMode::Air];

    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Land => "land",
            TransportMode::Sea => "sea",
            TransportMode::Air => "air",
        }
    }

    /// Average cruising speed in km/h.
    pub fn average_speed_kmh(self) -> f64 {
        match self {
            TransportMode::Land => 60.0,
            TransportMode::Sea => 30.0,
            TransportMode::Air => 800.0,
        }
    }

    /// Default emission factor in kg CO2 per tonne-km.
    pub fn default_emission_factor(self) -> f64 {
        match self {
            TransportMode::Land => 0.062,
            TransportMode::Sea => 0.016,
            TransportMode::Air => 0.602,
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "land" => Ok(TransportMode::Land),
            "sea" => Ok(TransportMode::Sea),
            "air" => Ok(TransportMode::Air),
            other => Err(CoreError::InvalidInput(format!(
                "unknown transport mode '{other}'"
            ))),
        }
    }
}

/// Kind of intermediate hub a multi-modal route passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HubKind {
    Airport,
    Port,
}

impl HubKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HubKind::Airport => "airport",
            HubKind::Port => "port",
        }
    }
}

/// A single leg of a multi-modal route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub mode: TransportMode,
    pub from_name: String,
    pub from_coordinates: Coordinates,
    pub to_name: String,
    pub to_coordinates: Coordinates,
    pub distance_km: f64,
    pub duration_hours: f64,
    pub emission_kg_co2: f64,
    /// Ordered `[lon, lat]` pairs.
    pub geometry: Vec<[f64; 2]>,
}

/// An airport or port visited by a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: HubKind,
    pub coordinates: Coordinates,
}

/// A complete route for one primary transport mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiModalRoute {
    pub segments: Vec<RouteSegment>,
    pub total_distance_km: f64,
    pub total_duration_hours: f64,
    pub total_emission_kg_co2: f64,
    pub transport_mode: TransportMode,
    pub is_viable: bool,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub not_viable_reason: Option<String>,
}

impl MultiModalRoute {
    /// A route that cannot be served by `mode`. Totals are zero and no
    /// segments or waypoints are attached.
    pub fn not_viable(mode: TransportMode, reason: impl Into<String>) -> Self {
        Self {
            segments: Vec::new(),
            total_distance_km: 0.0,
            total_duration_hours: 0.0,
            total_emission_kg_co2: 0.0,
            transport_mode: mode,
            is_viable: false,
            waypoints: Vec::new(),
            not_viable_reason: Some(reason.into()),
        }
    }

    /// Concatenated geometry of all segments, in traversal order.
    pub fn combined_geometry(&self) -> Vec<[f64; 2]> {
        let len = self.segments.iter().map(|s| s.geometry.len()).sum();
        let mut coords = Vec::with_capacity(len);
        for segment in &self.segments {
            coords.extend_from_slice(&segment.geometry);
        }
        coords
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteType {
    Shortest,
    Efficient,
}

/// Summary of a selected route, ready for map rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub distance_km: f64,
    pub duration_hours: Option<f64>,
    #[serde(default)]
    pub geometry: Vec<[f64; 2]>,
    pub emission_kg_co2: f64,
    pub route_type: RouteType,
    pub transport_mode: TransportMode,
}

impl RouteInfo {
    pub fn from_route(route: &MultiModalRoute, route_type: RouteType) -> Self {
        Self {
            distance_km: route.total_distance_km,
            duration_hours: Some(route.total_duration_hours),
            geometry: route.combined_geometry(),
            emission_kg_co2: route.total_emission_kg_co2,
            route_type,
            transport_mode: route.transport_mode,
        }
    }

    /// Copy without geometry, for compact storage.
    pub fn without_geometry(&self) -> Self {
        Self {
            geometry: Vec::new(),
            ..self.clone()
        }
    }
}

/// Per-mode comparison row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeComparison {
    pub transport_mode: TransportMode,
    pub distance_km: f64,
    pub duration_hours: f64,
    pub emission_kg_co2: f64,
    pub is_shortest: bool,
    pub is_most_efficient: bool,
    pub is_viable: bool,
    #[serde(default)]
    pub not_viable_reason: Option<String>,
}

/// Input to route synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin_name: String,
    pub origin_coordinates: Coordinates,
    pub destination_name: String,
    pub destination_coordinates: Coordinates,
    pub weight_kg: f64,
}

impl RouteRequest {
    /// Reject structurally invalid input before any provider is called.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name("origin_name", &self.origin_name)?;
        validate_name("destination_name", &self.destination_name)?;
        if !self.origin_coordinates.is_valid() {
            return Err(CoreError::InvalidInput(
                "origin_coordinates out of range".to_string(),
            ));
        }
        if !self.destination_coordinates.is_valid() {
            return Err(CoreError::InvalidInput(
                "destination_coordinates out of range".to_string(),
            ));
        }
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(CoreError::InvalidInput(
                "weight_kg must be greater than zero".to_string(),
            ));
        }
        if self.weight_kg > MAX_WEIGHT_KG {
            return Err(CoreError::InvalidInput(format!(
                "weight_kg must not exceed {MAX_WEIGHT_KG}"
            )));
        }
        Ok(())
    }
}

fn validate_name(field: &str, value: &str) -> Result<(), CoreError> {
    let len = value.trim().chars().count();
    if len == 0 || value.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::InvalidInput(format!(
            "{field} must be between 1 and {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Everything computed for one route request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAnalysis {
    pub shortest_route: RouteInfo,
    pub efficient_route: RouteInfo,
    pub mode_comparison: Vec<ModeComparison>,
    /// All mode routes in `TransportMode::ALL` order.
    pub detailed_routes: Vec<MultiModalRoute>,
}
