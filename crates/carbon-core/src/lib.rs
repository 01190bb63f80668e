//! Domain core for multi-modal freight routing and carbon estimates.

pub mod classify;
pub mod emission;
pub mod error;
pub mod hubs;
pub mod models;
pub mod providers;
pub mod resolver;
pub mod spatial;
pub mod synthesis;

pub use classify::HubNamePatterns;
pub use emission::{
    EmissionCalculator, EmissionComparison, EmissionFactorInfo, EmissionFactors, EmissionResult,
};
pub use error::CoreError;
pub use hubs::{Hub, HubCandidate};
pub use models::{
    Coordinates, HubKind, ModeComparison, MultiModalRoute, RouteAnalysis, RouteInfo, RouteRequest,
    RouteSegment, RouteType, TransportMode, Waypoint,
};
pub use providers::{GeocodeResult, Geocoder, Offline, RoadRoute, RoadRouter};
pub use resolver::{HubPolicy, WaypointResolver};
pub use spatial::{haversine_distance, interpolate_great_circle};
pub use synthesis::{select_routes, RouteSynthesizer, SynthesisConfig};
