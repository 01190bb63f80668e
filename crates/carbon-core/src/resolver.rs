//! Nearest airport / port resolution.
//!
//! Lookup order for both hub kinds:
//! 1. curated table within `max_radius_km`, returned at once when closer
//!    than `strong_confidence_km`;
//! 2. geocoder queries built from the place name, filtered by
//!    [`HubNamePatterns`], optionally returning early inside
//!    `geocode_confidence_km`;
//! 3. the nearer of the curated and geocoded hits;
//! 4. the curated table again at `fallback_radius_km`, if the policy has one.

use crate::classify::{airport_patterns, port_patterns, HubNamePatterns};
use crate::hubs::{find_nearest, Hub, HubCandidate, PlaceName, KNOWN_AIRPORTS, KNOWN_PORTS};
use crate::models::{Coordinates, HubKind};
use crate::providers::Geocoder;
use crate::spatial::haversine_distance;
use tracing::debug;

pub const MAX_AIRPORT_DISTANCE_KM: f64 = 200.0;
pub const MAX_PORT_DISTANCE_NEARBY_KM: f64 = 200.0;
pub const MAX_PORT_DISTANCE_INLAND_KM: f64 = 1500.0;

/// Lookup parameters for one hub kind.
#[derive(Debug, Clone)]
pub struct HubPolicy {
    pub kind: HubKind,
    pub hubs: &'static [Hub],
    pub patterns: HubNamePatterns,
    pub max_radius_km: f64,
    /// A curated hit closer than this skips the geocoder.
    pub strong_confidence_km: f64,
    /// A geocoded hit closer than this ends the search.
    pub geocode_confidence_km: Option<f64>,
    /// Curated-only retry radius when nothing was found nearby.
    pub fallback_radius_km: Option<f64>,
    /// Geocoder queries; `{city}` is replaced with the parsed city.
    pub queries: &'static [&'static str],
}

impl HubPolicy {
    pub fn airport() -> Self {
        Self {
            kind: HubKind::Airport,
            hubs: KNOWN_AIRPORTS,
            patterns: airport_patterns().clone(),
            max_radius_km: MAX_AIRPORT_DISTANCE_KM,
            strong_confidence_km: 100.0,
            geocode_confidence_km: Some(50.0),
            fallback_radius_km: None,
            queries: &[
                "{city} International Airport",
                "{city} Airport",
                "International Airport",
            ],
        }
    }

    /// Any curated port inside the nearby radius is trusted outright.
    pub fn port() -> Self {
        Self {
            kind: HubKind::Port,
            hubs: KNOWN_PORTS,
            patterns: port_patterns().clone(),
            max_radius_km: MAX_PORT_DISTANCE_NEARBY_KM,
            strong_confidence_km: f64::INFINITY,
            geocode_confidence_km: None,
            fallback_radius_km: Some(MAX_PORT_DISTANCE_INLAND_KM),
            queries: &["{city} Port", "Port of {city}", "{city} Seaport"],
        }
    }
}

pub struct WaypointResolver<G> {
    geocoder: G,
    airport: HubPolicy,
    port: HubPolicy,
}

impl<G: Geocoder> WaypointResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self::with_policies(geocoder, HubPolicy::airport(), HubPolicy::port())
    }

    pub fn with_policies(geocoder: G, airport: HubPolicy, port: HubPolicy) -> Self {
        Self {
            geocoder,
            airport,
            port,
        }
    }

    pub fn into_geocoder(self) -> G {
        self.geocoder
    }

    pub fn policy(&self, kind: HubKind) -> &HubPolicy {
        match kind {
            HubKind::Airport => &self.airport,
            HubKind::Port => &self.port,
        }
    }

    pub async fn find_nearest_airport(
        &self,
        location: Coordinates,
        location_name: &str,
    ) -> Option<HubCandidate> {
        self.find_nearest(HubKind::Airport, location, location_name).await
    }

    pub async fn find_nearest_port(
        &self,
        location: Coordinates,
        location_name: &str,
    ) -> Option<HubCandidate> {
        self.find_nearest(HubKind::Port, location, location_name).await
    }

    pub async fn find_nearest(
        &self,
        kind: HubKind,
        location: Coordinates,
        location_name: &str,
    ) -> Option<HubCandidate> {
        let policy = self.policy(kind);

        let curated = find_nearest(policy.hubs, location, policy.max_radius_km);
        if let Some(hub) = curated.as_ref() {
            if hub.distance_km < policy.strong_confidence_km {
                debug!(kind = kind.as_str(), hub = %hub.name, distance_km = hub.distance_km, "curated hub accepted");
                return curated;
            }
        }

        let geocoded = match self.search_geocoder(policy, location, location_name).await {
            GeocodeOutcome::Confident(hit) => return Some(hit),
            GeocodeOutcome::Best(hit) => hit,
        };

        let nearest = match (curated, geocoded) {
            (Some(c), Some(g)) => Some(if c.distance_km <= g.distance_km { c } else { g }),
            (c, g) => c.or(g),
        };
        if nearest.is_some() {
            return nearest;
        }

        let radius = policy.fallback_radius_km?;
        let fallback = find_nearest(policy.hubs, location, radius);
        if let Some(hub) = fallback.as_ref() {
            debug!(kind = kind.as_str(), hub = %hub.name, distance_km = hub.distance_km, "using distant fallback hub");
        }
        fallback
    }

    async fn search_geocoder(
        &self,
        policy: &HubPolicy,
        location: Coordinates,
        location_name: &str,
    ) -> GeocodeOutcome {
        let place = PlaceName::parse(location_name);
        let mut best: Option<HubCandidate> = None;

        for template in policy.queries {
            let query = template.replace("{city}", place.city);
            let results = self
                .geocoder
                .search(&query, Some(location), place.country_code)
                .await;

            for result in results {
                if !policy.patterns.matches(&result.name, &result.full_name) {
                    continue;
                }
                let distance_km = haversine_distance(location, result.coordinates);
                if distance_km > policy.max_radius_km {
                    continue;
                }
                if best.as_ref().is_some_and(|b| distance_km >= b.distance_km) {
                    continue;
                }
                let candidate = HubCandidate {
                    name: result.name,
                    full_name: result.full_name,
                    coordinates: result.coordinates,
                    distance_km,
                };
                if policy
                    .geocode_confidence_km
                    .is_some_and(|limit| distance_km < limit)
                {
                    debug!(kind = policy.kind.as_str(), hub = %candidate.name, query = %query, "geocoded hub accepted");
                    return GeocodeOutcome::Confident(candidate);
                }
                best = Some(candidate);
            }
        }
        GeocodeOutcome::Best(best)
    }
}

enum GeocodeOutcome {
    Confident(HubCandidate),
    Best(Option<HubCandidate>),
}
