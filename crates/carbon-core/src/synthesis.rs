//! Multi-modal route synthesis.
//!
//! Land is one road leg. Air and sea share a three-leg shape: road to the
//! origin hub, a trunk leg between hubs, road from the destination hub.
//! Every provider miss degrades to geometry computed here; only malformed
//! input is returned as an error.

use crate::emission::{round_to, EmissionCalculator};
use crate::error::CoreError;
use crate::hubs::{HubCandidate, PlaceName};
use crate::models::{
    Coordinates, HubKind, ModeComparison, MultiModalRoute, RouteAnalysis, RouteInfo, RouteRequest,
    RouteSegment, RouteType, TransportMode, Waypoint,
};
use crate::providers::{Geocoder, RoadRouter};
use crate::resolver::{HubPolicy, WaypointResolver};
use crate::spatial::{haversine_distance, interpolate_great_circle};
use tracing::debug;

/// Tunable constants for route synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisConfig {
    /// Road distance per great-circle km when no road route is available.
    pub road_factor: f64,
    /// Shipping-lane distance per great-circle km between ports.
    pub shipping_factor: f64,
    pub min_flight_distance_km: f64,
    pub flight_overhead_hours: f64,
    pub port_overhead_hours: f64,
    pub land_fallback_points: usize,
    pub access_road_points: usize,
    pub flight_points: usize,
    pub shipping_points: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            road_factor: 1.3,
            shipping_factor: 1.3,
            min_flight_distance_km: 200.0,
            flight_overhead_hours: 1.5,
            port_overhead_hours: 24.0,
            land_fallback_points: 20,
            access_road_points: 10,
            flight_points: 30,
            shipping_points: 40,
        }
    }
}

/// Trunk-leg parameters for a hub-based mode.
struct TrunkProfile {
    mode: TransportMode,
    hub: HubKind,
    distance_factor: f64,
    overhead_hours: f64,
    points: usize,
    min_distance_km: Option<f64>,
}

impl SynthesisConfig {
    fn trunk_profile(&self, mode: TransportMode) -> Option<TrunkProfile> {
        match mode {
            TransportMode::Land => None,
            TransportMode::Air => Some(TrunkProfile {
                mode,
                hub: HubKind::Airport,
                distance_factor: 1.0,
                overhead_hours: self.flight_overhead_hours,
                points: self.flight_points,
                min_distance_km: Some(self.min_flight_distance_km),
            }),
            TransportMode::Sea => Some(TrunkProfile {
                mode,
                hub: HubKind::Port,
                distance_factor: self.shipping_factor,
                overhead_hours: self.port_overhead_hours,
                points: self.shipping_points,
                min_distance_km: None,
            }),
        }
    }
}

/// One leg before emissions and rounding are applied.
struct Leg {
    mode: TransportMode,
    from_name: String,
    from: Coordinates,
    to_name: String,
    to: Coordinates,
    distance_km: f64,
    duration_hours: f64,
    geometry: Vec<[f64; 2]>,
}

pub struct RouteSynthesizer<G, R> {
    resolver: WaypointResolver<G>,
    router: R,
    calculator: EmissionCalculator,
    config: SynthesisConfig,
}

impl<G: Geocoder, R: RoadRouter> RouteSynthesizer<G, R> {
    pub fn new(geocoder: G, router: R) -> Self {
        Self {
            resolver: WaypointResolver::new(geocoder),
            router,
            calculator: EmissionCalculator::default(),
            config: SynthesisConfig::default(),
        }
    }

    pub fn with_calculator(mut self, calculator: EmissionCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn with_config(mut self, config: SynthesisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_policies(self, airport: HubPolicy, port: HubPolicy) -> Self {
        let Self {
            resolver,
            router,
            calculator,
            config,
        } = self;
        Self {
            resolver: WaypointResolver::with_policies(resolver.into_geocoder(), airport, port),
            router,
            calculator,
            config,
        }
    }

    pub fn calculator(&self) -> &EmissionCalculator {
        &self.calculator
    }

    pub fn resolver(&self) -> &WaypointResolver<G> {
        &self.resolver
    }

    /// Compute all three mode routes concurrently and pick the shortest
    /// and most efficient.
    pub async fn compute_all_routes(
        &self,
        request: &RouteRequest,
    ) -> Result<RouteAnalysis, CoreError> {
        request.validate()?;

        let (land, sea, air) = futures::join!(
            self.route_for(TransportMode::Land, request),
            self.route_for(TransportMode::Sea, request),
            self.route_for(TransportMode::Air, request),
        );
        select_routes(vec![land?, sea?, air?])
    }

    pub async fn compute_mode_route(
        &self,
        mode: TransportMode,
        request: &RouteRequest,
    ) -> Result<MultiModalRoute, CoreError> {
        request.validate()?;
        self.route_for(mode, request).await
    }

    pub async fn compute_land_route(
        &self,
        request: &RouteRequest,
    ) -> Result<MultiModalRoute, CoreError> {
        let origin = request.origin_coordinates;
        let destination = request.destination_coordinates;

        let (distance_km, duration_hours, geometry) = match self.router.route(origin, destination).await {
            Some(road) => (road.distance_km, road.duration_hours, road.geometry),
            None => {
                debug!("road route unavailable, using great-circle estimate for land");
                let distance_km = haversine_distance(origin, destination) * self.config.road_factor;
                (
                    distance_km,
                    distance_km / TransportMode::Land.average_speed_kmh(),
                    interpolate_great_circle(origin, destination, self.config.land_fallback_points),
                )
            }
        };

        let leg = Leg {
            mode: TransportMode::Land,
            from_name: "Origin".to_string(),
            from: origin,
            to_name: "Destination".to_string(),
            to: destination,
            distance_km,
            duration_hours,
            geometry,
        };
        self.assemble(TransportMode::Land, vec![leg], Vec::new(), request.weight_kg)
    }

    pub async fn compute_air_route(
        &self,
        request: &RouteRequest,
    ) -> Result<MultiModalRoute, CoreError> {
        self.route_for(TransportMode::Air, request).await
    }

    pub async fn compute_sea_route(
        &self,
        request: &RouteRequest,
    ) -> Result<MultiModalRoute, CoreError> {
        self.route_for(TransportMode::Sea, request).await
    }

    async fn route_for(
        &self,
        mode: TransportMode,
        request: &RouteRequest,
    ) -> Result<MultiModalRoute, CoreError> {
        match self.config.trunk_profile(mode) {
            Some(profile) => self.compute_hub_route(&profile, request).await,
            None => self.compute_land_route(request).await,
        }
    }

    async fn compute_hub_route(
        &self,
        profile: &TrunkProfile,
        request: &RouteRequest,
    ) -> Result<MultiModalRoute, CoreError> {
        let origin = request.origin_coordinates;
        let destination = request.destination_coordinates;
        let origin_city = PlaceName::parse(&request.origin_name).city;
        let dest_city = PlaceName::parse(&request.destination_name).city;

        let (origin_hub, dest_hub) = futures::join!(
            self.resolver.find_nearest(profile.hub, origin, &request.origin_name),
            self.resolver.find_nearest(profile.hub, destination, &request.destination_name),
        );

        let kind = profile.hub.as_str();
        let Some(origin_hub) = origin_hub else {
            return Ok(MultiModalRoute::not_viable(
                profile.mode,
                format!("No {kind} found near {origin_city}"),
            ));
        };
        let Some(dest_hub) = dest_hub else {
            return Ok(MultiModalRoute::not_viable(
                profile.mode,
                format!("No {kind} found near {dest_city}"),
            ));
        };

        let direct_km = haversine_distance(origin_hub.coordinates, dest_hub.coordinates);
        if let Some(min) = profile.min_distance_km {
            if direct_km < min {
                return Ok(MultiModalRoute::not_viable(
                    profile.mode,
                    format!("Flight distance ({direct_km:.0}km) too short"),
                ));
            }
        }

        let trunk_km = direct_km * profile.distance_factor;
        let trunk = Leg {
            mode: profile.mode,
            from_name: origin_hub.name.clone(),
            from: origin_hub.coordinates,
            to_name: dest_hub.name.clone(),
            to: dest_hub.coordinates,
            distance_km: trunk_km,
            duration_hours: trunk_km / profile.mode.average_speed_kmh() + profile.overhead_hours,
            geometry: interpolate_great_circle(
                origin_hub.coordinates,
                dest_hub.coordinates,
                profile.points,
            ),
        };

        let (first, last) = futures::join!(
            self.access_leg(origin_city, origin, &origin_hub, true),
            self.access_leg(dest_city, destination, &dest_hub, false),
        );

        let waypoints = [&origin_hub, &dest_hub]
            .into_iter()
            .map(|hub| Waypoint {
                name: hub.name.clone(),
                kind: profile.hub,
                coordinates: hub.coordinates,
            })
            .collect();

        self.assemble(profile.mode, vec![first, trunk, last], waypoints, request.weight_kg)
    }

    /// Road leg between a city and its hub, in the direction of travel.
    async fn access_leg(
        &self,
        city: &str,
        point: Coordinates,
        hub: &HubCandidate,
        to_hub: bool,
    ) -> Leg {
        let (from, to) = if to_hub {
            (point, hub.coordinates)
        } else {
            (hub.coordinates, point)
        };

        let (distance_km, duration_hours, geometry) = match self.router.route(from, to).await {
            Some(road) => (road.distance_km, road.duration_hours, road.geometry),
            None => {
                debug!(hub = %hub.name, "road route unavailable, estimating access leg");
                let distance_km = hub.distance_km * self.config.road_factor;
                (
                    distance_km,
                    distance_km / TransportMode::Land.average_speed_kmh(),
                    interpolate_great_circle(from, to, self.config.access_road_points),
                )
            }
        };

        let (from_name, to_name) = if to_hub {
            (city.to_string(), hub.name.clone())
        } else {
            (hub.name.clone(), city.to_string())
        };

        Leg {
            mode: TransportMode::Land,
            from_name,
            from,
            to_name,
            to,
            distance_km,
            duration_hours,
            geometry,
        }
    }

    /// Score legs, round them for presentation and sum unrounded totals.
    fn assemble(
        &self,
        mode: TransportMode,
        legs: Vec<Leg>,
        waypoints: Vec<Waypoint>,
        weight_kg: f64,
    ) -> Result<MultiModalRoute, CoreError> {
        let mut total_distance = 0.0;
        let mut total_duration = 0.0;
        let mut total_emission = 0.0;
        let mut segments = Vec::with_capacity(legs.len());

        for leg in legs {
            let emission = self.calculator.emission_kg(leg.distance_km, weight_kg, leg.mode)?;
            total_distance += leg.distance_km;
            total_duration += leg.duration_hours;
            total_emission += emission;

            segments.push(RouteSegment {
                mode: leg.mode,
                from_name: leg.from_name,
                from_coordinates: leg.from,
                to_name: leg.to_name,
                to_coordinates: leg.to,
                distance_km: round_to(leg.distance_km, 2),
                duration_hours: round_to(leg.duration_hours, 2),
                emission_kg_co2: round_to(emission, 4),
                geometry: leg.geometry,
            });
        }

        Ok(MultiModalRoute {
            segments,
            total_distance_km: round_to(total_distance, 2),
            total_duration_hours: round_to(total_duration, 2),
            total_emission_kg_co2: round_to(total_emission, 4),
            transport_mode: mode,
            is_viable: true,
            waypoints,
            not_viable_reason: None,
        })
    }
}

fn mode_rank(mode: TransportMode) -> usize {
    TransportMode::ALL
        .iter()
        .position(|m| *m == mode)
        .unwrap_or(TransportMode::ALL.len())
}

/// Minimum by `key`; only a strictly smaller value displaces the current pick.
fn first_min_by<'a>(
    candidates: &[&'a MultiModalRoute],
    key: impl Fn(&MultiModalRoute) -> f64,
) -> Option<&'a MultiModalRoute> {
    candidates
        .iter()
        .copied()
        .reduce(|best, r| if key(r) < key(best) { r } else { best })
}

/// Pick the shortest and most efficient of the viable routes.
///
/// Routes are ordered land, sea, air first; on ties the earlier mode wins.
/// With no viable route at all, land is selected anyway (its real
/// viability is still reported in the comparison).
pub fn select_routes(mut routes: Vec<MultiModalRoute>) -> Result<RouteAnalysis, CoreError> {
    routes.sort_by_key(|r| mode_rank(r.transport_mode));

    let mut candidates: Vec<&MultiModalRoute> = routes.iter().filter(|r| r.is_viable).collect();
    if candidates.is_empty() {
        let land = routes
            .iter()
            .find(|r| r.transport_mode == TransportMode::Land)
            .ok_or(CoreError::NoViableRoute)?;
        candidates.push(land);
    }

    let shortest = first_min_by(&candidates, |r| r.total_distance_km)
        .ok_or(CoreError::NoViableRoute)?;
    let efficient = first_min_by(&candidates, |r| r.total_emission_kg_co2)
        .ok_or(CoreError::NoViableRoute)?;

    let mode_comparison = routes
        .iter()
        .map(|route| ModeComparison {
            transport_mode: route.transport_mode,
            distance_km: route.total_distance_km,
            duration_hours: route.total_duration_hours,
            emission_kg_co2: route.total_emission_kg_co2,
            is_shortest: route.transport_mode == shortest.transport_mode,
            is_most_efficient: route.transport_mode == efficient.transport_mode,
            is_viable: route.is_viable,
            not_viable_reason: route.not_viable_reason.clone(),
        })
        .collect();

    let shortest_route = RouteInfo::from_route(shortest, RouteType::Shortest);
    let efficient_route = RouteInfo::from_route(efficient, RouteType::Efficient);

    Ok(RouteAnalysis {
        shortest_route,
        efficient_route,
        mode_comparison,
        detailed_routes: routes,
    })
}
