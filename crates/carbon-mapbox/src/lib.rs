//! Carbon Mapbox - geocoding and driving directions provider
//!
//! Implements the `Geocoder` and `RoadRouter` capabilities from `carbon-core`
//! against the Mapbox REST APIs. Every failure degrades to "unavailable".

pub mod client;

pub use client::{MapboxClient, MapboxConfig, MapboxError, DEFAULT_BASE_URL};
