//! Carbon CLI - command line tools for the carbon route system.
//!
//! Binaries:
//! - carbon-route: compute routes between two coordinates
//! - generate_token: mint a bearer token accepted by the server

pub mod auth;
pub mod coords;

pub use auth::{generate_token, TokenConfig};
pub use coords::parse_coordinates;
