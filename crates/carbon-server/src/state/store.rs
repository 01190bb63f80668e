//! Application state shared by every request handler.

use anyhow::{Context, Result};
use carbon_core::{EmissionCalculator, RouteSynthesizer};
use carbon_mapbox::{MapboxClient, MapboxConfig};

use crate::config::Config;
use crate::persistence::Database;
use crate::security::TokenKeys;

pub type Synthesizer = RouteSynthesizer<MapboxClient, MapboxClient>;

/// Database handle, token keys and the route engine.
pub struct AppState {
    db: Database,
    config: Config,
    tokens: TokenKeys,
    synthesizer: Synthesizer,
    providers_configured: bool,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Result<Self> {
        let mut mapbox = MapboxConfig::new(config.mapbox_access_token.clone());
        mapbox.geocoding_timeout = config.geocoding_timeout;
        mapbox.directions_timeout = config.directions_timeout;
        let client = MapboxClient::new(mapbox).context("building Mapbox client")?;
        let providers_configured = client.is_configured();

        Ok(Self {
            tokens: TokenKeys::new(&config.jwt_secret, config.jwt_expire_minutes),
            synthesizer: RouteSynthesizer::new(client.clone(), client),
            providers_configured,
            db,
            config,
        })
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tokens(&self) -> &TokenKeys {
        &self.tokens
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }

    pub fn calculator(&self) -> &EmissionCalculator {
        self.synthesizer.calculator()
    }

    /// False when no Mapbox token is set; routes then use geometric estimates.
    pub fn providers_configured(&self) -> bool {
        self.providers_configured
    }
}
