//! Carbon emission estimates for cargo transport.
//!
//! `CO2 (kg) = distance (km) × weight (t) × factor (kg CO2 / t-km)`

use crate::error::CoreError;
use crate::models::TransportMode;
use serde::{Deserialize, Serialize};

pub const FACTOR_UNIT: &str = "kg CO2/t-km";

/// Emission factors in kg CO2 per tonne-km.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactors {
    pub land: f64,
    pub sea: f64,
    pub air: f64,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            land: TransportMode::Land.default_emission_factor(),
            sea: TransportMode::Sea.default_emission_factor(),
            air: TransportMode::Air.default_emission_factor(),
        }
    }
}

impl EmissionFactors {
    pub fn factor(&self, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::Land => self.land,
            TransportMode::Sea => self.sea,
            TransportMode::Air => self.air,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionResult {
    pub transport_mode: TransportMode,
    pub distance_km: f64,
    pub weight_kg: f64,
    pub emission_kg_co2: f64,
    pub emission_factor_used: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionComparison {
    pub land: EmissionResult,
    pub sea: EmissionResult,
    pub air: EmissionResult,
    pub most_efficient: TransportMode,
    pub least_efficient: TransportMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactorInfo {
    pub mode: TransportMode,
    pub factor: f64,
    pub unit: String,
    pub vehicle_type: String,
    pub source: String,
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[derive(Debug, Clone, Default)]
pub struct EmissionCalculator {
    factors: EmissionFactors,
}

impl EmissionCalculator {
    pub fn new(factors: EmissionFactors) -> Self {
        Self { factors }
    }

    pub fn factors(&self) -> &EmissionFactors {
        &self.factors
    }

    /// Unrounded emission in kg CO2. Used when summing segments.
    pub fn emission_kg(
        &self,
        distance_km: f64,
        weight_kg: f64,
        mode: TransportMode,
    ) -> Result<f64, CoreError> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(CoreError::InvalidInput(
                "distance cannot be negative".to_string(),
            ));
        }
        if !weight_kg.is_finite() || weight_kg < 0.0 {
            return Err(CoreError::InvalidInput(
                "weight cannot be negative".to_string(),
            ));
        }
        Ok(distance_km * (weight_kg / 1000.0) * self.factors.factor(mode))
    }

    /// Emission for one shipment, rounded for presentation.
    pub fn calculate(
        &self,
        distance_km: f64,
        weight_kg: f64,
        mode: TransportMode,
    ) -> Result<EmissionResult, CoreError> {
        let emission = self.emission_kg(distance_km, weight_kg, mode)?;
        Ok(EmissionResult {
            transport_mode: mode,
            distance_km: round_to(distance_km, 2),
            weight_kg: round_to(weight_kg, 2),
            emission_kg_co2: round_to(emission, 4),
            emission_factor_used: self.factors.factor(mode),
        })
    }

    /// Same shipment across every mode, with the cleanest and dirtiest picked.
    /// Ties keep `TransportMode::ALL` order.
    pub fn compare_modes(
        &self,
        distance_km: f64,
        weight_kg: f64,
    ) -> Result<EmissionComparison, CoreError> {
        let land = self.calculate(distance_km, weight_kg, TransportMode::Land)?;
        let sea = self.calculate(distance_km, weight_kg, TransportMode::Sea)?;
        let air = self.calculate(distance_km, weight_kg, TransportMode::Air)?;

        let mut ranked = [&land, &sea, &air];
        // sort_by is stable, so equal emissions keep land, sea, air order.
        ranked.sort_by(|a, b| a.emission_kg_co2.total_cmp(&b.emission_kg_co2));
        let most_efficient = ranked[0].transport_mode;
        let least_efficient = ranked[2].transport_mode;

        Ok(EmissionComparison {
            land,
            sea,
            air,
            most_efficient,
            least_efficient,
        })
    }

    pub fn factors_info(&self) -> Vec<EmissionFactorInfo> {
        TransportMode::ALL
            .iter()
            .map(|&mode| {
                let (vehicle_type, source) = factor_metadata(mode);
                EmissionFactorInfo {
                    mode,
                    factor: self.factors.factor(mode),
                    unit: FACTOR_UNIT.to_string(),
                    vehicle_type: vehicle_type.to_string(),
                    source: source.to_string(),
                }
            })
            .collect()
    }
}

fn factor_metadata(mode: TransportMode) -> (&'static str, &'static str) {
    match mode {
        TransportMode::Land => (
            "Heavy-duty truck (average)",
            "EEA/IPCC transport emission factors",
        ),
        TransportMode::Sea => (
            "Large container vessel (8000+ TEU)",
            "IMO Fourth GHG Study 2020",
        ),
        TransportMode::Air => (
            "Cargo aircraft (freighter average)",
            "ICAO Carbon Emissions Calculator",
        ),
    }
}
