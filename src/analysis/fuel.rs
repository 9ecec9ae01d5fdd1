use serde::{Deserialize, Serialize};

use super::AnalysisError;

/// An alternative heat source to compare the heat pump against.
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelOption {
    pub name: String,
    /// Unit the fuel is bought in (kg, m3, l, kWh).
    #[serde(default)]
    pub unit: String,
    pub price_per_unit: f64,
    /// Energy content of one unit, kWh.
    pub kwh_per_unit: f64,
    /// Boiler/stove efficiency in (0, 1].
    pub efficiency: f64,
}

impl FuelOption {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.kwh_per_unit.is_finite() || self.kwh_per_unit <= 0.0 {
            return Err(AnalysisError::invalid(
                "kwh_per_unit",
                format!("{}: must be positive", self.name),
            ));
        }
        if self.efficiency.is_nan() || self.efficiency <= 0.0 || self.efficiency > 1.0 {
            return Err(AnalysisError::invalid(
                "efficiency",
                format!("{}: must be in (0, 1], got {}", self.name, self.efficiency),
            ));
        }
        if !self.price_per_unit.is_finite() || self.price_per_unit < 0.0 {
            return Err(AnalysisError::invalid(
                "price_per_unit",
                format!("{}: must be non-negative", self.name),
            ));
        }
        Ok(())
    }

    /// Units of fuel needed to deliver `heat_kwh` of heat.
    pub fn units_for(&self, heat_kwh: f64) -> f64 {
        heat_kwh / (self.kwh_per_unit * self.efficiency)
    }
}

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelCost {
    pub name: String,
    pub units_needed: f64,
    pub cost: f64,
    /// Fuel cost minus heat pump cost; positive means the heat pump is cheaper.
    pub difference_to_heat_pump: f64,
}

pub fn compare_fuels(
    heat_kwh: f64,
    heat_pump_cost: f64,
    fuels: &[FuelOption],
) -> Result<Vec<FuelCost>, AnalysisError> {
    if !heat_kwh.is_finite() || heat_kwh < 0.0 {
        return Err(AnalysisError::invalid(
            "heat_kwh",
            format!("must be non-negative, got {}", heat_kwh),
        ));
    }

    fuels
        .iter()
        .map(|fuel| {
            fuel.validate()?;
            let units_needed = fuel.units_for(heat_kwh);
            let cost = units_needed * fuel.price_per_unit;
            Ok(FuelCost {
                name: fuel.name.clone(),
                units_needed,
                cost,
                difference_to_heat_pump: cost - heat_pump_cost,
            })
        })
        .collect()
}
