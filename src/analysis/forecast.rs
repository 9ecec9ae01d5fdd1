//! Short-term consumption forecast driven by outdoor temperature.

use serde::{Deserialize, Serialize};

use super::AnalysisError;
use crate::domain::MonthlyRecord;

/// Least-squares line of daily consumption against outdoor temperature.
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionModel {
    pub intercept_kwh: f64,
    /// kWh/day per °C of outdoor temperature; normally negative.
    pub slope_kwh_per_c: f64,
}

impl ConsumptionModel {
    /// Fit on the monthly kWh/day values. Fewer than two distinct outdoor
    /// temperatures gives a flat model at the mean.
    pub fn fit(records: &[MonthlyRecord]) -> Result<Self, AnalysisError> {
        if records.is_empty() {
            return Err(AnalysisError::NoRecords);
        }

        let n = records.len() as f64;
        let mean_x = records.iter().map(|r| r.outdoor_c).sum::<f64>() / n;
        let mean_y = records.iter().map(|r| r.kwh_per_day()).sum::<f64>() / n;

        let (sxx, sxy) = records.iter().fold((0.0, 0.0), |(sxx, sxy), r| {
            let dx = r.outdoor_c - mean_x;
            (sxx + dx * dx, sxy + dx * (r.kwh_per_day() - mean_y))
        });

        if sxx < 1e-9 {
            return Ok(Self {
                intercept_kwh: mean_y,
                slope_kwh_per_c: 0.0,
            });
        }

        let slope = sxy / sxx;
        Ok(Self {
            intercept_kwh: mean_y - slope * mean_x,
            slope_kwh_per_c: slope,
        })
    }

    pub fn predict(&self, outdoor_c: f64) -> f64 {
        (self.intercept_kwh + self.slope_kwh_per_c * outdoor_c).max(0.0)
    }
}

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub day: usize,
    pub outdoor_c: f64,
    pub kwh: f64,
}

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionForecast {
    pub model: ConsumptionModel,
    pub points: Vec<ForecastPoint>,
    pub total_kwh: f64,
}

/// Predict daily consumption for each supplied outdoor temperature.
pub fn forecast_consumption(
    records: &[MonthlyRecord],
    outdoor_forecast_c: &[f64],
) -> Result<ConsumptionForecast, AnalysisError> {
    if let Some(bad) = outdoor_forecast_c.iter().find(|t| !t.is_finite()) {
        return Err(AnalysisError::invalid(
            "outdoor_forecast_c",
            format!("temperatures must be finite, got {}", bad),
        ));
    }

    let model = ConsumptionModel::fit(records)?;
    let points: Vec<ForecastPoint> = outdoor_forecast_c
        .iter()
        .enumerate()
        .map(|(day, &outdoor_c)| ForecastPoint {
            day,
            outdoor_c,
            kwh: model.predict(outdoor_c),
        })
        .collect();
    let total_kwh = points.iter().map(|p| p.kwh).sum();

    Ok(ConsumptionForecast {
        model,
        points,
        total_kwh,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::fixtures::winter_records;

    #[test]
    fn test_fit_through_two_months() {
        let model = ConsumptionModel::fit(&winter_records()).unwrap();

        // Two points define the line exactly.
        assert!((model.predict(8.0) - 500.0 / 30.0).abs() < 1e-9);
        assert!((model.predict(2.0) - 1201.0 / 29.0).abs() < 1e-9);
        assert!(model.slope_kwh_per_c < 0.0);
    }

    #[test]
    fn test_prediction_never_negative() {
        let model = ConsumptionModel::fit(&winter_records()).unwrap();
        assert_eq!(model.predict(20.0), 0.0);
    }

    #[test]
    fn test_flat_model_for_single_temperature() {
        let mut records = winter_records();
        records[1].outdoor_c = records[0].outdoor_c;
        let model = ConsumptionModel::fit(&records).unwrap();

        assert_eq!(model.slope_kwh_per_c, 0.0);
        assert!((model.predict(-15.0) - 29.040).abs() < 1e-3);
    }

    #[test]
    fn test_forecast_consumption() {
        let forecast = forecast_consumption(&winter_records(), &[5.0, 5.0, 2.0]).unwrap();

        assert_eq!(forecast.points.len(), 3);
        assert_eq!(forecast.points[2].day, 2);
        let expected = 2.0 * (500.0 / 30.0 + 1201.0 / 29.0) / 2.0 + 1201.0 / 29.0;
        assert!((forecast.total_kwh - expected).abs() < 1e-9);
    }

    #[test]
    fn test_forecast_requires_records() {
        assert_eq!(
            forecast_consumption(&[], &[1.0]),
            Err(AnalysisError::NoRecords)
        );
    }
}
