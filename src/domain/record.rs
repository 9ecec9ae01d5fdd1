use serde::{Deserialize, Serialize};
use validator::Validate;

/// One month of heat pump readings as reported by the unit's statistics menu.
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MonthlyRecord {
    /// Label of the billing period, e.g. "November".
    #[validate(length(min = 1))]
    pub month: String,
    /// Heat delivered in kWh.
    #[validate(range(min = 0.0))]
    pub produced_kwh: f64,
    /// Electricity drawn in kWh.
    #[validate(range(min = 0.0))]
    pub consumed_kwh: f64,
    #[validate(range(min = 0.0))]
    pub compressor_hours: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub pump_hours: f64,
    pub compressor_starts: u32,
    /// Leaving (supply) water temperature in °C.
    #[validate(range(min = -20.0, max = 90.0))]
    pub lwt_c: f64,
    /// Mean outdoor temperature in °C.
    #[validate(range(min = -60.0, max = 60.0))]
    pub outdoor_c: f64,
    /// Number of days the readings cover.
    #[validate(range(min = 1, max = 31))]
    pub days: u32,
}

impl MonthlyRecord {
    /// Coefficient of performance. `None` when nothing was consumed.
    pub fn cop(&self) -> Option<f64> {
        if self.consumed_kwh > 0.0 {
            Some(self.produced_kwh / self.consumed_kwh)
        } else {
            None
        }
    }

    pub fn kwh_per_day(&self) -> f64 {
        self.consumed_kwh / self.days as f64
    }

    pub fn starts_per_day(&self) -> f64 {
        self.compressor_starts as f64 / self.days as f64
    }

    /// Average compressor run time per start, in hours.
    pub fn hours_per_start(&self) -> Option<f64> {
        if self.compressor_starts > 0 {
            Some(self.compressor_hours / self.compressor_starts as f64)
        } else {
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::winter_records;
    use super::*;

    #[test]
    fn test_derived_ratios() {
        let records = winter_records();
        let nov = &records[0];

        assert!((nov.cop().unwrap() - 6.13).abs() < 1e-9);
        assert!((nov.kwh_per_day() - 16.6667).abs() < 1e-3);
        assert!((nov.starts_per_day() - 39.3).abs() < 1e-9);
        assert!((nov.hours_per_start().unwrap() - 0.436).abs() < 1e-3);
    }

    #[test]
    fn test_cop_undefined_without_consumption() {
        let mut record = winter_records().remove(0);
        record.consumed_kwh = 0.0;
        assert!(record.cop().is_none());
    }

    #[test]
    fn test_validation() {
        let mut record = winter_records().remove(1);
        assert!(record.validate().is_ok());

        record.days = 0;
        assert!(record.validate().is_err());

        record.days = 31;
        record.consumed_kwh = -1.0;
        assert!(record.validate().is_err());

        record.consumed_kwh = 10.0;
        record.outdoor_c = 75.0;
        assert!(record.validate().is_err());

        record.outdoor_c = 0.0;
        record.month = String::new();
        assert!(record.validate().is_err());
    }
}
