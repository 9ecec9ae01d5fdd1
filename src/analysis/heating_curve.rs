//! Heating curve diagnostics.
//!
//! A heating curve maps outdoor temperature to the leaving water temperature
//! (LWT) set-point. Running above the curve costs efficiency; running below it
//! costs comfort.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::Display;

use super::AnalysisError;
use crate::domain::MonthlyRecord;

/// Linear curve `lwt = intercept_c + slope * outdoor_c`.
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatingCurve {
    pub intercept_c: f64,
    pub slope: f64,
}

impl HeatingCurve {
    /// Theoretical curve the measured points are plotted against.
    pub const REFERENCE: Self = Self {
        intercept_c: 40.0,
        slope: -0.5,
    };

    /// Conservative curve: 40 °C at -10 °C outside, 25 °C at 20 °C.
    pub const RECOMMENDED: Self = Self {
        intercept_c: 35.0,
        slope: -0.5,
    };

    pub fn lwt_at(&self, outdoor_c: f64) -> f64 {
        self.intercept_c + self.slope * outdoor_c
    }

    /// `points` evenly spaced samples from `start_c` to `end_c` inclusive.
    pub fn sample(
        &self,
        start_c: f64,
        end_c: f64,
        points: usize,
    ) -> Result<Vec<CurvePoint>, AnalysisError> {
        if points < 2 {
            return Err(AnalysisError::invalid(
                "points",
                format!("at least 2 sample points required, got {}", points),
            ));
        }
        if !start_c.is_finite() || !end_c.is_finite() {
            return Err(AnalysisError::invalid("range", "sample range must be finite"));
        }

        let step = (end_c - start_c) / (points - 1) as f64;
        Ok((0..points)
            .map(|i| {
                let outdoor_c = if i == points - 1 {
                    end_c
                } else {
                    start_c + step * i as f64
                };
                CurvePoint {
                    outdoor_c,
                    lwt_c: self.lwt_at(outdoor_c),
                }
            })
            .collect())
    }
}

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub outdoor_c: f64,
    pub lwt_c: f64,
}

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CurvePosition {
    Above,
    OnCurve,
    Below,
}

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveDeviation {
    pub month: String,
    pub outdoor_c: f64,
    pub lwt_c: f64,
    pub curve_lwt_c: f64,
    /// Measured minus curve LWT; positive means the water runs hotter than needed.
    pub deviation_c: f64,
    pub position: CurvePosition,
}

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveDiagnostics {
    pub curve: HeatingCurve,
    pub deviations: Vec<CurveDeviation>,
    pub mean_deviation_c: f64,
    pub months_above: usize,
    /// Curve sampled 2 °C beyond the observed outdoor range on both sides.
    pub samples: Vec<CurvePoint>,
}

pub fn diagnose(
    records: &[MonthlyRecord],
    curve: &HeatingCurve,
    tolerance_c: f64,
    sample_points: usize,
) -> Result<CurveDiagnostics, AnalysisError> {
    if tolerance_c < 0.0 {
        return Err(AnalysisError::invalid(
            "tolerance_c",
            format!("must be non-negative, got {}", tolerance_c),
        ));
    }

    let (min_t, max_t) = records
        .iter()
        .map(|r| r.outdoor_c)
        .minmax_by(|a, b| a.total_cmp(b))
        .into_option()
        .ok_or(AnalysisError::NoRecords)?;

    let deviations: Vec<CurveDeviation> = records
        .iter()
        .map(|r| {
            let curve_lwt_c = curve.lwt_at(r.outdoor_c);
            let deviation_c = r.lwt_c - curve_lwt_c;
            let position = if deviation_c > tolerance_c {
                CurvePosition::Above
            } else if deviation_c < -tolerance_c {
                CurvePosition::Below
            } else {
                CurvePosition::OnCurve
            };
            CurveDeviation {
                month: r.month.clone(),
                outdoor_c: r.outdoor_c,
                lwt_c: r.lwt_c,
                curve_lwt_c,
                deviation_c,
                position,
            }
        })
        .collect();

    let mean_deviation_c =
        deviations.iter().map(|d| d.deviation_c).sum::<f64>() / deviations.len() as f64;
    let months_above = deviations
        .iter()
        .filter(|d| d.position == CurvePosition::Above)
        .count();
    let samples = curve.sample(min_t - 2.0, max_t + 2.0, sample_points)?;

    Ok(CurveDiagnostics {
        curve: *curve,
        deviations,
        mean_deviation_c,
        months_above,
        samples,
    })
}

/// Weather-driven set-point: the curve value clamped to the allowed LWT band.
pub fn recommend_lwt(
    outdoor_c: f64,
    curve: &HeatingCurve,
    min_c: f64,
    max_c: f64,
) -> Result<f64, AnalysisError> {
    if min_c.is_nan() || max_c.is_nan() || min_c > max_c {
        return Err(AnalysisError::invalid(
            "lwt_band",
            format!("min {} exceeds max {}", min_c, max_c),
        ));
    }
    if !outdoor_c.is_finite() {
        return Err(AnalysisError::invalid("outdoor_c", "must be finite"));
    }
    Ok(curve.lwt_at(outdoor_c).clamp(min_c, max_c))
}
