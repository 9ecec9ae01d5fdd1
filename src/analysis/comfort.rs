use serde::{Deserialize, Serialize};
use strum::Display;

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComfortStatus {
    Stable,
    /// Too many compressor starts per day; hysteresis or water flow needs attention.
    ShortCycling,
}

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComfortAssessment {
    pub average_starts_per_day: f64,
    /// 0..=100, higher is calmer.
    pub index: u8,
    pub status: ComfortStatus,
}

/// Each compressor start per day costs three points out of 100.
pub fn comfort_index(average_starts_per_day: f64) -> u8 {
    let score = (100.0 - average_starts_per_day * 3.0).clamp(0.0, 100.0);
    score as u8
}

pub fn assess_comfort(average_starts_per_day: f64, threshold: u8) -> ComfortAssessment {
    let index = comfort_index(average_starts_per_day);
    let status = if index < threshold {
        ComfortStatus::ShortCycling
    } else {
        ComfortStatus::Stable
    };

    ComfortAssessment {
        average_starts_per_day,
        index,
        status,
    }
}
