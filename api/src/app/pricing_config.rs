//! Pricing configuration constants
//!
//! Numeric policy for the estimator and the evaluation scorer.

use crate::domain::entities::DeviceCondition;

/// Linear depreciation per elapsed year
pub const DEPRECIATION_PER_YEAR: f64 = 0.1;

/// Depreciation never exceeds this fraction
pub const MAX_DEPRECIATION: f64 = 0.8;

/// Estimates never drop below this fraction of the base price
pub const PRICE_FLOOR_RATIO: f64 = 0.1;

/// Multiplier for condition strings outside the known grades
pub const UNKNOWN_CONDITION_MULTIPLIER: f64 = 0.5;

/// Lowest and highest accepted evaluation sub-score
pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 10;

/// Scale the overall score is divided by to get a price factor
pub const SCORE_SCALE: f64 = 10.0;

/// Earliest accepted purchase year for catalog devices
pub const MIN_YEAR_BOUGHT: i32 = 2000;

impl DeviceCondition {
    /// Price multiplier for this grade
    pub fn multiplier(&self) -> f64 {
        match self {
            DeviceCondition::Excellent => 1.0,
            DeviceCondition::Good => 0.8,
            DeviceCondition::Fair => 0.6,
            DeviceCondition::Poor => 0.4,
        }
    }
}
