//! Pricing rules
//!
//! Two pure computations:
//! - the estimator, run once when an order is created, from catalog data
//! - the evaluation scorer, run when an evaluator records condition scores
//!
//! The estimator floors its result at 10% of the base price. The scorer
//! applies no floor, so a poor evaluation can price a device close to zero.

use crate::app::pricing_config::{
    DEPRECIATION_PER_YEAR, MAX_DEPRECIATION, MAX_SCORE, MIN_SCORE, PRICE_FLOOR_RATIO,
    SCORE_SCALE, UNKNOWN_CONDITION_MULTIPLIER,
};
use crate::domain::entities::{DeviceCondition, EvaluationScores};
use crate::error::DomainError;

/// Derived values produced by the scorer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredEvaluation {
    pub overall_score: f64,
    pub final_price: f64,
}

/// Depreciation fraction for a device of the given age.
///
/// Devices dated in the future count as zero years old.
pub fn depreciation_for_age(years_elapsed: i32) -> f64 {
    (DEPRECIATION_PER_YEAR * f64::from(years_elapsed.max(0))).min(MAX_DEPRECIATION)
}

/// Multiplier for a raw condition string; unknown values get the fallback
pub fn condition_multiplier(condition: &str) -> f64 {
    condition
        .parse::<DeviceCondition>()
        .map(|c| c.multiplier())
        .unwrap_or(UNKNOWN_CONDITION_MULTIPLIER)
}

/// Initial estimate for an order, from the catalog entry of its device
pub fn estimate_price(base_price: f64, condition: &str, year_bought: i32, current_year: i32) -> f64 {
    let depreciation = depreciation_for_age(current_year - year_bought);
    let price = base_price * (1.0 - depreciation) * condition_multiplier(condition);

    price.max(base_price * PRICE_FLOOR_RATIO)
}

/// Mean of the three sub-scores
pub fn overall_score(scores: &EvaluationScores) -> f64 {
    f64::from(scores.appearance + scores.function + scores.performance) / 3.0
}

/// Overall score and final price for an evaluation
pub fn score_evaluation(
    scores: &EvaluationScores,
    market_price: f64,
    depreciation_rate: f64,
) -> ScoredEvaluation {
    let overall = overall_score(scores);
    ScoredEvaluation {
        overall_score: overall,
        final_price: market_price * (1.0 - depreciation_rate) * (overall / SCORE_SCALE),
    }
}

/// Check evaluator inputs before any arithmetic runs
pub fn validate_evaluation_inputs(
    scores: &EvaluationScores,
    market_price: f64,
    depreciation_rate: f64,
) -> Result<(), DomainError> {
    for (name, value) in [
        ("appearance_score", scores.appearance),
        ("function_score", scores.function),
        ("performance_score", scores.performance),
    ] {
        if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
            return Err(DomainError::Validation(format!(
                "{} must be between {} and {}",
                name, MIN_SCORE, MAX_SCORE
            )));
        }
    }

    if !market_price.is_finite() || market_price < 0.0 {
        return Err(DomainError::Validation(
            "market_price must be a non-negative number".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&depreciation_rate) {
        return Err(DomainError::Validation(
            "depreciation_rate must be between 0 and 1".to_string(),
        ));
    }

    Ok(())
}
