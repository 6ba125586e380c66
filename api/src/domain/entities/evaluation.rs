//! Evaluation domain entity
//!
//! A scored assessment of the device attached to one recycle order.
//! At most one evaluation exists per order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::recycle_order::OrderId;
use super::user::UserId;

/// Unique identifier for an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EvaluationId(pub i64);

impl From<i64> for EvaluationId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Evaluation workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationStatus {
    Pending,
    Completed,
}

impl std::fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationStatus::Pending => write!(f, "pending"),
            EvaluationStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for EvaluationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(EvaluationStatus::Pending),
            "completed" => Ok(EvaluationStatus::Completed),
            _ => Err(format!("Unknown evaluation status: {}", s)),
        }
    }
}

/// The three human-entered sub-scores, each 1-10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationScores {
    pub appearance: i32,
    pub function: i32,
    pub performance: i32,
}

/// A recorded evaluation
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub order_id: OrderId,
    pub evaluator_id: UserId,
    pub appearance_score: i32,
    pub function_score: i32,
    pub performance_score: i32,
    pub overall_score: f64,
    pub market_price: f64,
    pub depreciation_rate: f64,
    pub final_price: f64,
    pub evaluation_report: Option<String>,
    pub images: Option<String>,
    pub status: EvaluationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Evaluation {
    pub fn scores(&self) -> EvaluationScores {
        EvaluationScores {
            appearance: self.appearance_score,
            function: self.function_score,
            performance: self.performance_score,
        }
    }
}

/// A fully priced evaluation ready to be stored.
///
/// `overall_score` and `final_price` are derived by the scorer before this
/// is built; repositories store them as given.
#[derive(Debug, Clone)]
pub struct NewEvaluation {
    pub order_id: OrderId,
    pub evaluator_id: UserId,
    pub scores: EvaluationScores,
    pub overall_score: f64,
    pub market_price: f64,
    pub depreciation_rate: f64,
    pub final_price: f64,
    pub evaluation_report: Option<String>,
    pub images: Option<String>,
    pub status: EvaluationStatus,
}

/// A re-scoring of an existing evaluation, with derived fields recomputed
#[derive(Debug, Clone)]
pub struct EvaluationRevision {
    pub scores: EvaluationScores,
    pub overall_score: f64,
    pub market_price: f64,
    pub depreciation_rate: f64,
    pub final_price: f64,
    pub evaluation_report: Option<String>,
    pub images: Option<String>,
    pub status: EvaluationStatus,
}

impl EvaluationRevision {
    pub fn apply_to(&self, evaluation: &mut Evaluation) {
        evaluation.appearance_score = self.scores.appearance;
        evaluation.function_score = self.scores.function;
        evaluation.performance_score = self.scores.performance;
        evaluation.overall_score = self.overall_score;
        evaluation.market_price = self.market_price;
        evaluation.depreciation_rate = self.depreciation_rate;
        evaluation.final_price = self.final_price;
        evaluation.evaluation_report = self.evaluation_report.clone();
        evaluation.images = self.images.clone();
        evaluation.status = self.status;
    }
}

/// Evaluation listing filters
#[derive(Debug, Clone, Default)]
pub struct EvaluationFilter {
    pub status: Option<EvaluationStatus>,
    pub evaluator_id: Option<UserId>,
}

impl EvaluationFilter {
    pub fn matches(&self, evaluation: &Evaluation) -> bool {
        self.status.map_or(true, |s| evaluation.status == s)
            && self
                .evaluator_id
                .map_or(true, |e| evaluation.evaluator_id == e)
    }
}
