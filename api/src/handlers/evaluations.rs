//! Evaluation handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use super::pagination::{parse_param, ListResponse};
use crate::app::EvaluationInput;
use crate::domain::entities::{
    Caller, Evaluation, EvaluationFilter, EvaluationId, EvaluationScores, OrderId, PageRequest,
    User, UserId,
};
use crate::error::AppError;
use crate::AppState;

/// Scores and prices entered by the evaluator
#[derive(Debug, Deserialize)]
pub struct EvaluationRequest {
    pub appearance_score: i32,
    pub function_score: i32,
    pub performance_score: i32,
    pub market_price: f64,
    pub depreciation_rate: f64,
    pub evaluation_report: Option<String>,
    pub images: Option<String>,
}

impl From<EvaluationRequest> for EvaluationInput {
    fn from(request: EvaluationRequest) -> Self {
        EvaluationInput {
            scores: EvaluationScores {
                appearance: request.appearance_score,
                function: request.function_score,
                performance: request.performance_score,
            },
            market_price: request.market_price,
            depreciation_rate: request.depreciation_rate,
            evaluation_report: request.evaluation_report,
            images: request.images,
        }
    }
}

/// Request to evaluate an order
#[derive(Debug, Deserialize)]
pub struct CreateEvaluationRequest {
    pub order_id: i64,
    #[serde(flatten)]
    pub evaluation: EvaluationRequest,
}

/// Re-score request; `status` is optional
#[derive(Debug, Deserialize)]
pub struct UpdateEvaluationRequest {
    #[serde(flatten)]
    pub evaluation: EvaluationRequest,
    pub status: Option<String>,
}

/// Query parameters for the evaluation list
#[derive(Debug, Default, Deserialize)]
pub struct ListEvaluationsQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub status: Option<String>,
    pub evaluator_id: Option<i64>,
}

/// POST /admin/evaluations
///
/// Records the evaluation, sets the order's final price and moves it to
/// `evaluated`.
pub async fn create_evaluation(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateEvaluationRequest>,
) -> Result<(StatusCode, Json<Evaluation>), AppError> {
    let evaluation = state
        .evaluation_service
        .create(
            &Caller::from(&user),
            &OrderId(request.order_id),
            request.evaluation.into(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(evaluation)))
}

/// PUT /admin/evaluations/:id
pub async fn update_evaluation(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateEvaluationRequest>,
) -> Result<Json<Evaluation>, AppError> {
    let status = parse_param(request.status.as_deref())?;
    let evaluation = state
        .evaluation_service
        .update(
            &Caller::from(&user),
            &EvaluationId(id),
            request.evaluation.into(),
            status,
        )
        .await?;
    Ok(Json(evaluation))
}

/// GET /admin/evaluations
pub async fn list_evaluations(
    State(state): State<AppState>,
    Query(query): Query<ListEvaluationsQuery>,
) -> Result<Json<ListResponse<Evaluation>>, AppError> {
    let filter = EvaluationFilter {
        status: parse_param(query.status.as_deref())?,
        evaluator_id: query.evaluator_id.map(UserId),
    };
    let page = PageRequest::new(query.page, query.page_size, state.max_page_size);

    let evaluations = state.evaluation_service.list(&filter, &page).await?;

    Ok(Json(ListResponse::new(evaluations, &page)))
}

/// GET /admin/evaluations/:id
pub async fn get_evaluation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Evaluation>, AppError> {
    let evaluation = state.evaluation_service.get(&EvaluationId(id)).await?;
    Ok(Json(evaluation))
}

/// GET /evaluations/order/:order_id
///
/// Visible to the order's owner and to admins.
pub async fn get_order_evaluation(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(order_id): Path<i64>,
) -> Result<Json<Evaluation>, AppError> {
    let evaluation = state
        .evaluation_service
        .get_by_order(&Caller::from(&user), &OrderId(order_id))
        .await?;
    Ok(Json(evaluation))
}
