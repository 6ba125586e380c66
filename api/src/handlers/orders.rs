//! Recycle order handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pagination::{parse_field, parse_param, ListResponse};
use crate::app::{OrderDetails, OrderRequest};
use crate::domain::entities::{
    Caller, Device, DeviceId, Evaluation, OrderFilter, OrderId, OrderUpdate, PageRequest,
    RecycleOrder, User, UserId,
};
use crate::error::AppError;
use crate::AppState;

/// Request to submit a device for recycling
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub device_id: i64,
    pub contact_name: String,
    pub contact_phone: String,
    pub pickup_address: String,
    pub pickup_time: Option<DateTime<Utc>>,
    pub device_info: Option<String>,
    pub images: Option<String>,
    pub remark: Option<String>,
}

impl From<CreateOrderRequest> for OrderRequest {
    fn from(request: CreateOrderRequest) -> Self {
        OrderRequest {
            device_id: DeviceId(request.device_id),
            contact_name: request.contact_name,
            contact_phone: request.contact_phone,
            pickup_address: request.pickup_address,
            pickup_time: request.pickup_time,
            device_info: request.device_info,
            images: request.images,
            remark: request.remark,
        }
    }
}

/// Query parameters for the caller's orders
#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub status: Option<String>,
}

/// Query parameters for the admin order list
#[derive(Debug, Default, Deserialize)]
pub struct AdminListOrdersQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub status: Option<String>,
    pub user_id: Option<i64>,
}

/// Administrative order update
#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub status: String,
    pub final_price: Option<f64>,
    pub remark: Option<String>,
    pub pickup_time: Option<DateTime<Utc>>,
}

/// An order with its device and evaluation inlined
#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: RecycleOrder,
    pub device: Option<Device>,
    pub evaluation: Option<Evaluation>,
}

impl From<OrderDetails> for OrderDetailResponse {
    fn from(details: OrderDetails) -> Self {
        Self {
            order: details.order,
            device: details.device,
            evaluation: details.evaluation,
        }
    }
}

/// POST /orders
pub async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<RecycleOrder>), AppError> {
    let order = state
        .order_service
        .create(&Caller::from(&user), request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders
///
/// The caller's own orders, newest first.
pub async fn list_my_orders(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<ListResponse<RecycleOrder>>, AppError> {
    let status = parse_param(query.status.as_deref())?;
    let page = PageRequest::new(query.page, query.page_size, state.max_page_size);

    let orders = state
        .order_service
        .list_mine(&Caller::from(&user), status, &page)
        .await?;

    Ok(Json(ListResponse::new(orders, &page)))
}

/// GET /orders/:id
pub async fn get_order(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<OrderDetailResponse>, AppError> {
    let details = state
        .order_service
        .get(&Caller::from(&user), &OrderId(id))
        .await?;
    Ok(Json(details.into()))
}

/// PUT /orders/:id/cancel
///
/// Only pending orders can be cancelled.
pub async fn cancel_order(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<RecycleOrder>, AppError> {
    let order = state
        .order_service
        .cancel(&Caller::from(&user), &OrderId(id))
        .await?;
    Ok(Json(order))
}

/// GET /admin/orders
pub async fn list_all_orders(
    State(state): State<AppState>,
    Query(query): Query<AdminListOrdersQuery>,
) -> Result<Json<ListResponse<RecycleOrder>>, AppError> {
    let filter = OrderFilter {
        status: parse_param(query.status.as_deref())?,
        user_id: query.user_id.map(UserId),
    };
    let page = PageRequest::new(query.page, query.page_size, state.max_page_size);

    let orders = state.order_service.list_all(&filter, &page).await?;

    Ok(Json(ListResponse::new(orders, &page)))
}

/// PUT /admin/orders/:id
///
/// Sets any status; no transition check.
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<RecycleOrder>, AppError> {
    let update = OrderUpdate {
        status: parse_field(&request.status)?,
        final_price: request.final_price,
        remark: request.remark,
        pickup_time: request.pickup_time,
    };

    let order = state.order_service.update(&OrderId(id), update).await?;
    Ok(Json(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::OrderStatus;
    use crate::test_utils::{test_device, test_order};

    #[test]
    fn parse_create_order_request() {
        let json = r#"{
            "device_id": 3,
            "contact_name": "Wang",
            "contact_phone": "13800000000",
            "pickup_address": "88 Century Ave",
            "pickup_time": "2024-05-01T09:00:00Z"
        }"#;
        let request: CreateOrderRequest = serde_json::from_str(json).unwrap();
        let order = OrderRequest::from(request);
        assert_eq!(order.device_id, DeviceId(3));
        assert!(order.pickup_time.is_some());
        assert!(order.remark.is_none());
    }

    #[test]
    fn parse_update_order_request_requires_status() {
        let json = r#"{"final_price": 100.0}"#;
        let result: Result<UpdateOrderRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn update_status_is_parsed_snake_case() {
        let status: OrderStatus = parse_field("picked_up").unwrap();
        assert_eq!(status, OrderStatus::PickedUp);
        assert!(parse_field::<OrderStatus>("picked up").is_err());
    }

    #[test]
    fn serialize_order_detail_flattens_order() {
        let order = test_order(UserId(1), OrderStatus::Pending);
        let response = OrderDetailResponse {
            order,
            device: Some(test_device()),
            evaluation: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["user_id"], 1);
        assert!(json["order_no"].as_str().unwrap().starts_with("RC"));
        assert_eq!(json["device"]["brand"], "Lenovo");
        assert!(json["evaluation"].is_null());
    }
}
