//! Device catalog handlers
//!
//! Public browsing plus the admin maintenance endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::pagination::{parse_field, parse_param, ListResponse};
use crate::domain::entities::{
    Device, DeviceCategory, DeviceCondition, DeviceFilter, DeviceId, DeviceUpdate, NewDevice,
    PageRequest,
};
use crate::error::AppError;
use crate::AppState;

/// Query parameters for the catalog
#[derive(Debug, Default, Deserialize)]
pub struct ListDevicesQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub category: Option<String>,
    /// Substring of the brand name
    pub brand: Option<String>,
    pub condition: Option<String>,
}

/// Request to add a device to the catalog
#[derive(Debug, Deserialize)]
pub struct CreateDeviceRequest {
    pub name: String,
    pub brand: String,
    pub model: Option<String>,
    pub category: String,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub storage: Option<String>,
    pub graphics: Option<String>,
    pub screen: Option<String>,
    pub condition: String,
    pub year_bought: i32,
    pub base_price: f64,
    pub description: Option<String>,
    pub images: Option<String>,
}

impl CreateDeviceRequest {
    fn into_new_device(self) -> Result<NewDevice, AppError> {
        Ok(NewDevice {
            category: parse_field::<DeviceCategory>(&self.category)?,
            condition: parse_field::<DeviceCondition>(&self.condition)?,
            name: self.name,
            brand: self.brand,
            model: self.model,
            cpu: self.cpu,
            memory: self.memory,
            storage: self.storage,
            graphics: self.graphics,
            screen: self.screen,
            year_bought: self.year_bought,
            base_price: self.base_price,
            description: self.description,
            images: self.images,
        })
    }
}

/// Partial device update
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDeviceRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub category: Option<String>,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub storage: Option<String>,
    pub graphics: Option<String>,
    pub screen: Option<String>,
    pub condition: Option<String>,
    pub year_bought: Option<i32>,
    pub base_price: Option<f64>,
    pub description: Option<String>,
    pub images: Option<String>,
    pub status: Option<String>,
}

impl UpdateDeviceRequest {
    fn into_update(self) -> Result<DeviceUpdate, AppError> {
        Ok(DeviceUpdate {
            category: parse_param(self.category.as_deref())?,
            condition: parse_param(self.condition.as_deref())?,
            status: parse_param(self.status.as_deref())?,
            name: self.name,
            brand: self.brand,
            model: self.model,
            cpu: self.cpu,
            memory: self.memory,
            storage: self.storage,
            graphics: self.graphics,
            screen: self.screen,
            year_bought: self.year_bought,
            base_price: self.base_price,
            description: self.description,
            images: self.images,
        })
    }
}

/// GET /devices
///
/// List active devices, newest first.
pub async fn list_devices(
    State(state): State<AppState>,
    Query(query): Query<ListDevicesQuery>,
) -> Result<Json<ListResponse<Device>>, AppError> {
    let filter = DeviceFilter {
        category: parse_param(query.category.as_deref())?,
        brand: query.brand.filter(|b| !b.trim().is_empty()),
        condition: parse_param(query.condition.as_deref())?,
    };
    let page = PageRequest::new(query.page, query.page_size, state.max_page_size);

    let devices = state.device_service.list(&filter, &page).await?;

    Ok(Json(ListResponse::new(devices, &page)))
}

/// GET /devices/:id
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Device>, AppError> {
    let device = state.device_service.get(&DeviceId(id)).await?;
    Ok(Json(device))
}

/// POST /admin/devices
pub async fn create_device(
    State(state): State<AppState>,
    Json(request): Json<CreateDeviceRequest>,
) -> Result<(StatusCode, Json<Device>), AppError> {
    let device = state
        .device_service
        .create(request.into_new_device()?)
        .await?;
    Ok((StatusCode::CREATED, Json(device)))
}

/// PUT /admin/devices/:id
pub async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateDeviceRequest>,
) -> Result<Json<Device>, AppError> {
    let device = state
        .device_service
        .update(&DeviceId(id), request.into_update()?)
        .await?;
    Ok(Json(device))
}

/// DELETE /admin/devices/:id
///
/// Soft delete: the device is hidden from the catalog.
pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.device_service.delete(&DeviceId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
