//! Device service
//!
//! Catalog browsing for everyone, catalog maintenance for administrators.

use std::sync::Arc;

use crate::app::pricing_config::MIN_YEAR_BOUGHT;
use crate::domain::entities::{
    Device, DeviceFilter, DeviceId, DeviceStatus, DeviceUpdate, NewDevice, PageRequest, Paged,
};
use crate::domain::ports::{Clock, DeviceRepository};
use crate::error::AppError;

/// Service for the device catalog
pub struct DeviceService<DR, C>
where
    DR: DeviceRepository,
    C: Clock,
{
    devices: Arc<DR>,
    clock: Arc<C>,
}

impl<DR, C> DeviceService<DR, C>
where
    DR: DeviceRepository,
    C: Clock,
{
    pub fn new(devices: Arc<DR>, clock: Arc<C>) -> Self {
        Self { devices, clock }
    }

    /// List active devices
    pub async fn list(
        &self,
        filter: &DeviceFilter,
        page: &PageRequest,
    ) -> Result<Paged<Device>, AppError> {
        Ok(self.devices.list(filter, page).await?)
    }

    /// Get an active device
    pub async fn get(&self, id: &DeviceId) -> Result<Device, AppError> {
        self.devices
            .find_active(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Device {} not found", id)))
    }

    /// Add a device to the catalog
    pub async fn create(&self, device: NewDevice) -> Result<Device, AppError> {
        require_text("name", &device.name)?;
        require_text("brand", &device.brand)?;
        self.validate_year(device.year_bought)?;
        validate_base_price(device.base_price)?;

        let created = self.devices.create(&device).await?;
        tracing::info!(
            device_id = %created.id,
            base_price = created.base_price,
            condition = %created.condition,
            "Device added to catalog"
        );

        Ok(created)
    }

    /// Apply a partial update; inactive devices can be updated too
    pub async fn update(&self, id: &DeviceId, update: DeviceUpdate) -> Result<Device, AppError> {
        if let Some(name) = &update.name {
            require_text("name", name)?;
        }
        if let Some(brand) = &update.brand {
            require_text("brand", brand)?;
        }
        if let Some(year) = update.year_bought {
            self.validate_year(year)?;
        }
        if let Some(price) = update.base_price {
            validate_base_price(price)?;
        }

        self.find_any(id).await?;

        Ok(self.devices.update(id, &update).await?)
    }

    /// Soft delete: the device disappears from the catalog but existing
    /// orders keep referencing it
    pub async fn delete(&self, id: &DeviceId) -> Result<(), AppError> {
        self.find_any(id).await?;
        self.devices.set_status(id, DeviceStatus::Inactive).await?;
        tracing::info!(device_id = %id, "Device deactivated");
        Ok(())
    }

    async fn find_any(&self, id: &DeviceId) -> Result<Device, AppError> {
        self.devices
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Device {} not found", id)))
    }

    fn validate_year(&self, year: i32) -> Result<(), AppError> {
        let current = self.clock.current_year();
        if !(MIN_YEAR_BOUGHT..=current).contains(&year) {
            return Err(AppError::validation(format!(
                "year_bought must be between {} and {}",
                MIN_YEAR_BOUGHT, current
            )));
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_base_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::validation(
            "base_price must be a non-negative number",
        ));
    }
    Ok(())
}
