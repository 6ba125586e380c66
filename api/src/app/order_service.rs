//! Recycle order service
//!
//! Order creation (with the initial price estimate), listing, user
//! cancellation and the administrative override.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::app::pricing::estimate_price;
use crate::domain::entities::{
    Caller, Device, DeviceId, Evaluation, NewRecycleOrder, OrderFilter, OrderId, OrderStatus,
    OrderUpdate, PageRequest, Paged, RecycleOrder,
};
use crate::domain::ports::{Clock, DeviceRepository, EvaluationRepository, RecycleOrderRepository};
use crate::error::{AppError, DomainError};

/// Input for a new order
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub device_id: DeviceId,
    pub contact_name: String,
    pub contact_phone: String,
    pub pickup_address: String,
    pub pickup_time: Option<DateTime<Utc>>,
    pub device_info: Option<String>,
    pub images: Option<String>,
    pub remark: Option<String>,
}

/// An order with its device and evaluation, when they exist
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub order: RecycleOrder,
    pub device: Option<Device>,
    pub evaluation: Option<Evaluation>,
}

/// Service for recycle orders
pub struct OrderService<OR, DR, ER, C>
where
    OR: RecycleOrderRepository,
    DR: DeviceRepository,
    ER: EvaluationRepository,
    C: Clock,
{
    orders: Arc<OR>,
    devices: Arc<DR>,
    evaluations: Arc<ER>,
    clock: Arc<C>,
}

impl<OR, DR, ER, C> OrderService<OR, DR, ER, C>
where
    OR: RecycleOrderRepository,
    DR: DeviceRepository,
    ER: EvaluationRepository,
    C: Clock,
{
    pub fn new(orders: Arc<OR>, devices: Arc<DR>, evaluations: Arc<ER>, clock: Arc<C>) -> Self {
        Self {
            orders,
            devices,
            evaluations,
            clock,
        }
    }

    /// Submit a device for recycling.
    ///
    /// The estimate is computed here from the device's catalog entry and is
    /// never recomputed afterwards.
    pub async fn create(
        &self,
        caller: &Caller,
        request: OrderRequest,
    ) -> Result<RecycleOrder, AppError> {
        for (field, value) in [
            ("contact_name", &request.contact_name),
            ("contact_phone", &request.contact_phone),
            ("pickup_address", &request.pickup_address),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{} is required", field)));
            }
        }

        let device = self
            .devices
            .find_active(&request.device_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Device {} not found", request.device_id)))?;

        let estimated_price = estimate_price(
            device.base_price,
            &device.condition,
            device.year_bought,
            self.clock.current_year(),
        );

        let new_order = NewRecycleOrder {
            user_id: caller.id,
            device_id: device.id,
            order_no: generate_order_no(self.clock.now()),
            contact_name: request.contact_name.trim().to_string(),
            contact_phone: request.contact_phone.trim().to_string(),
            pickup_address: request.pickup_address.trim().to_string(),
            pickup_time: request.pickup_time,
            device_info: request.device_info,
            images: request.images,
            estimated_price,
            remark: request.remark,
        };

        let order = self.orders.create(&new_order).await?;
        tracing::info!(
            order_id = %order.id,
            order_no = %order.order_no,
            user_id = %caller.id,
            device_id = %device.id,
            estimated_price,
            "Recycle order created"
        );

        Ok(order)
    }

    /// The caller's own orders
    pub async fn list_mine(
        &self,
        caller: &Caller,
        status: Option<OrderStatus>,
        page: &PageRequest,
    ) -> Result<Paged<RecycleOrder>, AppError> {
        let filter = OrderFilter {
            status,
            user_id: Some(caller.id),
        };
        Ok(self.orders.list(&filter, page).await?)
    }

    /// All orders (admin)
    pub async fn list_all(
        &self,
        filter: &OrderFilter,
        page: &PageRequest,
    ) -> Result<Paged<RecycleOrder>, AppError> {
        Ok(self.orders.list(filter, page).await?)
    }

    /// One order with its device and evaluation.
    ///
    /// Non-admins only see their own orders; anything else is reported as
    /// not found.
    pub async fn get(&self, caller: &Caller, id: &OrderId) -> Result<OrderDetails, AppError> {
        let order = self.find_visible(caller, id).await?;
        let device = self.devices.find_by_id(&order.device_id).await?;
        let evaluation = self.evaluations.find_by_order(&order.id).await?;

        Ok(OrderDetails {
            order,
            device,
            evaluation,
        })
    }

    /// User cancellation; only allowed while the order is pending
    pub async fn cancel(&self, caller: &Caller, id: &OrderId) -> Result<RecycleOrder, AppError> {
        let mut order = self
            .orders
            .find_by_id(id)
            .await?
            .filter(|o| o.is_owned_by(caller.id))
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;

        order.status.ensure_cancellable()?;

        // The order may have moved on since it was read
        let cancelled = self
            .orders
            .transition_status(id, OrderStatus::Pending, OrderStatus::Cancelled)
            .await?;
        if !cancelled {
            return Err(AppError::Domain(DomainError::InvalidState(
                "Order is no longer pending and cannot be cancelled".to_string(),
            )));
        }
        order.status = OrderStatus::Cancelled;
        tracing::info!(order_id = %id, user_id = %caller.id, "Order cancelled");

        Ok(order)
    }

    /// Administrative override.
    ///
    /// Sets any status without consulting the current one.
    pub async fn update(&self, id: &OrderId, update: OrderUpdate) -> Result<RecycleOrder, AppError> {
        if let Some(price) = update.final_price {
            if !price.is_finite() || price < 0.0 {
                return Err(AppError::validation(
                    "final_price must be a non-negative number",
                ));
            }
        }

        let current = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;

        let updated = self.orders.apply_update(id, &update).await?;
        tracing::info!(
            order_id = %id,
            from = %current.status,
            to = %updated.status,
            final_price = ?updated.final_price,
            "Order updated by admin"
        );

        Ok(updated)
    }

    pub(crate) async fn find_visible(
        &self,
        caller: &Caller,
        id: &OrderId,
    ) -> Result<RecycleOrder, AppError> {
        self.orders
            .find_by_id(id)
            .await?
            .filter(|o| caller.is_admin() || o.is_owned_by(caller.id))
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))
    }
}

/// `RC` + `YYYYMMDDHHMMSS` + 4 random digits
fn generate_order_no(now: DateTime<Utc>) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("RC{}{:04}", now.format("%Y%m%d%H%M%S"), suffix)
}
