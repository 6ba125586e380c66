//! Recycle order domain entity
//!
//! One user's request to have one device picked up and recycled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::device::DeviceId;
use super::user::UserId;
use crate::error::DomainError;

/// Unique identifier for a recycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub i64);

impl From<i64> for OrderId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order lifecycle status.
///
/// The nominal flow is `pending → confirmed → picked_up → evaluated → completed`,
/// with `cancelled` reachable from `pending`. Only user cancellation is
/// guarded (see [`OrderStatus::ensure_cancellable`]). Evaluation creation
/// and the admin update path set the status directly without consulting
/// the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    PickedUp,
    Evaluated,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn can_cancel(&self) -> bool {
        *self == OrderStatus::Pending
    }

    /// Guard for the user cancellation path
    pub fn ensure_cancellable(&self) -> Result<(), DomainError> {
        if self.can_cancel() {
            Ok(())
        } else {
            Err(DomainError::InvalidState(format!(
                "Order in status '{}' cannot be cancelled",
                self
            )))
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Confirmed => write!(f, "confirmed"),
            OrderStatus::PickedUp => write!(f, "picked_up"),
            OrderStatus::Evaluated => write!(f, "evaluated"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "picked_up" => Ok(OrderStatus::PickedUp),
            "evaluated" => Ok(OrderStatus::Evaluated),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

/// A recycle order
#[derive(Debug, Clone, Serialize)]
pub struct RecycleOrder {
    pub id: OrderId,
    pub user_id: UserId,
    pub device_id: DeviceId,
    pub order_no: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub pickup_address: String,
    pub pickup_time: Option<DateTime<Utc>>,
    pub device_info: Option<String>,
    pub images: Option<String>,
    /// Computed once at creation, never rewritten
    pub estimated_price: f64,
    /// Set by evaluation or by admin override
    pub final_price: Option<f64>,
    pub status: OrderStatus,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecycleOrder {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// Data needed to create a new order
#[derive(Debug, Clone)]
pub struct NewRecycleOrder {
    pub user_id: UserId,
    pub device_id: DeviceId,
    pub order_no: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub pickup_address: String,
    pub pickup_time: Option<DateTime<Utc>>,
    pub device_info: Option<String>,
    pub images: Option<String>,
    pub estimated_price: f64,
    pub remark: Option<String>,
}

/// Administrative override. `status` is always written; the optional
/// fields only when supplied.
#[derive(Debug, Clone)]
pub struct OrderUpdate {
    pub status: OrderStatus,
    pub final_price: Option<f64>,
    pub remark: Option<String>,
    pub pickup_time: Option<DateTime<Utc>>,
}

impl OrderUpdate {
    pub fn apply_to(&self, order: &mut RecycleOrder) {
        order.status = self.status;
        if let Some(price) = self.final_price {
            order.final_price = Some(price);
        }
        if let Some(remark) = &self.remark {
            order.remark = Some(remark.clone());
        }
        if let Some(time) = self.pickup_time {
            order.pickup_time = Some(time);
        }
    }
}

/// Order listing filters
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub user_id: Option<UserId>,
}

impl OrderFilter {
    pub fn matches(&self, order: &RecycleOrder) -> bool {
        self.status.map_or(true, |s| order.status == s)
            && self.user_id.map_or(true, |u| order.user_id == u)
    }
}
