//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::entities::{
    Device, DeviceCategory, DeviceCondition, DeviceId, DeviceStatus, NewDevice, OrderId,
    OrderStatus, RecycleOrder, Role, User, UserId, UserStatus,
};
use crate::domain::ports::Clock;

// Fixture ids start high so they never collide with ids the mocks assign
static NEXT_ID: AtomicI64 = AtomicI64::new(10_000);

fn next_id() -> i64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub now: DateTime<Utc>,
}

impl FixedClock {
    /// Noon on January 1st of the given year
    pub fn year(year: i32) -> Self {
        Self {
            now: Utc
                .with_ymd_and_hms(year, 1, 1, 12, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Create a test user with default values
pub fn test_user() -> User {
    test_user_named("test-user")
}

/// Create a test user with a specific username and a phone derived from its id
pub fn test_user_named(username: &str) -> User {
    let id = next_id();
    User {
        id: UserId(id),
        username: username.to_string(),
        password_hash: "salt$digest".to_string(),
        phone: format!("138{:08}", id),
        email: None,
        real_name: None,
        avatar: None,
        role: Role::User,
        status: UserStatus::Active,
        api_key_hash: Some(format!("hash-{}", id)),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Create a test administrator
pub fn test_admin() -> User {
    User {
        role: Role::Admin,
        ..test_user_named("admin")
    }
}

/// Create an active test device: a good 2020 laptop with base price 1000
pub fn test_device() -> Device {
    test_device_with(next_id(), DeviceCategory::Laptop, DeviceCondition::Good)
}

/// Create an active test device with a specific id, category and condition
pub fn test_device_with(id: i64, category: DeviceCategory, condition: DeviceCondition) -> Device {
    Device {
        id: DeviceId(id),
        name: format!("Device {}", id),
        brand: "Lenovo".to_string(),
        model: Some("X1".to_string()),
        category,
        cpu: None,
        memory: None,
        storage: None,
        graphics: None,
        screen: None,
        condition: condition.to_string(),
        year_bought: 2020,
        base_price: 1000.0,
        description: None,
        images: None,
        status: DeviceStatus::Active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Catalog input for a valid device
pub fn new_device() -> NewDevice {
    NewDevice {
        name: "ThinkPad X1 Carbon".to_string(),
        brand: "Lenovo".to_string(),
        model: Some("Gen 8".to_string()),
        category: DeviceCategory::Laptop,
        cpu: Some("i7-10510U".to_string()),
        memory: Some("16GB".to_string()),
        storage: Some("512GB".to_string()),
        graphics: None,
        screen: Some("14\"".to_string()),
        condition: DeviceCondition::Good,
        year_bought: 2020,
        base_price: 1000.0,
        description: None,
        images: None,
    }
}

/// Create a test order owned by `user_id` in the given status
pub fn test_order(user_id: UserId, status: OrderStatus) -> RecycleOrder {
    let id = next_id();
    RecycleOrder {
        id: OrderId(id),
        user_id,
        device_id: DeviceId(1),
        order_no: format!("RC20240101120000{:04}", id % 10_000),
        contact_name: "Test Contact".to_string(),
        contact_phone: "13800000000".to_string(),
        pickup_address: "1 Test Road".to_string(),
        pickup_time: None,
        device_info: None,
        images: None,
        estimated_price: 480.0,
        final_price: None,
        status,
        remark: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
