//! Device domain entity
//!
//! A catalog entry describing a device model that users can send in for recycling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceId(pub i64);

impl From<i64> for DeviceId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Device category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCategory {
    Laptop,
    Desktop,
    Tablet,
    Phone,
}

impl std::fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceCategory::Laptop => write!(f, "laptop"),
            DeviceCategory::Desktop => write!(f, "desktop"),
            DeviceCategory::Tablet => write!(f, "tablet"),
            DeviceCategory::Phone => write!(f, "phone"),
        }
    }
}

impl std::str::FromStr for DeviceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "laptop" => Ok(DeviceCategory::Laptop),
            "desktop" => Ok(DeviceCategory::Desktop),
            "tablet" => Ok(DeviceCategory::Tablet),
            "phone" => Ok(DeviceCategory::Phone),
            _ => Err(format!("Unknown device category: {}", s)),
        }
    }
}

/// Physical condition grade.
///
/// Parsing is exact and case-sensitive: pricing treats any other spelling
/// as an unknown grade rather than normalizing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCondition {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl DeviceCondition {
    pub const ALL: [DeviceCondition; 4] = [
        DeviceCondition::Excellent,
        DeviceCondition::Good,
        DeviceCondition::Fair,
        DeviceCondition::Poor,
    ];
}

impl std::fmt::Display for DeviceCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceCondition::Excellent => write!(f, "excellent"),
            DeviceCondition::Good => write!(f, "good"),
            DeviceCondition::Fair => write!(f, "fair"),
            DeviceCondition::Poor => write!(f, "poor"),
        }
    }
}

impl std::str::FromStr for DeviceCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "excellent" => Ok(DeviceCondition::Excellent),
            "good" => Ok(DeviceCondition::Good),
            "fair" => Ok(DeviceCondition::Fair),
            "poor" => Ok(DeviceCondition::Poor),
            _ => Err(format!("Unknown device condition: {}", s)),
        }
    }
}

/// Catalog visibility. Devices are never physically removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Active,
    Inactive,
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceStatus::Active => write!(f, "active"),
            DeviceStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for DeviceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(DeviceStatus::Active),
            "inactive" => Ok(DeviceStatus::Inactive),
            _ => Err(format!("Unknown device status: {}", s)),
        }
    }
}

/// A device model in the recycling catalog
#[derive(Debug, Clone, Serialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub brand: String,
    pub model: Option<String>,
    pub category: DeviceCategory,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub storage: Option<String>,
    pub graphics: Option<String>,
    pub screen: Option<String>,
    /// Stored as text; rows written before validation existed may hold
    /// values outside [`DeviceCondition`], which price at the fallback rate.
    pub condition: String,
    pub year_bought: i32,
    pub base_price: f64,
    pub description: Option<String>,
    pub images: Option<String>,
    pub status: DeviceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Device {
    pub fn is_active(&self) -> bool {
        self.status == DeviceStatus::Active
    }
}

/// Data needed to create a new device
#[derive(Debug, Clone)]
pub struct NewDevice {
    pub name: String,
    pub brand: String,
    pub model: Option<String>,
    pub category: DeviceCategory,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub storage: Option<String>,
    pub graphics: Option<String>,
    pub screen: Option<String>,
    pub condition: DeviceCondition,
    pub year_bought: i32,
    pub base_price: f64,
    pub description: Option<String>,
    pub images: Option<String>,
}

/// Partial update applied by an administrator
#[derive(Debug, Clone, Default)]
pub struct DeviceUpdate {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub category: Option<DeviceCategory>,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub storage: Option<String>,
    pub graphics: Option<String>,
    pub screen: Option<String>,
    pub condition: Option<DeviceCondition>,
    pub year_bought: Option<i32>,
    pub base_price: Option<f64>,
    pub description: Option<String>,
    pub images: Option<String>,
    pub status: Option<DeviceStatus>,
}

impl DeviceUpdate {
    /// Apply the set fields onto a device in place
    pub fn apply_to(&self, device: &mut Device) {
        if let Some(name) = &self.name {
            device.name = name.clone();
        }
        if let Some(brand) = &self.brand {
            device.brand = brand.clone();
        }
        if let Some(model) = &self.model {
            device.model = Some(model.clone());
        }
        if let Some(category) = self.category {
            device.category = category;
        }
        if let Some(cpu) = &self.cpu {
            device.cpu = Some(cpu.clone());
        }
        if let Some(memory) = &self.memory {
            device.memory = Some(memory.clone());
        }
        if let Some(storage) = &self.storage {
            device.storage = Some(storage.clone());
        }
        if let Some(graphics) = &self.graphics {
            device.graphics = Some(graphics.clone());
        }
        if let Some(screen) = &self.screen {
            device.screen = Some(screen.clone());
        }
        if let Some(condition) = self.condition {
            device.condition = condition.to_string();
        }
        if let Some(year) = self.year_bought {
            device.year_bought = year;
        }
        if let Some(price) = self.base_price {
            device.base_price = price;
        }
        if let Some(description) = &self.description {
            device.description = Some(description.clone());
        }
        if let Some(images) = &self.images {
            device.images = Some(images.clone());
        }
        if let Some(status) = self.status {
            device.status = status;
        }
    }
}

/// Catalog search filters; only active devices are ever listed
#[derive(Debug, Clone, Default)]
pub struct DeviceFilter {
    pub category: Option<DeviceCategory>,
    /// Case-sensitive substring match on brand
    pub brand: Option<String>,
    pub condition: Option<DeviceCondition>,
}

impl DeviceFilter {
    pub fn matches(&self, device: &Device) -> bool {
        device.is_active()
            && self.category.map_or(true, |c| device.category == c)
            && self
                .brand
                .as_deref()
                .map_or(true, |b| device.brand.contains(b))
            && self
                .condition
                .map_or(true, |c| device.condition == c.to_string())
    }
}
