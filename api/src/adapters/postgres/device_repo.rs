//! PostgreSQL adapter for DeviceRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::entities::{
    Device, DeviceCategory, DeviceFilter, DeviceId, DeviceStatus, DeviceUpdate, NewDevice,
    PageRequest, Paged,
};
use crate::domain::ports::DeviceRepository;
use crate::entity::devices;
use crate::error::DomainError;

/// PostgreSQL implementation of DeviceRepository
pub struct PostgresDeviceRepository {
    db: DatabaseConnection,
}

impl PostgresDeviceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DeviceRepository for PostgresDeviceRepository {
    async fn find_by_id(&self, id: &DeviceId) -> Result<Option<Device>, DomainError> {
        let result = devices::Entity::find_by_id(id.0).one(&self.db).await?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_active(&self, id: &DeviceId) -> Result<Option<Device>, DomainError> {
        let result = devices::Entity::find_by_id(id.0)
            .filter(devices::Column::Status.eq(DeviceStatus::Active.to_string()))
            .one(&self.db)
            .await?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(
        &self,
        filter: &DeviceFilter,
        page: &PageRequest,
    ) -> Result<Paged<Device>, DomainError> {
        let mut query = devices::Entity::find()
            .filter(devices::Column::Status.eq(DeviceStatus::Active.to_string()));
        if let Some(category) = filter.category {
            query = query.filter(devices::Column::Category.eq(category.to_string()));
        }
        if let Some(brand) = &filter.brand {
            query = query.filter(devices::Column::Brand.contains(brand));
        }
        if let Some(condition) = filter.condition {
            query = query.filter(devices::Column::Condition.eq(condition.to_string()));
        }

        let total = query.clone().count(&self.db).await?;
        let results = query
            .order_by_desc(devices::Column::CreatedAt)
            .order_by_desc(devices::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(Paged {
            items: results.into_iter().map(|m| m.into()).collect(),
            total,
        })
    }

    async fn create(&self, device: &NewDevice) -> Result<Device, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = devices::ActiveModel {
            name: Set(device.name.clone()),
            brand: Set(device.brand.clone()),
            model: Set(device.model.clone()),
            category: Set(device.category.to_string()),
            cpu: Set(device.cpu.clone()),
            memory: Set(device.memory.clone()),
            storage: Set(device.storage.clone()),
            graphics: Set(device.graphics.clone()),
            screen: Set(device.screen.clone()),
            condition: Set(device.condition.to_string()),
            year_bought: Set(device.year_bought),
            base_price: Set(device.base_price),
            description: Set(device.description.clone()),
            images: Set(device.images.clone()),
            status: Set(DeviceStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await?;

        Ok(result.into())
    }

    async fn update(&self, id: &DeviceId, update: &DeviceUpdate) -> Result<Device, DomainError> {
        let mut model = devices::ActiveModel {
            id: Set(id.0),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        if let Some(name) = &update.name {
            model.name = Set(name.clone());
        }
        if let Some(brand) = &update.brand {
            model.brand = Set(brand.clone());
        }
        if let Some(v) = &update.model {
            model.model = Set(Some(v.clone()));
        }
        if let Some(category) = update.category {
            model.category = Set(category.to_string());
        }
        if let Some(cpu) = &update.cpu {
            model.cpu = Set(Some(cpu.clone()));
        }
        if let Some(memory) = &update.memory {
            model.memory = Set(Some(memory.clone()));
        }
        if let Some(storage) = &update.storage {
            model.storage = Set(Some(storage.clone()));
        }
        if let Some(graphics) = &update.graphics {
            model.graphics = Set(Some(graphics.clone()));
        }
        if let Some(screen) = &update.screen {
            model.screen = Set(Some(screen.clone()));
        }
        if let Some(condition) = update.condition {
            model.condition = Set(condition.to_string());
        }
        if let Some(year) = update.year_bought {
            model.year_bought = Set(year);
        }
        if let Some(price) = update.base_price {
            model.base_price = Set(price);
        }
        if let Some(description) = &update.description {
            model.description = Set(Some(description.clone()));
        }
        if let Some(images) = &update.images {
            model.images = Set(Some(images.clone()));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let result = model.update(&self.db).await?;

        Ok(result.into())
    }

    async fn set_status(&self, id: &DeviceId, status: DeviceStatus) -> Result<(), DomainError> {
        devices::ActiveModel {
            id: Set(id.0),
            status: Set(status.to_string()),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<devices::Model> for Device {
    fn from(model: devices::Model) -> Self {
        Device {
            id: DeviceId(model.id),
            name: model.name,
            brand: model.brand,
            model: model.model,
            category: model.category.parse().unwrap_or(DeviceCategory::Laptop),
            cpu: model.cpu,
            memory: model.memory,
            storage: model.storage,
            graphics: model.graphics,
            screen: model.screen,
            // kept raw: pricing decides what an unknown grade is worth
            condition: model.condition,
            year_bought: model.year_bought,
            base_price: model.base_price,
            description: model.description,
            images: model.images,
            status: model.status.parse().unwrap_or(DeviceStatus::Inactive),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
