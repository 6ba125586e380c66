//! PostgreSQL adapter for RecycleOrderRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::entities::{
    DeviceId, NewRecycleOrder, OrderFilter, OrderId, OrderStatus, OrderUpdate, PageRequest, Paged,
    RecycleOrder, UserId,
};
use crate::domain::ports::RecycleOrderRepository;
use crate::entity::recycle_orders;
use crate::error::DomainError;

/// PostgreSQL implementation of RecycleOrderRepository
pub struct PostgresRecycleOrderRepository {
    db: DatabaseConnection,
}

impl PostgresRecycleOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecycleOrderRepository for PostgresRecycleOrderRepository {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<RecycleOrder>, DomainError> {
        let result = recycle_orders::Entity::find_by_id(id.0)
            .one(&self.db)
            .await?;

        result.map(RecycleOrder::try_from).transpose()
    }

    async fn list(
        &self,
        filter: &OrderFilter,
        page: &PageRequest,
    ) -> Result<Paged<RecycleOrder>, DomainError> {
        let mut query = recycle_orders::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(recycle_orders::Column::Status.eq(status.to_string()));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(recycle_orders::Column::UserId.eq(user_id.0));
        }

        let total = query.clone().count(&self.db).await?;
        let results = query
            .order_by_desc(recycle_orders::Column::CreatedAt)
            .order_by_desc(recycle_orders::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(Paged {
            items: results
                .into_iter()
                .map(RecycleOrder::try_from)
                .collect::<Result<_, _>>()?,
            total,
        })
    }

    async fn create(&self, order: &NewRecycleOrder) -> Result<RecycleOrder, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = recycle_orders::ActiveModel {
            user_id: Set(order.user_id.0),
            device_id: Set(order.device_id.0),
            order_no: Set(order.order_no.clone()),
            contact_name: Set(order.contact_name.clone()),
            contact_phone: Set(order.contact_phone.clone()),
            pickup_address: Set(order.pickup_address.clone()),
            pickup_time: Set(order.pickup_time.map(|t| t.fixed_offset())),
            device_info: Set(order.device_info.clone()),
            images: Set(order.images.clone()),
            estimated_price: Set(order.estimated_price),
            final_price: Set(None),
            status: Set(OrderStatus::Pending.to_string()),
            remark: Set(order.remark.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await?;

        RecycleOrder::try_from(result)
    }

    async fn transition_status(
        &self,
        id: &OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, DomainError> {
        let result = recycle_orders::Entity::update_many()
            .col_expr(recycle_orders::Column::Status, Expr::value(to.to_string()))
            .col_expr(
                recycle_orders::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(recycle_orders::Column::Id.eq(id.0))
            .filter(recycle_orders::Column::Status.eq(from.to_string()))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            return Ok(true);
        }

        match recycle_orders::Entity::find_by_id(id.0).one(&self.db).await? {
            Some(_) => Ok(false),
            None => Err(DomainError::NotFound(format!("Order {} not found", id))),
        }
    }

    async fn apply_update(
        &self,
        id: &OrderId,
        update: &OrderUpdate,
    ) -> Result<RecycleOrder, DomainError> {
        let mut model = recycle_orders::ActiveModel {
            id: Set(id.0),
            status: Set(update.status.to_string()),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        if let Some(price) = update.final_price {
            model.final_price = Set(Some(price));
        }
        if let Some(remark) = &update.remark {
            model.remark = Set(Some(remark.clone()));
        }
        if let Some(time) = update.pickup_time {
            model.pickup_time = Set(Some(time.fixed_offset()));
        }

        let result = model.update(&self.db).await?;

        RecycleOrder::try_from(result)
    }
}

/// Convert SeaORM model to domain entity.
///
/// An unreadable status is an error rather than a default, since the
/// default would be the one cancellable state.
impl TryFrom<recycle_orders::Model> for RecycleOrder {
    type Error = DomainError;

    fn try_from(model: recycle_orders::Model) -> Result<Self, Self::Error> {
        let status = model.status.parse::<OrderStatus>().map_err(|e| {
            DomainError::Database(format!("Order {} has unreadable status: {}", model.id, e))
        })?;

        Ok(RecycleOrder {
            id: OrderId(model.id),
            user_id: UserId(model.user_id),
            device_id: DeviceId(model.device_id),
            order_no: model.order_no,
            contact_name: model.contact_name,
            contact_phone: model.contact_phone,
            pickup_address: model.pickup_address,
            pickup_time: model.pickup_time.map(|t| t.with_timezone(&Utc)),
            device_info: model.device_info,
            images: model.images,
            estimated_price: model.estimated_price,
            final_price: model.final_price,
            status,
            remark: model.remark,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}
