//! PostgreSQL adapter for EvaluationRepository
//!
//! Every write touches two tables (`evaluations` and `recycle_orders`) and
//! runs inside one transaction. The unique index on `evaluations.order_id`
//! turns a concurrent second evaluation into a `Conflict` and rolls back the
//! order write with it.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::domain::entities::{
    Evaluation, EvaluationFilter, EvaluationId, EvaluationRevision, EvaluationStatus,
    NewEvaluation, OrderId, OrderStatus, PageRequest, Paged, UserId,
};
use crate::domain::ports::EvaluationRepository;
use crate::entity::{evaluations, recycle_orders};
use crate::error::DomainError;

/// PostgreSQL implementation of EvaluationRepository
pub struct PostgresEvaluationRepository {
    db: DatabaseConnection,
}

impl PostgresEvaluationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EvaluationRepository for PostgresEvaluationRepository {
    async fn find_by_id(&self, id: &EvaluationId) -> Result<Option<Evaluation>, DomainError> {
        let result = evaluations::Entity::find_by_id(id.0).one(&self.db).await?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_order(&self, order_id: &OrderId) -> Result<Option<Evaluation>, DomainError> {
        let result = evaluations::Entity::find()
            .filter(evaluations::Column::OrderId.eq(order_id.0))
            .one(&self.db)
            .await?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(
        &self,
        filter: &EvaluationFilter,
        page: &PageRequest,
    ) -> Result<Paged<Evaluation>, DomainError> {
        let mut query = evaluations::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(evaluations::Column::Status.eq(status.to_string()));
        }
        if let Some(evaluator_id) = filter.evaluator_id {
            query = query.filter(evaluations::Column::EvaluatorId.eq(evaluator_id.0));
        }

        let total = query.clone().count(&self.db).await?;
        let results = query
            .order_by_desc(evaluations::Column::CreatedAt)
            .order_by_desc(evaluations::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(Paged {
            items: results.into_iter().map(|m| m.into()).collect(),
            total,
        })
    }

    async fn create_for_order(
        &self,
        evaluation: &NewEvaluation,
    ) -> Result<Evaluation, DomainError> {
        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await?;

        if recycle_orders::Entity::find_by_id(evaluation.order_id.0)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(DomainError::NotFound(format!(
                "Order {} not found",
                evaluation.order_id
            )));
        }

        let existing = evaluations::Entity::find()
            .filter(evaluations::Column::OrderId.eq(evaluation.order_id.0))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(DomainError::Conflict(format!(
                "Order {} has already been evaluated",
                evaluation.order_id
            )));
        }

        let inserted = evaluations::ActiveModel {
            order_id: Set(evaluation.order_id.0),
            evaluator_id: Set(evaluation.evaluator_id.0),
            appearance_score: Set(evaluation.scores.appearance),
            function_score: Set(evaluation.scores.function),
            performance_score: Set(evaluation.scores.performance),
            overall_score: Set(evaluation.overall_score),
            market_price: Set(evaluation.market_price),
            depreciation_rate: Set(evaluation.depreciation_rate),
            final_price: Set(evaluation.final_price),
            evaluation_report: Set(evaluation.evaluation_report.clone()),
            images: Set(evaluation.images.clone()),
            status: Set(evaluation.status.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        recycle_orders::ActiveModel {
            id: Set(evaluation.order_id.0),
            final_price: Set(Some(evaluation.final_price)),
            status: Set(OrderStatus::Evaluated.to_string()),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        txn.commit().await?;

        Ok(inserted.into())
    }

    async fn revise(
        &self,
        id: &EvaluationId,
        revision: &EvaluationRevision,
    ) -> Result<Evaluation, DomainError> {
        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await?;

        let updated = evaluations::ActiveModel {
            id: Set(id.0),
            appearance_score: Set(revision.scores.appearance),
            function_score: Set(revision.scores.function),
            performance_score: Set(revision.scores.performance),
            overall_score: Set(revision.overall_score),
            market_price: Set(revision.market_price),
            depreciation_rate: Set(revision.depreciation_rate),
            final_price: Set(revision.final_price),
            evaluation_report: Set(revision.evaluation_report.clone()),
            images: Set(revision.images.clone()),
            status: Set(revision.status.to_string()),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        recycle_orders::ActiveModel {
            id: Set(updated.order_id),
            final_price: Set(Some(updated.final_price)),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        txn.commit().await?;

        Ok(updated.into())
    }
}

/// Convert SeaORM model to domain entity
impl From<evaluations::Model> for Evaluation {
    fn from(model: evaluations::Model) -> Self {
        Evaluation {
            id: EvaluationId(model.id),
            order_id: OrderId(model.order_id),
            evaluator_id: UserId(model.evaluator_id),
            appearance_score: model.appearance_score,
            function_score: model.function_score,
            performance_score: model.performance_score,
            overall_score: model.overall_score,
            market_price: model.market_price,
            depreciation_rate: model.depreciation_rate,
            final_price: model.final_price,
            evaluation_report: model.evaluation_report,
            images: model.images,
            status: model.status.parse().unwrap_or(EvaluationStatus::Completed),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
