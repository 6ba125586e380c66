//! Evaluation service
//!
//! Scores a device, prices it, and pushes the price onto the order.

use std::sync::Arc;

use crate::app::pricing::{score_evaluation, validate_evaluation_inputs};
use crate::domain::entities::{
    Caller, Evaluation, EvaluationFilter, EvaluationId, EvaluationRevision, EvaluationScores,
    EvaluationStatus, NewEvaluation, OrderId, PageRequest, Paged,
};
use crate::domain::ports::{EvaluationRepository, RecycleOrderRepository};
use crate::error::{AppError, DomainError};

/// Evaluator input shared by create and update
#[derive(Debug, Clone)]
pub struct EvaluationInput {
    pub scores: EvaluationScores,
    pub market_price: f64,
    pub depreciation_rate: f64,
    pub evaluation_report: Option<String>,
    pub images: Option<String>,
}

/// Service for evaluations
pub struct EvaluationService<ER, OR>
where
    ER: EvaluationRepository,
    OR: RecycleOrderRepository,
{
    evaluations: Arc<ER>,
    orders: Arc<OR>,
}

impl<ER, OR> EvaluationService<ER, OR>
where
    ER: EvaluationRepository,
    OR: RecycleOrderRepository,
{
    pub fn new(evaluations: Arc<ER>, orders: Arc<OR>) -> Self {
        Self {
            evaluations,
            orders,
        }
    }

    /// Record the evaluation for an order.
    ///
    /// The order moves to `evaluated` whatever its current status, including
    /// `cancelled`. Only a second evaluation for the same order is refused.
    pub async fn create(
        &self,
        evaluator: &Caller,
        order_id: &OrderId,
        input: EvaluationInput,
    ) -> Result<Evaluation, AppError> {
        validate_evaluation_inputs(&input.scores, input.market_price, input.depreciation_rate)?;

        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;

        if self.evaluations.find_by_order(order_id).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Order {} has already been evaluated",
                order_id
            ))
            .into());
        }

        let scored = score_evaluation(&input.scores, input.market_price, input.depreciation_rate);
        let new_evaluation = NewEvaluation {
            order_id: order.id,
            evaluator_id: evaluator.id,
            scores: input.scores,
            overall_score: scored.overall_score,
            market_price: input.market_price,
            depreciation_rate: input.depreciation_rate,
            final_price: scored.final_price,
            evaluation_report: input.evaluation_report,
            images: input.images,
            status: EvaluationStatus::Completed,
        };

        let evaluation = self.evaluations.create_for_order(&new_evaluation).await?;
        tracing::info!(
            evaluation_id = %evaluation.id,
            order_id = %order.id,
            previous_status = %order.status,
            overall_score = evaluation.overall_score,
            final_price = evaluation.final_price,
            "Order evaluated"
        );

        Ok(evaluation)
    }

    /// Re-score an evaluation.
    ///
    /// Allowed for admins and for the evaluator who recorded it. The order's
    /// final price follows; its status does not change. Without a `status`
    /// the evaluation keeps its current one.
    pub async fn update(
        &self,
        caller: &Caller,
        id: &EvaluationId,
        input: EvaluationInput,
        status: Option<EvaluationStatus>,
    ) -> Result<Evaluation, AppError> {
        validate_evaluation_inputs(&input.scores, input.market_price, input.depreciation_rate)?;

        let current = self
            .evaluations
            .find_by_id(id)
            .await?
            .filter(|e| caller.is_admin() || e.evaluator_id == caller.id)
            .ok_or_else(|| AppError::NotFound(format!("Evaluation {} not found", id)))?;

        let scored = score_evaluation(&input.scores, input.market_price, input.depreciation_rate);
        let revision = EvaluationRevision {
            scores: input.scores,
            overall_score: scored.overall_score,
            market_price: input.market_price,
            depreciation_rate: input.depreciation_rate,
            final_price: scored.final_price,
            evaluation_report: input.evaluation_report,
            images: input.images,
            status: status.unwrap_or(current.status),
        };

        let evaluation = self.evaluations.revise(id, &revision).await?;
        tracing::info!(
            evaluation_id = %id,
            order_id = %evaluation.order_id,
            old_price = current.final_price,
            new_price = evaluation.final_price,
            "Evaluation revised"
        );

        Ok(evaluation)
    }

    pub async fn list(
        &self,
        filter: &EvaluationFilter,
        page: &PageRequest,
    ) -> Result<Paged<Evaluation>, AppError> {
        Ok(self.evaluations.list(filter, page).await?)
    }

    pub async fn get(&self, id: &EvaluationId) -> Result<Evaluation, AppError> {
        self.evaluations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Evaluation {} not found", id)))
    }

    /// The evaluation of an order, visible to its owner and to admins
    pub async fn get_by_order(
        &self,
        caller: &Caller,
        order_id: &OrderId,
    ) -> Result<Evaluation, AppError> {
        self.orders
            .find_by_id(order_id)
            .await?
            .filter(|o| caller.is_admin() || o.is_owned_by(caller.id))
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;

        self.evaluations
            .find_by_order(order_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Order {} has not been evaluated", order_id))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{OrderStatus, Role, UserId};
    use crate::test_utils::{
        test_order, InMemoryEvaluationRepository, InMemoryRecycleOrderRepository,
    };

    fn create_service(
        orders: &InMemoryRecycleOrderRepository,
    ) -> EvaluationService<InMemoryEvaluationRepository, InMemoryRecycleOrderRepository> {
        EvaluationService::new(
            Arc::new(InMemoryEvaluationRepository::linked_to(orders)),
            Arc::new(orders.clone()),
        )
    }

    fn admin() -> Caller {
        Caller {
            id: UserId(100),
            role: Role::Admin,
        }
    }

    fn user(id: i64) -> Caller {
        Caller {
            id: UserId(id),
            role: Role::User,
        }
    }

    fn input(a: i32, f: i32, p: i32, market_price: f64, depreciation_rate: f64) -> EvaluationInput {
        EvaluationInput {
            scores: EvaluationScores {
                appearance: a,
                function: f,
                performance: p,
            },
            market_price,
            depreciation_rate,
            evaluation_report: None,
            images: None,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[tokio::test]
    async fn create_prices_and_syncs_order() {
        let order = test_order(UserId(1), OrderStatus::PickedUp);
        let order_id = order.id;
        let orders = InMemoryRecycleOrderRepository::new().with_order(order);
        let service = create_service(&orders);

        let evaluation = service
            .create(&admin(), &order_id, input(10, 10, 10, 1000.0, 0.0))
            .await
            .unwrap();

        assert_close(evaluation.overall_score, 10.0);
        assert_close(evaluation.final_price, 1000.0);
        assert_eq!(evaluation.status, EvaluationStatus::Completed);
        assert_eq!(evaluation.evaluator_id, UserId(100));

        let stored = orders.find_by_id(&order_id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Evaluated);
        assert_eq!(stored.final_price, Some(evaluation.final_price));
    }

    #[tokio::test]
    async fn second_evaluation_conflicts_and_keeps_first_price() {
        let order = test_order(UserId(1), OrderStatus::PickedUp);
        let order_id = order.id;
        let orders = InMemoryRecycleOrderRepository::new().with_order(order);
        let service = create_service(&orders);

        let first = service
            .create(&admin(), &order_id, input(8, 8, 8, 1000.0, 0.5))
            .await
            .unwrap();
        let err = service
            .create(&admin(), &order_id, input(2, 2, 2, 1000.0, 0.5))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::Conflict(_))));
        let stored = orders.find_by_id(&order_id).await.unwrap().unwrap();
        assert_close(stored.final_price.unwrap(), 400.0);

        let kept = service.get_by_order(&admin(), &order_id).await.unwrap();
        assert_eq!(kept.id, first.id);
        assert_close(kept.final_price, 400.0);
        assert_close(kept.overall_score, 8.0);
        assert_eq!(kept.scores().appearance, 8);
    }

    #[tokio::test]
    async fn create_for_missing_order_is_not_found() {
        let orders = InMemoryRecycleOrderRepository::new();
        let service = create_service(&orders);

        let err = service
            .create(&admin(), &OrderId(42), input(5, 5, 5, 100.0, 0.1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_rejects_out_of_range_scores_before_writing() {
        let order = test_order(UserId(1), OrderStatus::PickedUp);
        let order_id = order.id;
        let orders = InMemoryRecycleOrderRepository::new().with_order(order);
        let service = create_service(&orders);

        let err = service
            .create(&admin(), &order_id, input(0, 5, 5, 100.0, 0.1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::Validation(_))));
        let stored = orders.find_by_id(&order_id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::PickedUp);
        assert!(stored.final_price.is_none());
    }

    #[tokio::test]
    async fn cancelled_order_can_still_be_evaluated() {
        let order = test_order(UserId(1), OrderStatus::Cancelled);
        let order_id = order.id;
        let orders = InMemoryRecycleOrderRepository::new().with_order(order);
        let service = create_service(&orders);

        service
            .create(&admin(), &order_id, input(5, 5, 5, 100.0, 0.0))
            .await
            .unwrap();

        let stored = orders.find_by_id(&order_id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Evaluated);
    }

    #[tokio::test]
    async fn update_resyncs_price_but_not_status() {
        let order = test_order(UserId(1), OrderStatus::PickedUp);
        let order_id = order.id;
        let orders = InMemoryRecycleOrderRepository::new().with_order(order);
        let service = create_service(&orders);

        let evaluation = service
            .create(&admin(), &order_id, input(10, 10, 10, 1000.0, 0.0))
            .await
            .unwrap();

        // admin moves the order on before the re-score
        assert!(orders
            .transition_status(&order_id, OrderStatus::Evaluated, OrderStatus::Completed)
            .await
            .unwrap());

        let revised = service
            .update(&admin(), &evaluation.id, input(5, 5, 5, 1000.0, 0.2), None)
            .await
            .unwrap();

        assert_close(revised.final_price, 400.0);
        let stored = orders.find_by_id(&order_id).await.unwrap().unwrap();
        assert_close(stored.final_price.unwrap(), 400.0);
        assert_eq!(stored.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn only_admin_or_own_evaluator_may_update() {
        let order = test_order(UserId(1), OrderStatus::PickedUp);
        let order_id = order.id;
        let orders = InMemoryRecycleOrderRepository::new().with_order(order);
        let service = create_service(&orders);

        let evaluator = user(7);
        let evaluation = service
            .create(&evaluator, &order_id, input(6, 6, 6, 500.0, 0.1))
            .await
            .unwrap();

        let revised = service
            .update(
                &evaluator,
                &evaluation.id,
                input(7, 7, 7, 500.0, 0.1),
                Some(EvaluationStatus::Pending),
            )
            .await
            .unwrap();
        assert_eq!(revised.status, EvaluationStatus::Pending);

        let err = service
            .update(&user(8), &evaluation.id, input(7, 7, 7, 500.0, 0.1), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_by_order_is_limited_to_owner_or_admin() {
        let order = test_order(UserId(1), OrderStatus::PickedUp);
        let order_id = order.id;
        let orders = InMemoryRecycleOrderRepository::new().with_order(order);
        let service = create_service(&orders);

        // not evaluated yet
        assert!(matches!(
            service.get_by_order(&user(1), &order_id).await.unwrap_err(),
            AppError::NotFound(_)
        ));

        service
            .create(&admin(), &order_id, input(9, 9, 9, 100.0, 0.0))
            .await
            .unwrap();

        assert!(service.get_by_order(&user(1), &order_id).await.is_ok());
        assert!(service.get_by_order(&admin(), &order_id).await.is_ok());
        assert!(service.get_by_order(&user(2), &order_id).await.is_err());
    }

    #[tokio::test]
    async fn list_filters_by_evaluator() {
        let first = test_order(UserId(1), OrderStatus::PickedUp);
        let second = test_order(UserId(1), OrderStatus::PickedUp);
        let (first_id, second_id) = (first.id, second.id);
        let orders = InMemoryRecycleOrderRepository::new()
            .with_order(first)
            .with_order(second);
        let service = create_service(&orders);

        service
            .create(&user(7), &first_id, input(5, 5, 5, 100.0, 0.0))
            .await
            .unwrap();
        service
            .create(&admin(), &second_id, input(5, 5, 5, 100.0, 0.0))
            .await
            .unwrap();

        let page = service
            .list(
                &EvaluationFilter {
                    status: None,
                    evaluator_id: Some(UserId(7)),
                },
                &PageRequest::default(),
            )
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].order_id, first_id);
    }
}
