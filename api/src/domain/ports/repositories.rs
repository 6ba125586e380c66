//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;

use crate::domain::entities::{
    Device, DeviceFilter, DeviceId, DeviceStatus, DeviceUpdate, Evaluation, EvaluationFilter,
    EvaluationId, EvaluationRevision, NewDevice, NewEvaluation, NewRecycleOrder, NewUser,
    OrderFilter, OrderId, OrderStatus, OrderUpdate, PageRequest, Paged, ProfileUpdate,
    RecycleOrder, User, UserId,
};
use crate::error::DomainError;

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by phone number
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by bearer token hash
    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user.
    ///
    /// Unique username/phone violations surface as `DomainError::Conflict`.
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;

    /// Apply a profile update and return the stored result
    async fn update_profile(&self, id: &UserId, update: &ProfileUpdate)
        -> Result<User, DomainError>;

    /// Replace the bearer token hash (login rotates it)
    async fn set_api_key_hash(&self, id: &UserId, hash: &str) -> Result<(), DomainError>;
}

/// Repository for Device entities
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Find a device by ID regardless of status
    async fn find_by_id(&self, id: &DeviceId) -> Result<Option<Device>, DomainError>;

    /// Find an active device by ID
    async fn find_active(&self, id: &DeviceId) -> Result<Option<Device>, DomainError>;

    /// List active devices matching the filter, newest first
    async fn list(
        &self,
        filter: &DeviceFilter,
        page: &PageRequest,
    ) -> Result<Paged<Device>, DomainError>;

    /// Create a new device (status `active`)
    async fn create(&self, device: &NewDevice) -> Result<Device, DomainError>;

    /// Apply a partial update and return the stored result
    async fn update(&self, id: &DeviceId, update: &DeviceUpdate) -> Result<Device, DomainError>;

    /// Flip the catalog status (soft delete / restore)
    async fn set_status(&self, id: &DeviceId, status: DeviceStatus) -> Result<(), DomainError>;
}

/// Repository for RecycleOrder entities
#[async_trait]
pub trait RecycleOrderRepository: Send + Sync {
    /// Find an order by ID
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<RecycleOrder>, DomainError>;

    /// List orders matching the filter, newest first
    async fn list(
        &self,
        filter: &OrderFilter,
        page: &PageRequest,
    ) -> Result<Paged<RecycleOrder>, DomainError>;

    /// Create a new order in `pending` status
    async fn create(&self, order: &NewRecycleOrder) -> Result<RecycleOrder, DomainError>;

    /// Move an order from `from` to `to` in one conditional write.
    ///
    /// Returns `false` when the order exists but is no longer in `from`.
    async fn transition_status(
        &self,
        id: &OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, DomainError>;

    /// Apply an administrative override and return the stored result
    async fn apply_update(
        &self,
        id: &OrderId,
        update: &OrderUpdate,
    ) -> Result<RecycleOrder, DomainError>;
}

/// Repository for Evaluation entities.
///
/// Writes also propagate `final_price` onto the parent order. Both rows are
/// written in one transaction so the two prices can never diverge.
#[async_trait]
pub trait EvaluationRepository: Send + Sync {
    /// Find an evaluation by ID
    async fn find_by_id(&self, id: &EvaluationId) -> Result<Option<Evaluation>, DomainError>;

    /// Find the evaluation for an order, if any
    async fn find_by_order(&self, order_id: &OrderId) -> Result<Option<Evaluation>, DomainError>;

    /// List evaluations matching the filter, newest first
    async fn list(
        &self,
        filter: &EvaluationFilter,
        page: &PageRequest,
    ) -> Result<Paged<Evaluation>, DomainError>;

    /// Insert the evaluation and, atomically, set the order's `final_price`
    /// and move it to `evaluated`.
    ///
    /// A second evaluation for the same order fails with
    /// `DomainError::Conflict` and writes nothing.
    async fn create_for_order(&self, evaluation: &NewEvaluation)
        -> Result<Evaluation, DomainError>;

    /// Re-score an evaluation and, atomically, mirror its new `final_price`
    /// onto the order. Order status is left alone.
    async fn revise(
        &self,
        id: &EvaluationId,
        revision: &EvaluationRevision,
    ) -> Result<Evaluation, DomainError>;
}
