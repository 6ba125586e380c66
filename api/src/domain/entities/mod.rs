//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod device;
pub mod evaluation;
pub mod page;
pub mod recycle_order;
pub mod user;

pub use device::{
    Device, DeviceCategory, DeviceCondition, DeviceFilter, DeviceId, DeviceStatus, DeviceUpdate,
    NewDevice,
};
pub use evaluation::{
    Evaluation, EvaluationFilter, EvaluationId, EvaluationRevision, EvaluationScores,
    EvaluationStatus, NewEvaluation,
};
pub use page::{PageRequest, Paged, PaginationInfo};
pub use recycle_order::{
    NewRecycleOrder, OrderFilter, OrderId, OrderStatus, OrderUpdate, RecycleOrder,
};
pub use user::{Caller, NewUser, ProfileUpdate, Role, User, UserId, UserStatus};
