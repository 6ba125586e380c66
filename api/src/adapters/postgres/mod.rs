//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod device_repo;
pub mod evaluation_repo;
pub mod recycle_order_repo;
pub mod user_repo;


pub use device_repo::PostgresDeviceRepository;
pub use evaluation_repo::PostgresEvaluationRepository;
pub use recycle_order_repo::PostgresRecycleOrderRepository;
pub use user_repo::PostgresUserRepository;
