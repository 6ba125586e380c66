//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and ports.

pub mod device_service;
pub mod evaluation_service;
pub mod order_service;
pub mod pricing;
pub mod pricing_config;
pub mod user_service;

pub use device_service::DeviceService;
pub use evaluation_service::{EvaluationInput, EvaluationService};
pub use order_service::{OrderDetails, OrderRequest, OrderService};
pub use user_service::{Registration, UserService};
