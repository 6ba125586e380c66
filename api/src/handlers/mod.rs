//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod auth;
pub mod devices;
pub mod evaluations;
pub mod orders;
pub mod pagination;
pub mod users;

pub use auth::{login, register};
pub use devices::{create_device, delete_device, get_device, list_devices, update_device};
pub use evaluations::{
    create_evaluation, get_evaluation, get_order_evaluation, list_evaluations, update_evaluation,
};
pub use orders::{
    cancel_order, create_order, get_order, list_all_orders, list_my_orders, update_order,
};
pub use users::{get_profile, update_profile};
