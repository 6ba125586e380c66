//! SeaORM entity definitions
//!
//! Row-level models mirroring `migrations/001_initial.sql`. Domain code never
//! sees these; the Postgres adapters convert them into domain entities.

pub mod devices;
pub mod evaluations;
pub mod recycle_orders;
pub mod users;
