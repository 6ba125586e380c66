//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod clock;
pub mod repositories;

pub use clock::Clock;
pub use repositories::{
    DeviceRepository, EvaluationRepository, RecycleOrderRepository, UserRepository,
};
