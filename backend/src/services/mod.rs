//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the plan pipeline, repositories and the HTTP layer.

pub mod plan;
pub mod sessions;

pub use plan::PlanService;
pub use sessions::SessionService;
