//! TriFlow Shared Library
//!
//! Domain model and the training-plan pipeline, shared by the backend
//! service and the WASM preview. No I/O happens here.

pub mod errors;
pub mod intake;
pub mod models;
pub mod periodization;
pub mod plan;
pub mod policy;
pub mod schedule;
pub mod serializer;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use intake::{normalize, Intake, GUEST_USER_ID};
pub use models::*;
pub use periodization::{allocate_phases, PhaseName, Periodization};
pub use plan::{generate_plan, PlanFlag, PlanRequest, TrainingPlan};
pub use policy::PlannerPolicy;
pub use schedule::{SessionSlot, WeekVariant};
pub use types::*;
pub use validation::ValidationError;
