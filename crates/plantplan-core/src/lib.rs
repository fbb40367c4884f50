//! Plant plan store: validation, query predicates, and the [`PlanStore`]
//! trait with in-memory and PostgreSQL implementations.

pub mod error;
pub mod filter;
pub mod store;
pub mod validation;

pub use error::PlanStoreError;
pub use store::{MemoryPlanStore, PgPlanStore, PlanStore, StoreBackend};
pub use validation::validate_fields;
