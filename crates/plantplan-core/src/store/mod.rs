//! The [`PlanStore`] trait and its backends.

mod memory;
mod postgres;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use plantplan_db::config::DbConfig;
use plantplan_db::models::{PlantPlan, PlantPlanFields};
use plantplan_db::pool;

use crate::error::PlanStoreError;

pub use memory::MemoryPlanStore;
pub use postgres::PgPlanStore;

/// Owner of the plant plan collection.
///
/// Mutations validate their input first (see
/// [`validate_fields`](crate::validate_fields)) and never partially apply.
/// Query methods are read-only and return an empty result, never an error,
/// when nothing matches. Every list is in insertion order.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Validate and store a new plan under a freshly generated id.
    async fn create(&self, fields: PlantPlanFields) -> Result<PlantPlan, PlanStoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<PlantPlan, PlanStoreError>;

    async fn get_all(&self) -> Result<Vec<PlantPlan>, PlanStoreError>;

    /// Replace every mutable field of the plan at `id`.
    ///
    /// Validation runs before the existence check. A missing id is
    /// `NotFound`; nothing is inserted.
    async fn update(
        &self,
        id: Uuid,
        fields: PlantPlanFields,
    ) -> Result<PlantPlan, PlanStoreError>;

    /// Remove the plan at `id`. Deleting an absent id is `NotFound`.
    async fn delete(&self, id: Uuid) -> Result<(), PlanStoreError>;

    async fn find_by_planting_season(
        &self,
        season: &str,
    ) -> Result<Vec<PlantPlan>, PlanStoreError>;

    async fn find_by_sunlight_needs(
        &self,
        sunlight: &str,
    ) -> Result<Vec<PlantPlan>, PlanStoreError>;

    async fn search_by_watering_freq(
        &self,
        keyword: &str,
    ) -> Result<Vec<PlantPlan>, PlanStoreError>;

    async fn search_by_name(&self, keyword: &str) -> Result<Vec<PlantPlan>, PlanStoreError>;

    async fn count_by_planting_season(&self, season: &str) -> Result<u64, PlanStoreError>;

    async fn count_all(&self) -> Result<u64, PlanStoreError>;
}

// ---------------------------------------------------------------------------
// Backend selection
// ---------------------------------------------------------------------------

/// Which [`PlanStore`] implementation to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process-local; contents are lost on exit.
    #[default]
    Memory,
    Postgres,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Memory => "memory",
            Self::Postgres => "postgres",
        };
        f.write_str(s)
    }
}

impl FromStr for StoreBackend {
    type Err = StoreBackendParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Self::Memory),
            "postgres" => Ok(Self::Postgres),
            other => Err(StoreBackendParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`StoreBackend`] string.
#[derive(Debug, Clone)]
pub struct StoreBackendParseError(pub String);

impl fmt::Display for StoreBackendParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid store backend: {:?} (expected memory or postgres)",
            self.0
        )
    }
}

impl std::error::Error for StoreBackendParseError {}

/// Build the store for `backend`.
///
/// The postgres backend connects with `db_config` and applies pending
/// migrations before returning.
pub async fn open_store(backend: StoreBackend, db_config: &DbConfig) -> Result<Arc<dyn PlanStore>> {
    match backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryPlanStore::new())),
        StoreBackend::Postgres => {
            let pool = pool::connect_and_migrate(db_config).await?;
            Ok(Arc::new(PgPlanStore::new(pool)))
        }
    }
}
