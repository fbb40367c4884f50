//! [`PlanStore`] backed by the `plant_plans` table.

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use plantplan_db::models::{PlantPlan, PlantPlanFields};
use plantplan_db::queries::plans as db;

use super::PlanStore;
use crate::error::PlanStoreError;
use crate::validation::validate_fields;

/// PostgreSQL plan store. Each mutation is a single statement, so a
/// record's full replace or removal is atomic.
#[derive(Debug, Clone)]
pub struct PgPlanStore {
    pool: PgPool,
}

impl PgPlanStore {
    /// Wrap a pool whose database has already been migrated.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_count(n: i64) -> Result<u64, PlanStoreError> {
    Ok(u64::try_from(n).context("database returned a negative count")?)
}

#[async_trait]
impl PlanStore for PgPlanStore {
    async fn create(&self, fields: PlantPlanFields) -> Result<PlantPlan, PlanStoreError> {
        validate_fields(&fields)?;
        let plan = db::insert_plan(&self.pool, &fields).await?;
        debug!(id = %plan.id, "plant plan created");
        Ok(plan)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<PlantPlan, PlanStoreError> {
        db::get_plan(&self.pool, id)
            .await?
            .ok_or_else(|| PlanStoreError::not_found(id))
    }

    async fn get_all(&self) -> Result<Vec<PlantPlan>, PlanStoreError> {
        Ok(db::list_plans(&self.pool).await?)
    }

    async fn update(
        &self,
        id: Uuid,
        fields: PlantPlanFields,
    ) -> Result<PlantPlan, PlanStoreError> {
        validate_fields(&fields)?;
        let plan = db::update_plan(&self.pool, id, &fields)
            .await?
            .ok_or_else(|| PlanStoreError::not_found(id))?;
        debug!(%id, "plant plan updated");
        Ok(plan)
    }

    async fn delete(&self, id: Uuid) -> Result<(), PlanStoreError> {
        if db::delete_plan(&self.pool, id).await? {
            debug!(%id, "plant plan deleted");
            Ok(())
        } else {
            Err(PlanStoreError::not_found(id))
        }
    }

    async fn find_by_planting_season(
        &self,
        season: &str,
    ) -> Result<Vec<PlantPlan>, PlanStoreError> {
        Ok(db::list_by_planting_season(&self.pool, season).await?)
    }

    async fn find_by_sunlight_needs(
        &self,
        sunlight: &str,
    ) -> Result<Vec<PlantPlan>, PlanStoreError> {
        Ok(db::list_by_sunlight_needs(&self.pool, sunlight).await?)
    }

    async fn search_by_watering_freq(
        &self,
        keyword: &str,
    ) -> Result<Vec<PlantPlan>, PlanStoreError> {
        Ok(db::search_by_watering_freq(&self.pool, keyword).await?)
    }

    async fn search_by_name(&self, keyword: &str) -> Result<Vec<PlantPlan>, PlanStoreError> {
        Ok(db::search_by_name(&self.pool, keyword).await?)
    }

    async fn count_by_planting_season(&self, season: &str) -> Result<u64, PlanStoreError> {
        to_count(db::count_by_planting_season(&self.pool, season).await?)
    }

    async fn count_all(&self) -> Result<u64, PlanStoreError> {
        to_count(db::count_all(&self.pool).await?)
    }
}
