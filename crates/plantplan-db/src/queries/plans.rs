//! Database query functions for the `plant_plans` table.
//!
//! Every list query returns rows in insertion order (`seq`). Substring
//! searches use `strpos` on lowercased values so the keyword is matched
//! literally, with no `LIKE` wildcard interpretation.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{PlantPlan, PlantPlanFields};

const COLUMNS: &str = "id, name, planting_season, sunlight_needs, watering_freq, notes";

/// Insert a new plant plan. The id is generated by the database.
pub async fn insert_plan(pool: &PgPool, fields: &PlantPlanFields) -> Result<PlantPlan> {
    let plan = sqlx::query_as::<_, PlantPlan>(&format!(
        "INSERT INTO plant_plans (name, planting_season, sunlight_needs, watering_freq, notes) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {COLUMNS}"
    ))
    .bind(&fields.name)
    .bind(&fields.planting_season)
    .bind(&fields.sunlight_needs)
    .bind(&fields.watering_freq)
    .bind(&fields.notes)
    .fetch_one(pool)
    .await
    .context("failed to insert plant plan")?;

    Ok(plan)
}

/// Fetch a plant plan by its ID.
pub async fn get_plan(pool: &PgPool, id: Uuid) -> Result<Option<PlantPlan>> {
    let plan = sqlx::query_as::<_, PlantPlan>(&format!(
        "SELECT {COLUMNS} FROM plant_plans WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("failed to fetch plant plan")?;

    Ok(plan)
}

/// List all plant plans in insertion order.
pub async fn list_plans(pool: &PgPool) -> Result<Vec<PlantPlan>> {
    let plans = sqlx::query_as::<_, PlantPlan>(&format!(
        "SELECT {COLUMNS} FROM plant_plans ORDER BY seq"
    ))
    .fetch_all(pool)
    .await
    .context("failed to list plant plans")?;

    Ok(plans)
}

/// Replace every mutable field of an existing plan.
///
/// Returns `None` when no row has the given id; nothing is inserted.
pub async fn update_plan(
    pool: &PgPool,
    id: Uuid,
    fields: &PlantPlanFields,
) -> Result<Option<PlantPlan>> {
    let plan = sqlx::query_as::<_, PlantPlan>(&format!(
        "UPDATE plant_plans \
         SET name = $2, planting_season = $3, sunlight_needs = $4, watering_freq = $5, notes = $6 \
         WHERE id = $1 \
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(&fields.name)
    .bind(&fields.planting_season)
    .bind(&fields.sunlight_needs)
    .bind(&fields.watering_freq)
    .bind(&fields.notes)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("failed to update plant plan {id}"))?;

    Ok(plan)
}

/// Delete a plan. Returns `false` when no row had the given id.
pub async fn delete_plan(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM plant_plans WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .with_context(|| format!("failed to delete plant plan {id}"))?;

    Ok(result.rows_affected() > 0)
}

/// Plans whose planting season equals `season` exactly.
pub async fn list_by_planting_season(pool: &PgPool, season: &str) -> Result<Vec<PlantPlan>> {
    let plans = sqlx::query_as::<_, PlantPlan>(&format!(
        "SELECT {COLUMNS} FROM plant_plans WHERE planting_season = $1 ORDER BY seq"
    ))
    .bind(season)
    .fetch_all(pool)
    .await
    .context("failed to list plant plans by planting season")?;

    Ok(plans)
}

/// Plans whose sunlight needs equal `sunlight` exactly.
pub async fn list_by_sunlight_needs(pool: &PgPool, sunlight: &str) -> Result<Vec<PlantPlan>> {
    let plans = sqlx::query_as::<_, PlantPlan>(&format!(
        "SELECT {COLUMNS} FROM plant_plans WHERE sunlight_needs = $1 ORDER BY seq"
    ))
    .bind(sunlight)
    .fetch_all(pool)
    .await
    .context("failed to list plant plans by sunlight needs")?;

    Ok(plans)
}

/// Plans whose watering frequency contains `keyword`, ignoring case.
/// Rows without a watering frequency never match.
pub async fn search_by_watering_freq(pool: &PgPool, keyword: &str) -> Result<Vec<PlantPlan>> {
    let plans = sqlx::query_as::<_, PlantPlan>(&format!(
        "SELECT {COLUMNS} FROM plant_plans \
         WHERE watering_freq IS NOT NULL AND strpos(lower(watering_freq), lower($1)) > 0 \
         ORDER BY seq"
    ))
    .bind(keyword)
    .fetch_all(pool)
    .await
    .context("failed to search plant plans by watering frequency")?;

    Ok(plans)
}

/// Plans whose name contains `keyword`, ignoring case.
pub async fn search_by_name(pool: &PgPool, keyword: &str) -> Result<Vec<PlantPlan>> {
    let plans = sqlx::query_as::<_, PlantPlan>(&format!(
        "SELECT {COLUMNS} FROM plant_plans \
         WHERE strpos(lower(name), lower($1)) > 0 \
         ORDER BY seq"
    ))
    .bind(keyword)
    .fetch_all(pool)
    .await
    .context("failed to search plant plans by name")?;

    Ok(plans)
}

/// Number of plans with the given planting season.
pub async fn count_by_planting_season(pool: &PgPool, season: &str) -> Result<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM plant_plans WHERE planting_season = $1")
            .bind(season)
            .fetch_one(pool)
            .await
            .context("failed to count plant plans by planting season")?;

    Ok(count)
}

/// Total number of plans.
pub async fn count_all(pool: &PgPool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM plant_plans")
        .fetch_one(pool)
        .await
        .context("failed to count plant plans")?;

    Ok(count)
}
