//! Operator CLI handlers for `plantplan plan` subcommands.
//!
//! Implements:
//! - `plantplan plan add --name .. --season .. --sunlight ..` -- create a plan
//! - `plantplan plan list [--season|--sunlight|--watering|--search]` -- list plans
//! - `plantplan plan show <id>`   -- show one plan
//! - `plantplan plan update <id> ..` -- replace a plan's fields
//! - `plantplan plan remove <id>` -- delete a plan
//! - `plantplan plan count [--season]` -- count plans

use anyhow::{Context, Result};
use uuid::Uuid;

use plantplan_core::PlanStore;
use plantplan_db::models::{PlantPlan, PlantPlanFields};

use crate::{PlanCommands, PlanFieldArgs};

// -----------------------------------------------------------------------
// Public entry point
// -----------------------------------------------------------------------

/// Dispatch a `PlanCommands` variant to the appropriate handler.
pub async fn run_plan_command(command: PlanCommands, store: &dyn PlanStore) -> Result<()> {
    match command {
        PlanCommands::Add { fields } => cmd_add(store, fields).await,
        PlanCommands::List {
            season,
            sunlight,
            watering,
            search,
        } => {
            let plans = match (season, sunlight, watering, search) {
                (Some(season), None, None, None) => store.find_by_planting_season(&season).await?,
                (None, Some(sunlight), None, None) => {
                    store.find_by_sunlight_needs(&sunlight).await?
                }
                (None, None, Some(keyword), None) => {
                    store.search_by_watering_freq(&keyword).await?
                }
                (None, None, None, Some(keyword)) => store.search_by_name(&keyword).await?,
                (None, None, None, None) => store.get_all().await?,
                _ => anyhow::bail!(
                    "use at most one of --season, --sunlight, --watering, --search"
                ),
            };
            print_table(&plans);
            Ok(())
        }
        PlanCommands::Show { plan_id } => {
            let plan = store.get_by_id(parse_plan_id(&plan_id)?).await?;
            print_plan(&plan);
            Ok(())
        }
        PlanCommands::Update { plan_id, fields } => {
            let id = parse_plan_id(&plan_id)?;
            let plan = store.update(id, fields.into()).await?;
            println!("Plan updated.");
            println!();
            print_plan(&plan);
            Ok(())
        }
        PlanCommands::Remove { plan_id } => {
            let id = parse_plan_id(&plan_id)?;
            store.delete(id).await?;
            println!("Plan {id} removed.");
            Ok(())
        }
        PlanCommands::Count { season } => {
            let count = match season {
                Some(season) => store.count_by_planting_season(&season).await?,
                None => store.count_all().await?,
            };
            println!("{count}");
            Ok(())
        }
    }
}

impl From<PlanFieldArgs> for PlantPlanFields {
    fn from(args: PlanFieldArgs) -> Self {
        Self {
            name: args.name,
            planting_season: args.season,
            sunlight_needs: args.sunlight,
            watering_freq: args.watering,
            notes: args.notes,
        }
    }
}

fn parse_plan_id(raw: &str) -> Result<Uuid> {
    raw.parse()
        .with_context(|| format!("invalid plan ID: {raw:?}"))
}

// -----------------------------------------------------------------------
// plantplan plan add
// -----------------------------------------------------------------------

async fn cmd_add(store: &dyn PlanStore, fields: PlanFieldArgs) -> Result<()> {
    let plan = store.create(fields.into()).await?;
    println!("Plan created successfully.");
    println!();
    print_plan(&plan);
    Ok(())
}

// -----------------------------------------------------------------------
// Output
// -----------------------------------------------------------------------

fn print_plan(plan: &PlantPlan) {
    println!("Plan: {}", plan.name);
    println!("  ID:        {}", plan.id);
    println!("  Season:    {}", plan.planting_season);
    println!("  Sunlight:  {}", plan.sunlight_needs);
    if let Some(watering) = &plan.watering_freq {
        println!("  Watering:  {watering}");
    }
    if let Some(notes) = &plan.notes {
        println!("  Notes:     {notes}");
    }
}

fn print_table(plans: &[PlantPlan]) {
    if plans.is_empty() {
        println!("No plans found. Use `plantplan plan add` to create one.");
        return;
    }

    // ID is always 36 chars (UUID).
    let id_w = 36;
    let name_w = column_width(plans, "NAME", |p| &p.name);
    let season_w = column_width(plans, "SEASON", |p| &p.planting_season);
    let sun_w = column_width(plans, "SUNLIGHT", |p| &p.sunlight_needs);

    println!(
        "{:<id_w$}  {:<name_w$}  {:<season_w$}  {:<sun_w$}  WATERING",
        "ID", "NAME", "SEASON", "SUNLIGHT",
    );
    for plan in plans {
        println!(
            "{:<id_w$}  {:<name_w$}  {:<season_w$}  {:<sun_w$}  {}",
            plan.id,
            plan.name,
            plan.planting_season,
            plan.sunlight_needs,
            plan.watering_freq.as_deref().unwrap_or("-"),
        );
    }
}

fn column_width(plans: &[PlantPlan], header: &str, value: impl Fn(&PlantPlan) -> &String) -> usize {
    plans
        .iter()
        .map(|p| value(p).chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}
