//! Field validation applied before every create and update.

use plantplan_db::models::PlantPlanFields;

use crate::error::PlanStoreError;

/// Check the required fields of a plan.
///
/// `name`, `plantingSeason` and `sunlightNeeds` must each contain at least
/// one non-whitespace character. Every failing field is reported, not just
/// the first. Values are not modified.
pub fn validate_fields(fields: &PlantPlanFields) -> Result<(), PlanStoreError> {
    let required = [
        ("name", &fields.name),
        ("plantingSeason", &fields.planting_season),
        ("sunlightNeeds", &fields.sunlight_needs),
    ];

    let failing: Vec<&'static str> = required
        .into_iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(field, _)| field)
        .collect();

    if failing.is_empty() {
        Ok(())
    } else {
        Err(PlanStoreError::Validation { fields: failing })
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
