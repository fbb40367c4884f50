use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A plant's care plan, as stored and as exchanged on the wire.
///
/// Serialized with camelCase keys (`plantingSeason`, `sunlightNeeds`,
/// `wateringFreq`). The table's `seq` column is not part of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlantPlan {
    pub id: Uuid,
    pub name: String,
    pub planting_season: String,
    pub sunlight_needs: String,
    pub watering_freq: Option<String>,
    pub notes: Option<String>,
}

impl PlantPlan {
    /// Attach an id to the mutable fields of a plan.
    pub fn from_fields(id: Uuid, fields: PlantPlanFields) -> Self {
        Self {
            id,
            name: fields.name,
            planting_season: fields.planting_season,
            sunlight_needs: fields.sunlight_needs,
            watering_freq: fields.watering_freq,
            notes: fields.notes,
        }
    }

    /// Replace every mutable field, keeping the id.
    pub fn replace_fields(&mut self, fields: PlantPlanFields) {
        self.name = fields.name;
        self.planting_season = fields.planting_season;
        self.sunlight_needs = fields.sunlight_needs;
        self.watering_freq = fields.watering_freq;
        self.notes = fields.notes;
    }
}

/// The mutable fields of a [`PlantPlan`]: the body of create and update.
///
/// Missing required keys deserialize to empty strings so that they are
/// reported by validation rather than rejected by the deserializer. An `id`
/// key, if present, is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantPlanFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub planting_season: String,
    #[serde(default)]
    pub sunlight_needs: String,
    #[serde(default)]
    pub watering_freq: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}
