//! Process-local [`PlanStore`].

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use plantplan_db::models::{PlantPlan, PlantPlanFields};

use super::PlanStore;
use crate::error::PlanStoreError;
use crate::filter::PlanFilter;
use crate::validation::validate_fields;

/// In-memory plan store.
///
/// Mutations take the write lock for their whole critical section, so
/// concurrent updates and deletes of the same id never interleave. Reads
/// share the lock.
#[derive(Debug, Default)]
pub struct MemoryPlanStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    /// Insertion sequence -> record. Iteration order is insertion order.
    plans: BTreeMap<u64, PlantPlan>,
    /// id -> insertion sequence.
    index: HashMap<Uuid, u64>,
    next_seq: u64,
}

impl Inner {
    fn get(&self, id: Uuid) -> Option<&PlantPlan> {
        self.index.get(&id).and_then(|seq| self.plans.get(seq))
    }

    fn select(&self, filter: &PlanFilter) -> Vec<PlantPlan> {
        self.plans
            .values()
            .filter(|plan| filter.matches(plan))
            .cloned()
            .collect()
    }
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn select(&self, filter: PlanFilter) -> Vec<PlantPlan> {
        self.inner.read().await.select(&filter)
    }
}

#[async_trait]
impl PlanStore for MemoryPlanStore {
    async fn create(&self, fields: PlantPlanFields) -> Result<PlantPlan, PlanStoreError> {
        validate_fields(&fields)?;

        let mut inner = self.inner.write().await;
        let mut id = Uuid::new_v4();
        while inner.index.contains_key(&id) {
            id = Uuid::new_v4();
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;

        let plan = PlantPlan::from_fields(id, fields);
        inner.index.insert(id, seq);
        inner.plans.insert(seq, plan.clone());
        debug!(%id, "plant plan created");
        Ok(plan)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<PlantPlan, PlanStoreError> {
        self.inner
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| PlanStoreError::not_found(id))
    }

    async fn get_all(&self) -> Result<Vec<PlantPlan>, PlanStoreError> {
        Ok(self.inner.read().await.plans.values().cloned().collect())
    }

    async fn update(
        &self,
        id: Uuid,
        fields: PlantPlanFields,
    ) -> Result<PlantPlan, PlanStoreError> {
        validate_fields(&fields)?;

        let mut inner = self.inner.write().await;
        let seq = *inner
            .index
            .get(&id)
            .ok_or_else(|| PlanStoreError::not_found(id))?;
        let plan = inner
            .plans
            .get_mut(&seq)
            .ok_or_else(|| PlanStoreError::not_found(id))?;
        plan.replace_fields(fields);
        debug!(%id, "plant plan updated");
        Ok(plan.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), PlanStoreError> {
        let mut inner = self.inner.write().await;
        let seq = inner
            .index
            .remove(&id)
            .ok_or_else(|| PlanStoreError::not_found(id))?;
        inner.plans.remove(&seq);
        debug!(%id, "plant plan deleted");
        Ok(())
    }

    async fn find_by_planting_season(
        &self,
        season: &str,
    ) -> Result<Vec<PlantPlan>, PlanStoreError> {
        Ok(self.select(PlanFilter::PlantingSeason(season.to_owned())).await)
    }

    async fn find_by_sunlight_needs(
        &self,
        sunlight: &str,
    ) -> Result<Vec<PlantPlan>, PlanStoreError> {
        Ok(self.select(PlanFilter::SunlightNeeds(sunlight.to_owned())).await)
    }

    async fn search_by_watering_freq(
        &self,
        keyword: &str,
    ) -> Result<Vec<PlantPlan>, PlanStoreError> {
        Ok(self.select(PlanFilter::WateringFreq(keyword.to_owned())).await)
    }

    async fn search_by_name(&self, keyword: &str) -> Result<Vec<PlantPlan>, PlanStoreError> {
        Ok(self.select(PlanFilter::Name(keyword.to_owned())).await)
    }

    async fn count_by_planting_season(&self, season: &str) -> Result<u64, PlanStoreError> {
        let filter = PlanFilter::PlantingSeason(season.to_owned());
        let inner = self.inner.read().await;
        Ok(inner.plans.values().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn count_all(&self) -> Result<u64, PlanStoreError> {
        Ok(self.inner.read().await.plans.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn fields(name: &str, season: &str) -> PlantPlanFields {
        PlantPlanFields {
            name: name.into(),
            planting_season: season.into(),
            sunlight_needs: "Full Sun".into(),
            watering_freq: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let store = MemoryPlanStore::new();
        let a = store.create(fields("Tomato", "Spring")).await.unwrap();
        let b = store.create(fields("Tomato", "Spring")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn update_keeps_insertion_position() {
        let store = MemoryPlanStore::new();
        let first = store.create(fields("Tomato", "Spring")).await.unwrap();
        store.create(fields("Basil", "Summer")).await.unwrap();

        store
            .update(first.id, fields("Tomato Updated", "Spring"))
            .await
            .unwrap();

        let names: Vec<String> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Tomato Updated", "Basil"]);
    }

    #[tokio::test]
    async fn delete_then_recreate_appends() {
        let store = MemoryPlanStore::new();
        let first = store.create(fields("Tomato", "Spring")).await.unwrap();
        store.create(fields("Basil", "Summer")).await.unwrap();
        store.delete(first.id).await.unwrap();
        let again = store.create(fields("Tomato", "Spring")).await.unwrap();

        assert_ne!(again.id, first.id);
        let names: Vec<String> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Basil", "Tomato"]);
    }

    #[tokio::test]
    async fn failed_update_leaves_record_untouched() {
        let store = MemoryPlanStore::new();
        let plan = store.create(fields("Tomato", "Spring")).await.unwrap();

        let err = store.update(plan.id, fields("", "Spring")).await.unwrap_err();
        assert!(matches!(err, PlanStoreError::Validation { .. }), "got {err:?}");
        assert_eq!(store.get_by_id(plan.id).await.unwrap(), plan);
    }

    #[tokio::test]
    async fn concurrent_creates_are_all_kept() {
        let store = Arc::new(MemoryPlanStore::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .create(fields(&format!("plant-{i}"), "Spring"))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.count_all().await.unwrap(), 32);
        assert_eq!(store.count_by_planting_season("Spring").await.unwrap(), 32);
    }

    #[tokio::test]
    async fn concurrent_deletes_of_one_id_succeed_once() {
        let store = Arc::new(MemoryPlanStore::new());
        let id = store.create(fields("Tomato", "Spring")).await.unwrap().id;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.delete(id).await.is_ok() }));
        }
        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(store.count_all().await.unwrap(), 0);
    }
}
