//! Behavioural tests shared by every `PlanStore` backend.
//!
//! Each check is an `async fn` taking `&dyn PlanStore`; the in-memory
//! backend runs them directly, the PostgreSQL backend runs them against a
//! fresh database (ignored by default, run with `-- --ignored`).

use uuid::Uuid;

use plantplan_core::{MemoryPlanStore, PgPlanStore, PlanStore, PlanStoreError};
use plantplan_db::models::PlantPlanFields;
use plantplan_test_utils::TestDb;

fn fields(name: &str, season: &str, sunlight: &str) -> PlantPlanFields {
    PlantPlanFields {
        name: name.to_owned(),
        planting_season: season.to_owned(),
        sunlight_needs: sunlight.to_owned(),
        watering_freq: None,
        notes: None,
    }
}

fn tomato() -> PlantPlanFields {
    PlantPlanFields {
        name: "Tomato".into(),
        planting_season: "Spring".into(),
        sunlight_needs: "Full Sun".into(),
        watering_freq: Some("Twice a week".into()),
        notes: Some("Prefers warm soil".into()),
    }
}

fn names(plans: &[plantplan_db::models::PlantPlan]) -> Vec<&str> {
    plans.iter().map(|p| p.name.as_str()).collect()
}

// -----------------------------------------------------------------------
// Checks
// -----------------------------------------------------------------------

async fn create_get_round_trip(store: &dyn PlanStore) {
    let created = store.create(tomato()).await.expect("create should succeed");
    assert_eq!(created.name, "Tomato");
    assert_eq!(created.planting_season, "Spring");
    assert_eq!(created.sunlight_needs, "Full Sun");
    assert_eq!(created.watering_freq.as_deref(), Some("Twice a week"));
    assert_eq!(created.notes.as_deref(), Some("Prefers warm soil"));

    let fetched = store.get_by_id(created.id).await.expect("plan should exist");
    assert_eq!(fetched, created);
}

async fn lifecycle_create_update_delete(store: &dyn PlanStore) {
    let created = store.create(tomato()).await.unwrap();

    let updated = store
        .update(
            created.id,
            PlantPlanFields {
                name: "Tomato Updated".into(),
                planting_season: "Spring".into(),
                sunlight_needs: "Full Sun".into(),
                watering_freq: Some("Three times a week".into()),
                notes: Some("Mulch recommended".into()),
            },
        )
        .await
        .expect("update should succeed");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Tomato Updated");
    assert_eq!(updated.watering_freq.as_deref(), Some("Three times a week"));
    assert_eq!(updated.notes.as_deref(), Some("Mulch recommended"));
    assert_eq!(store.get_by_id(created.id).await.unwrap(), updated);

    store.delete(created.id).await.expect("delete should succeed");
    let err = store.get_by_id(created.id).await.unwrap_err();
    assert!(matches!(err, PlanStoreError::NotFound { .. }), "got {err:?}");
}

async fn delete_twice_fails_second_time(store: &dyn PlanStore) {
    let created = store.create(tomato()).await.unwrap();
    store.delete(created.id).await.unwrap();

    let err = store.delete(created.id).await.unwrap_err();
    match err {
        PlanStoreError::NotFound { id } => assert_eq!(id, created.id.to_string()),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

async fn update_missing_id_is_not_found_and_inserts_nothing(store: &dyn PlanStore) {
    store.create(tomato()).await.unwrap();

    let err = store
        .update(Uuid::new_v4(), fields("Ghost", "Winter", "Shade"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlanStoreError::NotFound { .. }), "got {err:?}");
    assert_eq!(store.count_all().await.unwrap(), 1);
    assert!(store.search_by_name("Ghost").await.unwrap().is_empty());
}

async fn update_validates_before_existence(store: &dyn PlanStore) {
    let err = store
        .update(Uuid::new_v4(), fields("", "Winter", "Shade"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlanStoreError::Validation { .. }), "got {err:?}");
}

async fn create_with_blank_name_is_rejected(store: &dyn PlanStore) {
    store.create(tomato()).await.unwrap();

    let err = store
        .create(fields("", "Spring", "Full Sun"))
        .await
        .unwrap_err();
    match err {
        PlanStoreError::Validation { fields } => assert_eq!(fields, ["name"]),
        other => panic!("expected Validation, got {other:?}"),
    }

    let err = store
        .create(fields("Basil", "   ", "\t"))
        .await
        .unwrap_err();
    match err {
        PlanStoreError::Validation { fields } => {
            assert_eq!(fields, ["plantingSeason", "sunlightNeeds"])
        }
        other => panic!("expected Validation, got {other:?}"),
    }

    assert_eq!(store.count_all().await.unwrap(), 1);
}

async fn get_missing_id_is_not_found(store: &dyn PlanStore) {
    let err = store.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, PlanStoreError::NotFound { .. }), "got {err:?}");
}

async fn season_query_in_insertion_order(store: &dyn PlanStore) {
    store.create(fields("Pea", "Spring", "Full Sun")).await.unwrap();
    store.create(fields("Basil", "Summer", "Full Sun")).await.unwrap();
    store.create(fields("Lettuce", "Spring", "Partial Shade")).await.unwrap();

    let spring = store.find_by_planting_season("Spring").await.unwrap();
    assert_eq!(names(&spring), ["Pea", "Lettuce"]);
    assert_eq!(store.count_by_planting_season("Spring").await.unwrap(), 2);

    assert!(store.find_by_planting_season("spring").await.unwrap().is_empty());
    assert_eq!(store.count_by_planting_season("Autumn").await.unwrap(), 0);
}

async fn sunlight_query_is_exact(store: &dyn PlanStore) {
    store.create(fields("Pea", "Spring", "Full Sun")).await.unwrap();
    store.create(fields("Fern", "Spring", "Shade")).await.unwrap();
    store.create(fields("Hosta", "Spring", "Partial Shade")).await.unwrap();

    let shade = store.find_by_sunlight_needs("Shade").await.unwrap();
    assert_eq!(names(&shade), ["Fern"]);
}

async fn name_search_is_case_insensitive_substring(store: &dyn PlanStore) {
    store.create(fields("Tomato", "Spring", "Full Sun")).await.unwrap();
    store.create(fields("tomato seedling", "Spring", "Full Sun")).await.unwrap();
    store.create(fields("Basil", "Summer", "Full Sun")).await.unwrap();

    let found = store.search_by_name("tom").await.unwrap();
    assert_eq!(names(&found), ["Tomato", "tomato seedling"]);

    let all = store.search_by_name("").await.unwrap();
    assert_eq!(all.len(), 3);
}

async fn watering_search_skips_absent_values(store: &dyn PlanStore) {
    store
        .create(PlantPlanFields {
            watering_freq: Some("Twice a Week".into()),
            ..fields("Tomato", "Spring", "Full Sun")
        })
        .await
        .unwrap();
    store.create(fields("Cactus", "Summer", "Full Sun")).await.unwrap();
    store
        .create(PlantPlanFields {
            watering_freq: Some("Daily".into()),
            ..fields("Basil", "Summer", "Full Sun")
        })
        .await
        .unwrap();

    let weekly = store.search_by_watering_freq("WEEK").await.unwrap();
    assert_eq!(names(&weekly), ["Tomato"]);

    let any = store.search_by_watering_freq("").await.unwrap();
    assert_eq!(names(&any), ["Tomato", "Basil"]);
}

async fn counts_agree_with_lists(store: &dyn PlanStore) {
    assert_eq!(store.count_all().await.unwrap(), 0);
    assert!(store.get_all().await.unwrap().is_empty());

    let a = store.create(fields("Pea", "Spring", "Full Sun")).await.unwrap();
    store.create(fields("Basil", "Summer", "Full Sun")).await.unwrap();
    store.create(fields("Lettuce", "Spring", "Shade")).await.unwrap();
    store.delete(a.id).await.unwrap();

    let all = store.get_all().await.unwrap();
    assert_eq!(store.count_all().await.unwrap(), all.len() as u64);
    assert_eq!(names(&all), ["Basil", "Lettuce"]);

    for season in ["Spring", "Summer", "Winter"] {
        let listed = store.find_by_planting_season(season).await.unwrap();
        assert_eq!(
            store.count_by_planting_season(season).await.unwrap(),
            listed.len() as u64,
            "count and list disagree for {season}"
        );
    }
}

// -----------------------------------------------------------------------
// Backends
// -----------------------------------------------------------------------

macro_rules! store_tests {
    ($($check:ident),* $(,)?) => {
        mod memory {
            use super::*;

            $(
                #[tokio::test]
                async fn $check() {
                    let store = MemoryPlanStore::new();
                    super::$check(&store).await;
                }
            )*
        }

        mod postgres {
            use super::*;

            $(
                #[tokio::test]
                #[ignore = "requires PostgreSQL"]
                async fn $check() {
                    let db = TestDb::create().await;
                    let store = PgPlanStore::new(db.pool.clone());
                    super::$check(&store).await;
                    db.drop_db().await;
                }
            )*
        }
    };
}

store_tests!(
    create_get_round_trip,
    lifecycle_create_update_delete,
    delete_twice_fails_second_time,
    update_missing_id_is_not_found_and_inserts_nothing,
    update_validates_before_existence,
    create_with_blank_name_is_rejected,
    get_missing_id_is_not_found,
    season_query_in_insertion_order,
    sunlight_query_is_exact,
    name_search_is_case_insensitive_substring,
    watering_search_skips_absent_values,
    counts_agree_with_lists,
);
