use super::*;
use std::sync::Arc;

use crate::store::{MemoryBlobStore, TEMPLATES_KEY};
use crate::workout::{EquipmentType, WeightUnit};

async fn empty_templates() -> Templates {
    Collection::open(TEMPLATES_KEY, Arc::new(MemoryBlobStore::new())).await.unwrap()
}

fn draft(name: &str, category: ExerciseCategory) -> TemplateDraft {
    TemplateDraft {
        name: name.into(),
        category,
        equipment_type: EquipmentType::Barbell,
        default_weight_unit: WeightUnit::Kg,
        notes: None,
        last_used_at: None,
    }
}

fn stored(id: &str, name: &str, category: ExerciseCategory, created: &str, used: Option<&str>) -> ExerciseTemplate {
    ExerciseTemplate {
        id: id.into(),
        name: name.into(),
        category,
        equipment_type: EquipmentType::Machine,
        default_weight_unit: WeightUnit::Kg,
        notes: None,
        created_at: created.into(),
        last_used_at: used.map(Into::into),
    }
}

fn ids(list: &[ExerciseTemplate]) -> Vec<&str> {
    list.iter().map(|t| t.id.as_str()).collect()
}

#[tokio::test]
async fn create_then_get_returns_input_with_id_and_created_at() {
    let templates = empty_templates().await;
    let created = create_template(&templates, draft("스쿼트", ExerciseCategory::Legs)).await.unwrap();

    assert!(created.id.starts_with("template-"));
    assert!(chrono::DateTime::parse_from_rfc3339(&created.created_at).is_ok());
    assert!(created.created_at.ends_with('Z'));
    let fetched = get_template(&templates, &created.id).await.unwrap();
    assert_eq!(fetched.name, "스쿼트");
    assert_eq!(fetched.category, ExerciseCategory::Legs);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn update_and_delete() {
    let templates = empty_templates().await;
    let created = create_template(&templates, draft("Row", ExerciseCategory::Back)).await.unwrap();

    let patch = TemplatePatch { equipment_type: Some(EquipmentType::Cable), ..TemplatePatch::default() };
    let updated = update_template(&templates, &created.id, patch).await.unwrap();
    assert_eq!(updated.equipment_type, EquipmentType::Cable);
    assert_eq!(updated.name, "Row");

    delete_template(&templates, &created.id).await.unwrap();
    assert!(get_template(&templates, &created.id).await.is_none());
    assert!(matches!(delete_template(&templates, &created.id).await, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn touch_usage_sets_last_used_and_ignores_unknown_ids() {
    let templates = empty_templates().await;
    let created = create_template(&templates, draft("Curl", ExerciseCategory::Arms)).await.unwrap();
    assert!(created.last_used_at.is_none());

    touch_usage(&templates, &created.id).await.unwrap();
    let touched = get_template(&templates, &created.id).await.unwrap();
    assert!(touched.last_used_at.is_some());

    touch_usage(&templates, "template-0-missing").await.unwrap();
    assert_eq!(templates.list().await.len(), 1);
}

#[test]
fn category_filter_keeps_only_matches() {
    let list = vec![
        stored("a", "Bench", ExerciseCategory::Chest, "2026-10-01T00:00:00.000Z", None),
        stored("b", "Squat", ExerciseCategory::Legs, "2026-10-02T00:00:00.000Z", None),
        stored("c", "Fly", ExerciseCategory::Chest, "2026-10-03T00:00:00.000Z", None),
    ];
    let filter = TemplateFilter { category: Some(ExerciseCategory::Chest), sort: None };
    assert_eq!(ids(&apply_filter(list, filter)), vec!["a", "c"]);
}

#[test]
fn recent_sort_prefers_last_used_over_created() {
    let list = vec![
        stored("old-used", "A", ExerciseCategory::Chest, "2026-01-01T00:00:00.000Z", Some("2026-10-18T00:00:00.000Z")),
        stored("new", "B", ExerciseCategory::Chest, "2026-10-10T00:00:00.000Z", None),
        stored("old", "C", ExerciseCategory::Chest, "2026-01-02T00:00:00.000Z", None),
    ];
    let sorted = apply_filter(list, TemplateFilter { category: None, sort: Some(TemplateSort::Recent) });
    assert_eq!(ids(&sorted), vec!["old-used", "new", "old"]);
}

#[test]
fn name_sort_follows_korean_collation() {
    let list = vec![
        stored("1", "Deadlift", ExerciseCategory::Back, "t", None),
        stored("2", "스쿼트", ExerciseCategory::Legs, "t", None),
        stored("3", "벤치프레스", ExerciseCategory::Chest, "t", None),
        stored("4", "바벨 로우", ExerciseCategory::Back, "t", None),
        stored("5", "21s Curl", ExerciseCategory::Arms, "t", None),
        stored("6", "arnold press", ExerciseCategory::Shoulders, "t", None),
    ];
    let sorted = apply_filter(list, TemplateFilter { category: None, sort: Some(TemplateSort::Name) });
    let names: Vec<&str> = sorted.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["21s Curl", "바벨 로우", "벤치프레스", "스쿼트", "arnold press", "Deadlift"]);
}

#[test]
fn category_sort_uses_korean_labels_and_is_stable() {
    // Labels: 가슴 < 다리 < 등 < 복근 < 어깨 < 팔.
    let list = vec![
        stored("arms", "x", ExerciseCategory::Arms, "t", None),
        stored("back1", "x", ExerciseCategory::Back, "t", None),
        stored("chest", "x", ExerciseCategory::Chest, "t", None),
        stored("back2", "x", ExerciseCategory::Back, "t", None),
        stored("legs", "x", ExerciseCategory::Legs, "t", None),
    ];
    let sorted = apply_filter(list, TemplateFilter { category: None, sort: Some(TemplateSort::Category) });
    assert_eq!(ids(&sorted), vec!["chest", "legs", "back1", "back2", "arms"]);
}

#[tokio::test]
async fn list_without_filter_keeps_insertion_order() {
    let templates = empty_templates().await;
    create_template(&templates, draft("Zercher", ExerciseCategory::Legs)).await.unwrap();
    create_template(&templates, draft("Arnold", ExerciseCategory::Shoulders)).await.unwrap();
    let names: Vec<String> =
        list_templates(&templates, TemplateFilter::default()).await.into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["Zercher", "Arnold"]);
}

#[test]
fn recent_sort_compares_instants_across_offsets() {
    // 09:00+09:00 is 00:00Z, an hour before 01:00Z.
    let list = vec![
        stored("seoul", "A", ExerciseCategory::Chest, "2026-10-19T09:00:00+09:00", None),
        stored("utc", "B", ExerciseCategory::Chest, "2026-10-19T01:00:00.000Z", None),
    ];
    let sorted = apply_filter(list, TemplateFilter { category: None, sort: Some(TemplateSort::Recent) });
    assert_eq!(ids(&sorted), vec!["utc", "seoul"]);
}

#[test]
fn recent_sort_puts_unparsable_timestamps_last() {
    let list = vec![
        stored("junk-a", "A", ExerciseCategory::Chest, "yesterday", None),
        stored("dated", "B", ExerciseCategory::Chest, "2020-01-01T00:00:00.000Z", None),
        stored("junk-z", "C", ExerciseCategory::Chest, "zzz", None),
    ];
    let sorted = apply_filter(list, TemplateFilter { category: None, sort: Some(TemplateSort::Recent) });
    assert_eq!(ids(&sorted), vec!["dated", "junk-z", "junk-a"]);
}
