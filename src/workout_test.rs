use super::*;

#[test]
fn generate_id_has_prefix_timestamp_and_suffix() {
    let before = now_ms();
    let id = generate_id("session");
    let after = now_ms();
    let parts: Vec<&str> = id.splitn(3, '-').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "session");
    let stamp: i64 = parts[1].parse().unwrap();
    assert!((before..=after).contains(&stamp));
    assert_eq!(parts[2].len(), 9);
    assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
}

#[test]
fn generate_id_differs_between_calls() {
    assert_ne!(generate_id("template"), generate_id("template"));
}

#[test]
fn session_serializes_camel_case_and_skips_absent_optionals() {
    let session = WorkoutSession {
        id: "session-1".into(),
        date: "2026-10-19".into(),
        exercises: vec![],
        total_duration: Some(45),
        notes: None,
    };
    let json = serde_json::to_value(&session).unwrap();
    assert_eq!(json["totalDuration"], 45);
    assert!(json.get("notes").is_none());
}

#[test]
fn session_patch_only_touches_present_fields() {
    let mut session = WorkoutSession {
        id: "session-1".into(),
        date: "2026-10-19".into(),
        exercises: vec![],
        total_duration: Some(30),
        notes: Some("easy".into()),
    };
    let patch: SessionPatch = serde_json::from_value(serde_json::json!({ "notes": "hard" })).unwrap();
    patch.apply(&mut session);
    assert_eq!(session.notes.as_deref(), Some("hard"));
    assert_eq!(session.total_duration, Some(30));
    assert_eq!(session.date, "2026-10-19");
}

#[test]
fn session_form_converts_to_draft_with_fresh_set_ids() {
    let form: SessionForm = serde_json::from_value(serde_json::json!({
        "date": "2026-10-19",
        "exercises": [{
            "id": "ex-1",
            "name": "Bench Press",
            "sets": [{ "weight": 60.0, "reps": 10, "completed": true }, { "weight": 65.0, "reps": 8 }]
        }],
        "notes": "felt strong"
    }))
    .unwrap();

    let draft = SessionDraft::from(form);
    assert_eq!(draft.exercises.len(), 1);
    assert_eq!(draft.exercises[0].id, "ex-1");
    let sets = &draft.exercises[0].sets;
    assert_eq!(sets.len(), 2);
    assert!(sets[0].id.starts_with("set-"));
    assert_ne!(sets[0].id, sets[1].id);
    assert!(sets[0].completed);
    assert!(!sets[1].completed);
    assert_eq!(draft.notes.as_deref(), Some("felt strong"));
}

#[test]
fn category_accepts_identifier_and_korean_label() {
    let a: ExerciseCategory = serde_json::from_str("\"chest\"").unwrap();
    let b: ExerciseCategory = serde_json::from_str("\"가슴\"").unwrap();
    assert_eq!(a, ExerciseCategory::Chest);
    assert_eq!(b, ExerciseCategory::Chest);
    assert_eq!(serde_json::to_string(&b).unwrap(), "\"chest\"");
    let c: ExerciseCategory = serde_json::from_str("\"어깨\"").unwrap();
    assert_eq!(c, ExerciseCategory::Shoulders);
    assert_eq!(c.label(), "어깨");
}

#[test]
fn equipment_accepts_korean_label() {
    let e: EquipmentType = serde_json::from_str("\"덤벨\"").unwrap();
    assert_eq!(e, EquipmentType::Dumbbell);
    assert_eq!(serde_json::to_string(&e).unwrap(), "\"dumbbell\"");
}

#[test]
fn template_last_activity_prefers_last_used() {
    let mut template = TemplateDraft {
        name: "Squat".into(),
        category: ExerciseCategory::Legs,
        equipment_type: EquipmentType::Barbell,
        default_weight_unit: WeightUnit::Kg,
        notes: None,
        last_used_at: None,
    }
    .into_template("template-1".into(), "2026-01-01T00:00:00.000Z".into());
    assert_eq!(template.last_activity(), "2026-01-01T00:00:00.000Z");
    template.last_used_at = Some("2026-02-01T00:00:00.000Z".into());
    assert_eq!(template.last_activity(), "2026-02-01T00:00:00.000Z");
}

#[test]
fn normalize_exercise_name_cases() {
    assert_eq!(normalize_exercise_name("Bench Press"), "bench_press");
    assert_eq!(normalize_exercise_name("  Lat   Pull-Down "), "lat_pulldown");
    assert_eq!(normalize_exercise_name("__Squat__"), "squat");
    assert_eq!(normalize_exercise_name("a - b"), "a_b");
    assert_eq!(normalize_exercise_name("벤치 프레스"), "벤치_프레스");
    assert_eq!(normalize_exercise_name("!!!"), "");
}

#[test]
fn korean_collate_orders_hangul_before_latin() {
    let mut names = vec!["squat", "스쿼트", "Bench", "데드리프트", "9 plate", "bench"];
    names.sort_by(|a, b| korean_collate(a, b));
    assert_eq!(names, vec!["9 plate", "데드리프트", "스쿼트", "Bench", "bench", "squat"]);
}
