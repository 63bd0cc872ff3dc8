//! Workout domain records.
//!
//! DESIGN
//! ======
//! Records serialize as camelCase JSON, byte-compatible with what the
//! browser client keeps in local storage. Sessions own exercises, which own
//! sets; templates are independent top-level records. Nothing here checks
//! references between sessions and templates.
//!
//! Category and equipment enums accept both their ASCII identifier and the
//! Korean display label on input, so blobs written by the web client load.

use std::cmp::Ordering;

use rand::Rng;
use serde::{Deserialize, Serialize};

// =============================================================================
// IDS & TIMESTAMPS
// =============================================================================

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Milliseconds since Unix epoch.
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current UTC time as RFC 3339 with millisecond precision.
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Generate `{prefix}-{unix_ms}-{9 base36 chars}`.
///
/// Uniqueness rests on the timestamp plus random suffix; nothing checks for
/// collisions.
#[must_use]
pub fn generate_id(prefix: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
        .collect();
    format!("{prefix}-{}-{suffix}", now_ms())
}

// =============================================================================
// SESSIONS
// =============================================================================

/// One unit of repeated effort at a given weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    pub id: String,
    /// Kilograms.
    pub weight: f64,
    pub reps: u32,
    pub completed: bool,
}

/// A named movement inside a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
}

/// A dated collection of exercises performed together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: String,
    pub date: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A session before it has been assigned an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDraft {
    pub date: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SessionDraft {
    #[must_use]
    pub fn into_session(self, id: String) -> WorkoutSession {
        WorkoutSession {
            id,
            date: self.date,
            exercises: self.exercises,
            total_duration: self.total_duration,
            notes: self.notes,
        }
    }
}

/// Partial session update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPatch {
    pub date: Option<String>,
    pub exercises: Option<Vec<Exercise>>,
    pub total_duration: Option<u32>,
    pub notes: Option<String>,
}

impl SessionPatch {
    pub fn apply(self, session: &mut WorkoutSession) {
        if let Some(date) = self.date {
            session.date = date;
        }
        if let Some(exercises) = self.exercises {
            session.exercises = exercises;
        }
        if self.total_duration.is_some() {
            session.total_duration = self.total_duration;
        }
        if self.notes.is_some() {
            session.notes = self.notes;
        }
    }
}

// =============================================================================
// SESSION FORM
// =============================================================================

/// Set as edited in the session form; has no id yet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetForm {
    pub weight: f64,
    pub reps: u32,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseForm {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sets: Vec<SetForm>,
}

/// Raw session editor state.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionForm {
    pub date: String,
    #[serde(default)]
    pub exercises: Vec<ExerciseForm>,
    pub total_duration: Option<u32>,
    pub notes: Option<String>,
}

impl From<SessionForm> for SessionDraft {
    fn from(form: SessionForm) -> Self {
        Self {
            date: form.date,
            exercises: form
                .exercises
                .into_iter()
                .map(|ex| Exercise {
                    id: ex.id,
                    name: ex.name,
                    sets: ex
                        .sets
                        .into_iter()
                        .map(|s| WorkoutSet { id: generate_id("set"), weight: s.weight, reps: s.reps, completed: s.completed })
                        .collect(),
                })
                .collect(),
            total_duration: form.total_duration,
            notes: form.notes,
        }
    }
}

// =============================================================================
// TEMPLATE ENUMS
// =============================================================================

/// Body region an exercise targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseCategory {
    #[serde(alias = "가슴")]
    Chest,
    #[serde(alias = "등")]
    Back,
    #[serde(alias = "다리")]
    Legs,
    #[serde(alias = "어깨")]
    Shoulders,
    #[serde(alias = "팔")]
    Arms,
    #[serde(alias = "복근")]
    Abs,
    #[serde(alias = "기타")]
    Others,
}

impl ExerciseCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chest => "chest",
            Self::Back => "back",
            Self::Legs => "legs",
            Self::Shoulders => "shoulders",
            Self::Arms => "arms",
            Self::Abs => "abs",
            Self::Others => "others",
        }
    }

    /// Korean display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Chest => "가슴",
            Self::Back => "등",
            Self::Legs => "다리",
            Self::Shoulders => "어깨",
            Self::Arms => "팔",
            Self::Abs => "복근",
            Self::Others => "기타",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentType {
    #[serde(alias = "머신")]
    Machine,
    #[serde(alias = "바벨")]
    Barbell,
    #[serde(alias = "덤벨")]
    Dumbbell,
    #[serde(alias = "케이블")]
    Cable,
    #[serde(alias = "맨몸")]
    Bodyweight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

/// Ordering applied to the template list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateSort {
    /// Most recently used (or created) first.
    Recent,
    Name,
    Category,
}

// =============================================================================
// TEMPLATES
// =============================================================================

/// Reusable exercise definition in the user's library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseTemplate {
    pub id: String,
    pub name: String,
    pub category: ExerciseCategory,
    pub equipment_type: EquipmentType,
    #[serde(default)]
    pub default_weight_unit: WeightUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<String>,
}

impl ExerciseTemplate {
    /// Timestamp used by the `recent` sort.
    #[must_use]
    pub fn last_activity(&self) -> &str {
        self.last_used_at.as_deref().unwrap_or(&self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDraft {
    pub name: String,
    pub category: ExerciseCategory,
    pub equipment_type: EquipmentType,
    #[serde(default)]
    pub default_weight_unit: WeightUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<String>,
}

impl TemplateDraft {
    #[must_use]
    pub fn into_template(self, id: String, created_at: String) -> ExerciseTemplate {
        ExerciseTemplate {
            id,
            name: self.name,
            category: self.category,
            equipment_type: self.equipment_type,
            default_weight_unit: self.default_weight_unit,
            notes: self.notes,
            created_at,
            last_used_at: self.last_used_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub category: Option<ExerciseCategory>,
    pub equipment_type: Option<EquipmentType>,
    pub default_weight_unit: Option<WeightUnit>,
    pub notes: Option<String>,
    pub last_used_at: Option<String>,
}

impl TemplatePatch {
    pub fn apply(self, template: &mut ExerciseTemplate) {
        if let Some(name) = self.name {
            template.name = name;
        }
        if let Some(category) = self.category {
            template.category = category;
        }
        if let Some(equipment) = self.equipment_type {
            template.equipment_type = equipment;
        }
        if let Some(unit) = self.default_weight_unit {
            template.default_weight_unit = unit;
        }
        if self.notes.is_some() {
            template.notes = self.notes;
        }
        if self.last_used_at.is_some() {
            template.last_used_at = self.last_used_at;
        }
    }
}

// =============================================================================
// NAMES
// =============================================================================

fn is_hangul(c: char) -> bool {
    matches!(c, '\u{AC00}'..='\u{D7A3}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}')
}

/// Canonical key for an exercise name: `"Bench Press!"` → `"bench_press"`.
#[must_use]
pub fn normalize_exercise_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() || c == '_' {
            pending_sep = true;
            continue;
        }
        if !(c.is_ascii_alphanumeric() || is_hangul(c)) {
            continue;
        }
        if pending_sep && !out.is_empty() {
            out.push('_');
        }
        pending_sep = false;
        out.push(c);
    }
    out
}

/// Rank of a character class under Korean collation: symbols, digits,
/// Hangul, Latin, everything else.
fn collation_class(c: char) -> u8 {
    if c.is_ascii_digit() {
        1
    } else if is_hangul(c) {
        2
    } else if c.is_alphabetic() && c.is_ascii() {
        3
    } else if c.is_alphanumeric() {
        4
    } else {
        0
    }
}

/// Compare two strings the way a Korean-locale collator orders them.
///
/// Hangul syllables are laid out in dictionary order in Unicode, so within a
/// class codepoint order is correct. Latin compares case-insensitively first
/// and falls back to exact order for a stable tie-break.
#[must_use]
pub fn korean_collate(a: &str, b: &str) -> Ordering {
    let key = |s: &str| -> Vec<(u8, char)> {
        s.chars()
            .map(|c| (collation_class(c), c.to_lowercase().next().unwrap_or(c)))
            .collect()
    };
    key(a).cmp(&key(b)).then_with(|| a.cmp(b))
}

#[cfg(test)]
#[path = "workout_test.rs"]
mod tests;
