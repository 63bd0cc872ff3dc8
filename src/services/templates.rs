//! Template service: the user's exercise library.
//!
//! DESIGN
//! ======
//! Templates carry two timestamps: `createdAt`, set once here, and
//! `lastUsedAt`, bumped by [`touch_usage`] whenever the template is picked
//! into a session. The `recent` sort reads `lastUsedAt`, falling back to
//! `createdAt`, and compares parsed instants: client-supplied timestamps may
//! carry any UTC offset.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use tracing::{debug, info};

use crate::store::{Collection, StoreError};
use crate::workout::{
    ExerciseCategory, ExerciseTemplate, TemplateDraft, TemplatePatch, TemplateSort, generate_id, korean_collate,
    now_rfc3339,
};

pub type Templates = Collection<ExerciseTemplate>;

/// Query applied by [`list_templates`]. Both parts are optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TemplateFilter {
    pub category: Option<ExerciseCategory>,
    pub sort: Option<TemplateSort>,
}

// =============================================================================
// CRUD
// =============================================================================

/// Store a new template with a generated id and `createdAt` of now.
///
/// # Errors
///
/// Returns a storage error if the write-through fails.
pub async fn create_template(templates: &Templates, draft: TemplateDraft) -> Result<ExerciseTemplate, StoreError> {
    let template = templates
        .insert(draft.into_template(generate_id("template"), now_rfc3339()))
        .await?;
    info!(id = %template.id, name = %template.name, category = template.category.as_str(), "templates: created");
    Ok(template)
}

/// Merge `patch` into the stored template.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] if `id` is unknown.
pub async fn update_template(
    templates: &Templates,
    id: &str,
    patch: TemplatePatch,
) -> Result<ExerciseTemplate, StoreError> {
    let template = templates.update(id, |t| patch.apply(t)).await?;
    info!(%id, "templates: updated");
    Ok(template)
}

/// Delete exactly one template.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] if `id` is unknown.
pub async fn delete_template(templates: &Templates, id: &str) -> Result<(), StoreError> {
    templates.remove(id).await?;
    info!(%id, "templates: deleted");
    Ok(())
}

pub async fn get_template(templates: &Templates, id: &str) -> Option<ExerciseTemplate> {
    templates.get(id).await
}

/// Record that the template was just used. An unknown id is ignored.
///
/// # Errors
///
/// Returns a storage error if the write-through fails.
pub async fn touch_usage(templates: &Templates, id: &str) -> Result<(), StoreError> {
    let now = now_rfc3339();
    match templates.update(id, |t| t.last_used_at = Some(now)).await {
        Ok(_) => {
            debug!(%id, "templates: usage recorded");
            Ok(())
        }
        Err(StoreError::NotFound(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

// =============================================================================
// LISTING
// =============================================================================

fn activity_instant(template: &ExerciseTemplate) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(template.last_activity()).ok()
}

/// Newest instant first. Unparsable timestamps sort after every parsable one,
/// among themselves by descending string.
fn compare_recent(a: &ExerciseTemplate, b: &ExerciseTemplate) -> Ordering {
    match (activity_instant(a), activity_instant(b)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.last_activity().cmp(a.last_activity()),
    }
}

fn compare(sort: TemplateSort, a: &ExerciseTemplate, b: &ExerciseTemplate) -> Ordering {
    match sort {
        TemplateSort::Recent => compare_recent(a, b),
        TemplateSort::Name => korean_collate(&a.name, &b.name),
        TemplateSort::Category => korean_collate(a.category.label(), b.category.label()),
    }
}

/// Filter and order a template list. Stable: ties keep their stored order.
#[must_use]
pub fn apply_filter(mut list: Vec<ExerciseTemplate>, filter: TemplateFilter) -> Vec<ExerciseTemplate> {
    if let Some(category) = filter.category {
        list.retain(|t| t.category == category);
    }
    if let Some(sort) = filter.sort {
        list.sort_by(|a, b| compare(sort, a, b));
    }
    list
}

/// Templates matching `filter`, in stored order unless a sort is given.
pub async fn list_templates(templates: &Templates, filter: TemplateFilter) -> Vec<ExerciseTemplate> {
    apply_filter(templates.list().await, filter)
}

#[cfg(test)]
#[path = "templates_test.rs"]
mod tests;
