//! Notice list helpers: id assignment, drafts, partial edits, validation.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ContentError, ContentResult};
use crate::types::{Notice, NoticeId};

/// Fields supplied by an editor when creating a notice. The store fills
/// in `id`, `date`, and `views`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeDraft {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Partial edit of an existing notice. `id` and `views` are not editable
/// here; views only move through `record_view`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl NoticePatch {
    pub fn apply_to(self, notice: &mut Notice) {
        if let Some(category) = self.category {
            notice.category = category;
        }
        if let Some(title) = self.title {
            notice.title = title;
        }
        if let Some(content) = self.content {
            notice.content = content;
        }
        if let Some(date) = self.date {
            notice.date = date;
        }
    }
}

/// `max(existing ids ∪ {0}) + 1`. Fails once the highest id is `u64::MAX`.
pub fn next_notice_id(notices: &[Notice]) -> ContentResult<NoticeId> {
    let highest = notices.iter().map(|n| n.id).max().unwrap_or(0);
    highest.checked_add(1).ok_or_else(|| ContentError::InvalidPatch {
        partition: "notices".to_string(),
        reason: format!("no notice id left after {highest}"),
    })
}

/// Build a new notice from a draft, dated `today`, with zero views.
pub fn create_notice(
    notices: &[Notice],
    draft: NoticeDraft,
    today: NaiveDate,
) -> ContentResult<Notice> {
    Ok(Notice {
        id: next_notice_id(notices)?,
        category: draft.category,
        title: draft.title,
        content: draft.content,
        date: today,
        views: 0,
    })
}

/// Check a notice list before it is stored.
///
/// Ids must be unique. With `strict`, every notice also needs a non-blank
/// title and content.
pub fn validate_notices(notices: &[Notice], strict: bool) -> ContentResult<()> {
    let mut seen = HashSet::with_capacity(notices.len());
    for notice in notices {
        if !seen.insert(notice.id) {
            return Err(ContentError::InvalidPatch {
                partition: "notices".to_string(),
                reason: format!("duplicate notice id {}", notice.id),
            });
        }
        if strict {
            validate_notice(notice)?;
        }
    }
    Ok(())
}

/// A notice needs a non-blank title and content.
pub fn validate_notice(notice: &Notice) -> ContentResult<()> {
    if notice.title.trim().is_empty() {
        return Err(ContentError::MissingField("title"));
    }
    if notice.content.trim().is_empty() {
        return Err(ContentError::MissingField("content"));
    }
    Ok(())
}
