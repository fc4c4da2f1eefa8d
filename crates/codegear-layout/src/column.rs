//! Declared column sets.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};

/// One declared column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub id: String,
    pub label: String,
    /// Default width in pixels.
    pub width: u32,
    /// Smallest width a resize may produce.
    #[serde(alias = "minWidth")]
    pub min_width: u32,
}

impl ColumnDef {
    pub fn new(id: &str, label: &str, width: u32, min_width: u32) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            width,
            min_width,
        }
    }

    /// `max(width, min_width)`, saturating at `u32::MAX`.
    pub fn clamp_width(&self, width: i64) -> u32 {
        let clamped = width.max(i64::from(self.min_width));
        u32::try_from(clamped).unwrap_or(u32::MAX)
    }
}

/// A table identity and the columns it declares, in default order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub id: String,
    pub columns: Vec<ColumnDef>,
}

impl TableDefinition {
    pub fn new(id: &str, columns: Vec<ColumnDef>) -> Self {
        Self {
            id: id.to_string(),
            columns,
        }
    }

    /// The public notices board.
    pub fn notices_page() -> Self {
        Self::new(
            "notices-page",
            vec![
                ColumnDef::new("id", "번호", 80, 60),
                ColumnDef::new("category", "분류", 100, 80),
                ColumnDef::new("title", "제목", 400, 200),
                ColumnDef::new("date", "등록일", 120, 100),
                ColumnDef::new("views", "조회수", 80, 60),
            ],
        )
    }

    pub fn column(&self, id: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_ids(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.id.as_str())
    }

    /// A usable definition has at least one column and no repeated ids.
    pub fn validate(&self) -> LayoutResult<()> {
        let invalid = |reason: String| LayoutError::InvalidDefinition {
            table: self.id.clone(),
            reason,
        };

        if self.columns.is_empty() {
            return Err(invalid("no columns".to_string()));
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.id.as_str()) {
                return Err(invalid(format!("duplicate column {}", column.id)));
            }
        }
        Ok(())
    }
}
