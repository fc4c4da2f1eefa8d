//! Persisted layout of one table.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::column::TableDefinition;

/// Column order and widths for one table identity.
///
/// Persisted as `{ "order": [...], "widths": { id: px } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayoutState {
    pub order: Vec<String>,
    pub widths: BTreeMap<String, u32>,
}

/// Horizontal extent of a header cell, derived from order and widths.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRect {
    pub column_id: String,
    pub left: f64,
    pub width: f64,
}

impl HeaderRect {
    pub fn center(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

impl TableLayoutState {
    /// Declared order and default widths.
    pub fn defaults(definition: &TableDefinition) -> Self {
        Self {
            order: definition.columns.iter().map(|c| c.id.clone()).collect(),
            widths: definition
                .columns
                .iter()
                .map(|c| (c.id.clone(), c.width))
                .collect(),
        }
    }

    /// Why this state cannot be used with `definition`, if it can't.
    pub fn stale_reason(&self, definition: &TableDefinition) -> Option<String> {
        let declared: HashSet<&str> = definition.column_ids().collect();

        let mut seen = HashSet::with_capacity(self.order.len());
        for id in &self.order {
            if !declared.contains(id.as_str()) {
                return Some(format!("order references unknown column {id}"));
            }
            if !seen.insert(id.as_str()) {
                return Some(format!("order repeats column {id}"));
            }
        }
        if seen.len() != declared.len() {
            return Some("order is missing declared columns".to_string());
        }

        if self.widths.len() != declared.len()
            || self.widths.keys().any(|id| !declared.contains(id.as_str()))
        {
            return Some("widths do not match declared columns".to_string());
        }
        None
    }

    /// Make the state usable with `definition`.
    ///
    /// Structurally stale state is replaced by the defaults; widths below a
    /// column's minimum are raised to it. Returns the repaired state and
    /// whether anything changed.
    pub fn reconcile(mut self, definition: &TableDefinition) -> (Self, bool) {
        if self.stale_reason(definition).is_some() {
            return (Self::defaults(definition), true);
        }

        let mut changed = false;
        for column in &definition.columns {
            let Some(width) = self.widths.get_mut(&column.id) else {
                continue;
            };
            if *width < column.min_width {
                *width = column.min_width;
                changed = true;
            }
        }
        (self, changed)
    }

    pub fn width(&self, column_id: &str) -> Option<u32> {
        self.widths.get(column_id).copied()
    }

    pub fn position(&self, column_id: &str) -> Option<usize> {
        self.order.iter().position(|id| id == column_id)
    }

    /// Header cells laid out left to right starting at x = 0.
    pub fn header_rects(&self) -> Vec<HeaderRect> {
        let mut left = 0.0;
        self.order
            .iter()
            .map(|id| {
                let width = f64::from(self.width(id).unwrap_or(0));
                let rect = HeaderRect {
                    column_id: id.clone(),
                    left,
                    width,
                };
                left += width;
                rect
            })
            .collect()
    }
}

/// List-move: remove the item at `from` and insert it at `to`.
pub fn move_column(order: &mut Vec<String>, from: usize, to: usize) {
    if from == to || from >= order.len() || to >= order.len() {
        return;
    }
    let item = order.remove(from);
    order.insert(to, item);
}
