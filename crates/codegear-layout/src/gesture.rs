//! Pointer gesture state machines for column resize and reorder.
//!
//! The rendering layer feeds raw pointer coordinates in; the gestures
//! decide when a change applies and call into [`TableLayoutManager`].
//! Headers sit in one row, so drop targets depend on x alone; the drag
//! activation distance is measured in both axes.
//!
//! ```text
//! ResizeGesture:   Idle ──down──▶ Resizing ──up──▶ Idle
//!                                  │  ▲
//!                                  └──┘ move (resize + persist)
//!
//! ReorderGesture:  Idle ──down──▶ Pressed ──move ≥ 5px──▶ Dragging ──drop──▶ Idle
//!                                  │                         │
//!                                  └──up (click)──▶ Idle      └──cancel──▶ Idle
//!
//! KeyboardReorderGesture:  Idle ──Space/Enter──▶ Lifted ──Space/Enter──▶ Idle (reorder)
//!                                                 │  ▲
//!                                                 │  └─┘ ←/→ (move target, clamped)
//!                                                 └──Escape──▶ Idle
//! ```

use tracing::debug;

use crate::error::{LayoutError, LayoutResult};
use crate::manager::TableLayoutManager;
use crate::state::HeaderRect;
use crate::storage::LayoutStorage;

/// Pointer travel, in pixels and in any direction, before a press on a
/// header becomes a drag.
pub const ACTIVATION_DISTANCE: f64 = 5.0;

// ── Resize ─────────────────────────────────────────────────────────

/// Resize gesture for one column's right-edge handle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResizeGesture {
    #[default]
    Idle,
    Resizing {
        table_id: String,
        column_id: String,
        start_x: f64,
        start_width: u32,
    },
}

impl ResizeGesture {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Resizing { .. })
    }

    /// Pointer pressed on a column's resize handle.
    pub fn pointer_down<S: LayoutStorage>(
        &mut self,
        layout: &TableLayoutManager<S>,
        table_id: &str,
        column_id: &str,
        x: f64,
    ) -> LayoutResult<()> {
        let start_width = layout
            .state(table_id)?
            .width(column_id)
            .ok_or_else(|| LayoutError::UnknownColumn {
                table: table_id.to_string(),
                column: column_id.to_string(),
            })?;

        *self = Self::Resizing {
            table_id: table_id.to_string(),
            column_id: column_id.to_string(),
            start_x: x,
            start_width,
        };
        Ok(())
    }

    /// Pointer moved anywhere on the page. While resizing, the new width is
    /// written through immediately and returned.
    pub fn pointer_move<S: LayoutStorage>(
        &self,
        layout: &mut TableLayoutManager<S>,
        x: f64,
    ) -> LayoutResult<Option<u32>> {
        let Self::Resizing {
            table_id,
            column_id,
            start_x,
            start_width,
        } = self
        else {
            return Ok(None);
        };

        let proposed = (f64::from(*start_width) + (x - start_x)).round() as i64;
        layout.resize(table_id, column_id, proposed)
    }

    /// Pointer released anywhere on the page.
    pub fn pointer_up(&mut self) {
        *self = Self::Idle;
    }
}

// ── Reorder ────────────────────────────────────────────────────────

/// Drag-to-reorder gesture on column headers.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ReorderGesture {
    #[default]
    Idle,
    /// Pressed but not yet moved far enough to count as a drag.
    Pressed {
        table_id: String,
        column_id: String,
        origin_x: f64,
        origin_y: f64,
    },
    Dragging {
        table_id: String,
        column_id: String,
        origin_x: f64,
        pointer_x: f64,
    },
}

impl ReorderGesture {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    pub fn pointer_down(&mut self, table_id: &str, column_id: &str, x: f64, y: f64) {
        *self = Self::Pressed {
            table_id: table_id.to_string(),
            column_id: column_id.to_string(),
            origin_x: x,
            origin_y: y,
        };
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        match self {
            Self::Idle => {}
            Self::Dragging { pointer_x, .. } => *pointer_x = x,
            Self::Pressed {
                origin_x, origin_y, ..
            } => {
                if (x - *origin_x).hypot(y - *origin_y) < ACTIVATION_DISTANCE {
                    return;
                }
                if let Self::Pressed {
                    table_id,
                    column_id,
                    origin_x,
                    ..
                } = std::mem::take(self)
                {
                    debug!(table = %table_id, column = %column_id, "column drag started");
                    *self = Self::Dragging {
                        table_id,
                        column_id,
                        origin_x,
                        pointer_x: x,
                    };
                }
            }
        }
    }

    /// Header the dragged column would land on if dropped now.
    pub fn current_target<S: LayoutStorage>(
        &self,
        layout: &TableLayoutManager<S>,
    ) -> LayoutResult<Option<String>> {
        let Self::Dragging {
            table_id,
            column_id,
            origin_x,
            pointer_x,
        } = self
        else {
            return Ok(None);
        };

        let rects = layout.state(table_id)?.header_rects();
        let Some(dragged) = rects.iter().find(|r| &r.column_id == column_id) else {
            return Ok(None);
        };
        let center = dragged.center() + (pointer_x - origin_x);
        Ok(closest_center(&rects, center).map(str::to_string))
    }

    /// Pointer released. Applies the reorder if the drag ended over a
    /// different header; a press that never became a drag does nothing.
    /// Returns whether the order changed.
    pub fn drop<S: LayoutStorage>(
        &mut self,
        layout: &mut TableLayoutManager<S>,
    ) -> LayoutResult<bool> {
        let target = self.current_target(layout);
        let gesture = std::mem::take(self);

        let Self::Dragging {
            table_id,
            column_id,
            ..
        } = gesture
        else {
            return Ok(false);
        };

        match target? {
            Some(target) if target != column_id => layout.reorder(&table_id, &column_id, &target),
            _ => Ok(false),
        }
    }

    /// Abandon the gesture (e.g. Escape) without changing anything.
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }
}

// ── Keyboard reorder ───────────────────────────────────────────────

/// Keys the keyboard reorder gesture responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderKey {
    Space,
    Enter,
    ArrowLeft,
    ArrowRight,
    Escape,
}

/// Reorder from the keyboard: lift the focused header, walk it left or
/// right with the arrow keys, then drop it or cancel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeyboardReorderGesture {
    #[default]
    Idle,
    Lifted {
        table_id: String,
        column_id: String,
        /// Slot the column would land in if dropped now.
        target: usize,
        columns: usize,
    },
}

impl KeyboardReorderGesture {
    pub fn is_lifted(&self) -> bool {
        matches!(self, Self::Lifted { .. })
    }

    /// Lift `column_id`. Its current slot is the initial target.
    pub fn pick_up<S: LayoutStorage>(
        &mut self,
        layout: &TableLayoutManager<S>,
        table_id: &str,
        column_id: &str,
    ) -> LayoutResult<()> {
        let state = layout.state(table_id)?;
        let target = state
            .position(column_id)
            .ok_or_else(|| LayoutError::UnknownColumn {
                table: table_id.to_string(),
                column: column_id.to_string(),
            })?;

        debug!(table = %table_id, column = %column_id, "column lifted from keyboard");
        *self = Self::Lifted {
            table_id: table_id.to_string(),
            column_id: column_id.to_string(),
            target,
            columns: state.order.len(),
        };
        Ok(())
    }

    /// Move the pending target one slot left. Stops at the first slot.
    pub fn move_left(&mut self) {
        if let Self::Lifted { target, .. } = self {
            *target = target.saturating_sub(1);
        }
    }

    /// Move the pending target one slot right. Stops at the last slot.
    pub fn move_right(&mut self) {
        if let Self::Lifted {
            target, columns, ..
        } = self
        {
            *target = (*target + 1).min(columns.saturating_sub(1));
        }
    }

    /// Column currently occupying the pending target slot.
    pub fn current_target<S: LayoutStorage>(
        &self,
        layout: &TableLayoutManager<S>,
    ) -> LayoutResult<Option<String>> {
        let Self::Lifted {
            table_id, target, ..
        } = self
        else {
            return Ok(None);
        };
        Ok(layout.state(table_id)?.order.get(*target).cloned())
    }

    /// Put the column down at the pending target. Returns whether the
    /// order changed.
    pub fn drop<S: LayoutStorage>(
        &mut self,
        layout: &mut TableLayoutManager<S>,
    ) -> LayoutResult<bool> {
        let target = self.current_target(layout);
        let Self::Lifted {
            table_id,
            column_id,
            ..
        } = std::mem::take(self)
        else {
            return Ok(false);
        };

        match target? {
            Some(target) if target != column_id => layout.reorder(&table_id, &column_id, &target),
            _ => Ok(false),
        }
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    /// Handle a key press while `focused_column` has focus. Space and Enter
    /// lift or drop, arrows move, Escape cancels. Returns whether the
    /// order changed.
    pub fn key_down<S: LayoutStorage>(
        &mut self,
        layout: &mut TableLayoutManager<S>,
        table_id: &str,
        focused_column: &str,
        key: ReorderKey,
    ) -> LayoutResult<bool> {
        match key {
            ReorderKey::Space | ReorderKey::Enter if self.is_lifted() => self.drop(layout),
            ReorderKey::Space | ReorderKey::Enter => {
                self.pick_up(layout, table_id, focused_column)?;
                Ok(false)
            }
            ReorderKey::ArrowLeft => {
                self.move_left();
                Ok(false)
            }
            ReorderKey::ArrowRight => {
                self.move_right();
                Ok(false)
            }
            ReorderKey::Escape => {
                self.cancel();
                Ok(false)
            }
        }
    }
}

/// The header whose center is nearest `x`. Ties go to the leftmost header.
pub fn closest_center(rects: &[HeaderRect], x: f64) -> Option<&str> {
    let mut best: Option<(&HeaderRect, f64)> = None;
    for rect in rects {
        let distance = (rect.center() - x).abs();
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((rect, distance));
        }
    }
    best.map(|(rect, _)| rect.column_id.as_str())
}
