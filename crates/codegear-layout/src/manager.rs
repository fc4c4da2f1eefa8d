//! TableLayoutManager — owns the layout of every registered table.
//!
//! Each change is applied in memory first, then written to storage, then
//! published to subscribers. A failed storage write is logged and does not
//! undo the in-memory change.

use std::collections::HashMap;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::column::{ColumnDef, TableDefinition};
use crate::error::{LayoutError, LayoutResult};
use crate::state::{TableLayoutState, move_column};
use crate::storage::{LayoutStorage, storage_key, table_id_from_key};

const EVENT_CAPACITY: usize = 64;

/// Where a layout change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// An operation on this manager.
    Local,
    /// Storage changed underneath us (another session or window).
    External,
}

/// Published after every change to a table's layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEvent {
    pub table_id: String,
    pub state: TableLayoutState,
    pub origin: ChangeOrigin,
}

struct TableEntry {
    definition: TableDefinition,
    state: TableLayoutState,
}

/// Column layout for a set of tables, persisted through `S`.
pub struct TableLayoutManager<S> {
    storage: S,
    tables: HashMap<String, TableEntry>,
    events: broadcast::Sender<LayoutEvent>,
}

impl<S: LayoutStorage> TableLayoutManager<S> {
    pub fn new(storage: S) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            storage,
            tables: HashMap::new(),
            events,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Receive every subsequent [`LayoutEvent`].
    pub fn subscribe(&self) -> broadcast::Receiver<LayoutEvent> {
        self.events.subscribe()
    }

    /// Start tracking a table. Loads its stored layout, or the defaults if
    /// nothing usable is stored. Re-registering replaces the definition.
    pub fn register(&mut self, definition: TableDefinition) -> LayoutResult<&TableLayoutState> {
        definition.validate()?;
        let table_id = definition.id.clone();
        let key = storage_key(&table_id);

        let stored = match self.storage.load(&key) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(table = %table_id, error = %e, "layout storage unreadable, using defaults");
                None
            }
        };

        let (state, healed) = match stored {
            Some(raw) => parse_state(&table_id, &raw, &definition),
            None => (TableLayoutState::defaults(&definition), false),
        };

        self.tables
            .insert(table_id.clone(), TableEntry { definition, state });
        if healed {
            self.persist(&table_id);
        }
        debug!(table = %table_id, healed, "table registered");
        self.state(&table_id)
    }

    pub fn is_registered(&self, table_id: &str) -> bool {
        self.tables.contains_key(table_id)
    }

    pub fn state(&self, table_id: &str) -> LayoutResult<&TableLayoutState> {
        Ok(&self.entry(table_id)?.state)
    }

    pub fn definition(&self, table_id: &str) -> LayoutResult<&TableDefinition> {
        Ok(&self.entry(table_id)?.definition)
    }

    /// Column definitions in current display order.
    pub fn ordered_columns(&self, table_id: &str) -> LayoutResult<Vec<&ColumnDef>> {
        let entry = self.entry(table_id)?;
        Ok(entry
            .state
            .order
            .iter()
            .filter_map(|id| entry.definition.column(id))
            .collect())
    }

    /// Move `dragged` to the slot currently held by `target`.
    ///
    /// Returns `false` without touching anything when the ids are equal or
    /// either is not in the table.
    pub fn reorder(&mut self, table_id: &str, dragged: &str, target: &str) -> LayoutResult<bool> {
        let entry = self.entry_mut(table_id)?;
        if dragged == target {
            return Ok(false);
        }
        let (Some(from), Some(to)) = (entry.state.position(dragged), entry.state.position(target))
        else {
            return Ok(false);
        };

        move_column(&mut entry.state.order, from, to);
        debug!(table = %table_id, %dragged, %target, "columns reordered");
        self.commit(table_id);
        Ok(true)
    }

    /// Set a column's width to `max(proposed, min_width)`. Returns the stored
    /// width, or `None` if the column is not in the table.
    pub fn resize(
        &mut self,
        table_id: &str,
        column_id: &str,
        proposed: i64,
    ) -> LayoutResult<Option<u32>> {
        let entry = self.entry_mut(table_id)?;
        let Some(column) = entry.definition.column(column_id) else {
            return Ok(None);
        };
        let width = column.clamp_width(proposed);
        entry.state.widths.insert(column_id.to_string(), width);

        self.commit(table_id);
        Ok(Some(width))
    }

    /// Restore the declared order and widths.
    pub fn reset(&mut self, table_id: &str) -> LayoutResult<&TableLayoutState> {
        let entry = self.entry_mut(table_id)?;
        entry.state = TableLayoutState::defaults(&entry.definition);
        debug!(table = %table_id, "layout reset");
        self.commit(table_id);
        self.state(table_id)
    }

    /// Pick up a change another session made to storage.
    ///
    /// `value` is the new raw value for `key`, or `None` if the key was
    /// removed (which restores the defaults). Keys of unregistered tables
    /// are ignored. Returns whether a table was updated.
    pub fn apply_external_change(&mut self, key: &str, value: Option<&str>) -> bool {
        let Some(table_id) = table_id_from_key(key) else {
            return false;
        };
        let Some(entry) = self.tables.get_mut(table_id) else {
            return false;
        };

        entry.state = match value {
            Some(raw) => parse_state(table_id, raw, &entry.definition).0,
            None => TableLayoutState::defaults(&entry.definition),
        };
        debug!(table = %table_id, "external layout change applied");
        self.publish(table_id, ChangeOrigin::External);
        true
    }

    // ── Internals ──────────────────────────────────────────────────

    fn entry(&self, table_id: &str) -> LayoutResult<&TableEntry> {
        self.tables
            .get(table_id)
            .ok_or_else(|| LayoutError::UnknownTable(table_id.to_string()))
    }

    fn entry_mut(&mut self, table_id: &str) -> LayoutResult<&mut TableEntry> {
        self.tables
            .get_mut(table_id)
            .ok_or_else(|| LayoutError::UnknownTable(table_id.to_string()))
    }

    fn commit(&mut self, table_id: &str) {
        self.persist(table_id);
        self.publish(table_id, ChangeOrigin::Local);
    }

    fn persist(&mut self, table_id: &str) {
        let Some(entry) = self.tables.get(table_id) else {
            return;
        };
        let result = serde_json::to_string(&entry.state)
            .map_err(LayoutError::from)
            .and_then(|json| self.storage.store(&storage_key(table_id), &json));
        if let Err(e) = result {
            warn!(table = %table_id, error = %e, "layout not persisted");
        }
    }

    fn publish(&self, table_id: &str, origin: ChangeOrigin) {
        let Some(entry) = self.tables.get(table_id) else {
            return;
        };
        // No subscribers is fine.
        let _ = self.events.send(LayoutEvent {
            table_id: table_id.to_string(),
            state: entry.state.clone(),
            origin,
        });
    }
}

/// Parse and repair a stored value. Anything unusable becomes the defaults.
fn parse_state(
    table_id: &str,
    raw: &str,
    definition: &TableDefinition,
) -> (TableLayoutState, bool) {
    let parsed: TableLayoutState = match serde_json::from_str(raw) {
        Ok(state) => state,
        Err(e) => {
            debug!(table = %table_id, error = %e, "unparseable layout state, using defaults");
            return (TableLayoutState::defaults(definition), true);
        }
    };
    if let Some(reason) = parsed.stale_reason(definition) {
        debug!(table = %table_id, %reason, "stale layout state, using defaults");
    }
    parsed.reconcile(definition)
}
