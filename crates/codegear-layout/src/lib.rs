//! codegear-layout — per-table column order and width state.
//!
//! Tracks how a user has arranged the columns of each table (order and
//! pixel widths), persists that arrangement keyed by table identity, and
//! never touches row data.
//!
//! # Components
//!
//! - **`column`** — declared column sets ([`TableDefinition`])
//! - **`state`** — the persisted [`TableLayoutState`] and its repair rules
//! - **`storage`** — key/value persistence ([`LayoutStorage`]) with memory
//!   and JSON-file backends
//! - **`manager`** — [`TableLayoutManager`]: reorder, resize, reset, and
//!   change notifications
//! - **`gesture`** — pointer and keyboard state machines that drive resize
//!   and reorder
//!
//! Stored state is treated as untrusted: a stored order that no longer
//! matches the declared columns is replaced by the defaults on load.

pub mod column;
pub mod error;
pub mod gesture;
pub mod manager;
pub mod state;
pub mod storage;

pub use column::{ColumnDef, TableDefinition};
pub use error::{LayoutError, LayoutResult};
pub use gesture::{
    ACTIVATION_DISTANCE, KeyboardReorderGesture, ReorderGesture, ReorderKey, ResizeGesture,
};
pub use manager::{ChangeOrigin, LayoutEvent, TableLayoutManager};
pub use state::{HeaderRect, TableLayoutState};
pub use storage::{FileStorage, LayoutStorage, MemoryStorage, storage_key};
