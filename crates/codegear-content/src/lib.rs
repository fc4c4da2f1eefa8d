//! codegear-content — the site content store.
//!
//! Holds the editable site content (notices, hero copy, company info,
//! social links, technology cards) as a single JSON document with an
//! in-memory cache in front of it.
//!
//! # Architecture
//!
//! Every operation loads the whole [`ContentDocument`], touches one
//! partition, and writes the whole document back. The cache is populated
//! lazily on first access and overwritten on every successful write; a
//! mutex serializes the read-modify-write cycle so concurrent writers
//! within a process never lose updates.
//!
//! Singleton partitions (`hero`, `company`, `social`) are merged field by
//! field; collection partitions (`notices`, `technologies`) are replaced
//! wholesale.
//!
//! The `ContentStore` is `Clone` + `Send` + `Sync` (backed by an `Arc`)
//! and can be shared across async tasks.

pub mod defaults;
pub mod error;
pub mod notices;
pub mod patch;
pub mod store;
pub mod types;

pub use error::{ContentError, ContentResult};
pub use notices::{NoticeDraft, NoticePatch};
pub use patch::{CompanyPatch, HeroPatch, PartitionUpdate, SocialPatch};
pub use store::{ContentStore, Durability, StoreOptions, WriteOutcome};
pub use types::*;
