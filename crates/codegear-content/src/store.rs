//! ContentStore — cached, file-backed persistence for site content.
//!
//! The whole [`ContentDocument`] lives in one JSON file. The first access
//! loads it (or the seed values if the file is absent or unreadable) into
//! an in-memory cache; every successful write replaces the cache and
//! rewrites the file. A single mutex covers the cache and the file write,
//! so writers within one process are serialized.
//!
//! Nothing coordinates separate processes: each holds its own cache and
//! the last writer to the file wins.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ContentError, ContentResult};
use crate::notices::{NoticeDraft, NoticePatch, create_notice, validate_notice, validate_notices};
use crate::patch::PartitionUpdate;
use crate::types::*;

/// Where a write ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Durability {
    /// Written to the backing file.
    Persisted,
    /// The file write failed; only this process's cache holds the change.
    CachedOnly,
    /// The store has no backing file.
    Volatile,
}

/// Result of a successful write or reset.
#[derive(Debug, Clone)]
pub struct WriteOutcome {
    pub document: ContentDocument,
    pub durability: Durability,
}

/// Behavioural switches for a store.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    /// Reject notices with a blank title or content.
    pub strict_notices: bool,
}

/// Thread-safe content store with a read-through, write-through cache.
#[derive(Clone)]
pub struct ContentStore {
    inner: Arc<Inner>,
    options: StoreOptions,
}

struct Inner {
    path: Option<PathBuf>,
    cache: Mutex<Option<ContentDocument>>,
}

impl ContentStore {
    /// Open a store backed by the JSON file at `path`. The file is read
    /// lazily and created on the first write.
    pub fn open(path: &Path) -> Self {
        debug!(?path, "content store opened");
        Self::with_backing(Some(path.to_path_buf()))
    }

    /// Create a store without a backing file (for testing).
    pub fn open_in_memory() -> Self {
        debug!("in-memory content store opened");
        Self::with_backing(None)
    }

    fn with_backing(path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                path,
                cache: Mutex::new(None),
            }),
            options: StoreOptions::default(),
        }
    }

    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    // ── Reads ──────────────────────────────────────────────────────

    /// Snapshot of the whole document.
    pub fn read_document(&self) -> ContentDocument {
        let mut guard = self.lock();
        self.loaded(&mut guard).clone()
    }

    /// Current value of one partition.
    pub fn read_partition(&self, name: PartitionName) -> Partition {
        let mut guard = self.lock();
        self.loaded(&mut guard).partition(name)
    }

    // ── Writes ─────────────────────────────────────────────────────

    /// Apply a partition update and return the resulting document.
    pub fn write_partition(&self, update: PartitionUpdate) -> ContentResult<WriteOutcome> {
        if let PartitionUpdate::Notices(notices) = &update {
            validate_notices(notices, self.options.strict_notices)?;
        }
        let partition = update.partition();
        let ((), outcome) = self.mutate(|doc| {
            update.apply(doc);
            Ok(())
        })?;
        debug!(%partition, durability = ?outcome.durability, "partition written");
        Ok(outcome)
    }

    /// Restore one partition, or the whole document when `name` is `None`,
    /// to the built-in values.
    pub fn reset(&self, name: Option<PartitionName>) -> ContentResult<WriteOutcome> {
        let ((), outcome) = self.mutate(|doc| {
            match name {
                Some(name) => doc.reset_partition(name),
                None => *doc = ContentDocument::default(),
            }
            Ok(())
        })?;
        info!(partition = ?name.map(PartitionName::as_str), "content reset");
        Ok(outcome)
    }

    // ── Notices ────────────────────────────────────────────────────

    /// Create a notice from a draft and put it at the top of the list.
    ///
    /// In strict mode only the new notice is checked; notices stored
    /// earlier are left as they are.
    pub fn add_notice(&self, draft: NoticeDraft) -> ContentResult<(Notice, WriteOutcome)> {
        let strict = self.options.strict_notices;
        let (notice, outcome) = self.mutate(|doc| {
            let notice = create_notice(&doc.notices, draft, Utc::now().date_naive())?;
            if strict {
                validate_notice(&notice)?;
            }
            doc.notices.insert(0, notice.clone());
            Ok(notice)
        })?;
        debug!(id = notice.id, "notice added");
        Ok((notice, outcome))
    }

    /// Merge a partial edit into an existing notice.
    pub fn update_notice(
        &self,
        id: NoticeId,
        patch: NoticePatch,
    ) -> ContentResult<(Notice, WriteOutcome)> {
        let strict = self.options.strict_notices;
        self.mutate(|doc| {
            let notice = doc
                .notices
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or(ContentError::NoticeNotFound(id))?;
            patch.apply_to(notice);
            if strict {
                validate_notice(notice)?;
            }
            Ok(notice.clone())
        })
    }

    /// Remove a notice. Its id is not handed out again while a higher id
    /// remains in the list.
    pub fn delete_notice(&self, id: NoticeId) -> ContentResult<(Notice, WriteOutcome)> {
        let (removed, outcome) = self.mutate(|doc| {
            let index = doc
                .notices
                .iter()
                .position(|n| n.id == id)
                .ok_or(ContentError::NoticeNotFound(id))?;
            Ok(doc.notices.remove(index))
        })?;
        debug!(id, "notice deleted");
        Ok((removed, outcome))
    }

    /// Count one view of a notice.
    pub fn record_view(&self, id: NoticeId) -> ContentResult<(Notice, WriteOutcome)> {
        self.mutate(|doc| {
            let notice = doc
                .notices
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or(ContentError::NoticeNotFound(id))?;
            notice.views = notice.views.saturating_add(1);
            Ok(notice.clone())
        })
    }

    // ── Internals ──────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, Option<ContentDocument>> {
        self.inner.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn loaded<'a>(&self, slot: &'a mut Option<ContentDocument>) -> &'a mut ContentDocument {
        slot.get_or_insert_with(|| self.load())
    }

    /// Read-modify-write under the cache lock. `op` works on a copy, so a
    /// failed operation leaves the cache untouched.
    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut ContentDocument) -> ContentResult<T>,
    ) -> ContentResult<(T, WriteOutcome)> {
        let mut guard = self.lock();
        let current = self.loaded(&mut guard);

        let mut next = current.clone();
        let value = op(&mut next)?;
        next.last_updated = Utc::now().max(current.last_updated);

        let durability = self.persist(&next);
        *current = next.clone();

        Ok((
            value,
            WriteOutcome {
                document: next,
                durability,
            },
        ))
    }

    fn load(&self) -> ContentDocument {
        let Some(path) = self.path() else {
            return ContentDocument::default();
        };

        match fs::read(path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(doc) => {
                    info!(?path, "content document loaded");
                    doc
                }
                Err(e) => {
                    warn!(?path, error = %e, "stored content is malformed, using defaults");
                    ContentDocument::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(?path, "no stored content, using defaults");
                ContentDocument::default()
            }
            Err(source) => {
                let err = ContentError::StorageUnavailable {
                    path: path.to_path_buf(),
                    source,
                };
                warn!(error = %err, "content storage unreadable, using defaults");
                ContentDocument::default()
            }
        }
    }

    fn persist(&self, doc: &ContentDocument) -> Durability {
        let Some(path) = self.path() else {
            return Durability::Volatile;
        };

        match write_document(path, doc) {
            Ok(()) => Durability::Persisted,
            Err(e) => {
                warn!(error = %e, "content write kept in cache only");
                Durability::CachedOnly
            }
        }
    }
}

/// Write the document next to `path` and rename it into place.
fn write_document(path: &Path, doc: &ContentDocument) -> ContentResult<()> {
    let storage_err = |source: io::Error| ContentError::StorageUnavailable {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(storage_err)?;
    }

    let bytes = serde_json::to_vec_pretty(doc)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, bytes).map_err(storage_err)?;
    fs::rename(&tmp, path).map_err(storage_err)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
