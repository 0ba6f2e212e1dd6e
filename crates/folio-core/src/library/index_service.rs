use std::sync::{MutexGuard, RwLockReadGuard, RwLockWriteGuard};

use tracing::info;

use crate::error::{FolioError, Result};
use crate::index::{IndexSnapshot, build_tree};
use crate::models::RebuildStats;
use crate::path::normalize;

use super::Folio;

impl Folio {
    /// Rebuilds the whole snapshot (`None`) or only the entries under one
    /// subtree. A subtree that normalizes to the root is a full rebuild.
    pub fn rebuild(&self, subtree: Option<&str>) -> Result<RebuildStats> {
        let _guard = self.lock_mutations()?;
        self.refresh_scope(subtree.map(normalize).unwrap_or_default().as_str())
    }

    /// Number of cached folder entries.
    pub fn cached_folders(&self) -> Result<usize> {
        Ok(self.read_snapshot()?.len())
    }

    pub(super) fn read_snapshot(&self) -> Result<RwLockReadGuard<'_, IndexSnapshot>> {
        self.snapshot
            .read()
            .map_err(|_| FolioError::lock_poisoned("index"))
    }

    pub(super) fn write_snapshot(&self) -> Result<RwLockWriteGuard<'_, IndexSnapshot>> {
        self.snapshot
            .write()
            .map_err(|_| FolioError::lock_poisoned("index"))
    }

    /// Serializes writers. Readers never take it.
    pub(super) fn lock_mutations(&self) -> Result<MutexGuard<'_, ()>> {
        self.mutation_gate
            .lock()
            .map_err(|_| FolioError::lock_poisoned("mutation gate"))
    }

    /// Walks `scope` outside the lock, then swaps the result in. Callers
    /// hold the mutation gate.
    pub(super) fn refresh_scope(&self, scope: &str) -> Result<RebuildStats> {
        let tree = build_tree(self.store.resolver(), scope);
        let stats = tree.stats();
        {
            let mut snapshot = self.write_snapshot()?;
            if scope.is_empty() {
                snapshot.replace_all(tree);
            } else {
                snapshot.replace_subtree(scope, tree);
            }
        }
        info!(
            target: "folio::index",
            scope = %stats.scope,
            folders = stats.folders,
            items = stats.items,
            unreadable_items = stats.unreadable_items,
            elapsed_ms = stats.elapsed_ms,
            "index rebuilt"
        );
        Ok(stats)
    }
}
