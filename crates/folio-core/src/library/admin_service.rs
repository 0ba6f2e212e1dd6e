use crate::error::Result;
use crate::models::{FolderConfig, ItemKind, ItemRecord};
use crate::path::{join, normalize, parent_of, sanitize_name};

use super::Folio;

/// Admin mutations. Each one holds the mutation gate while it writes to the
/// store and refreshes the affected part of the snapshot.
impl Folio {
    /// Creates `name` under `parent` and returns the new folder key.
    pub fn create_folder(&self, parent: &str, name: &str) -> Result<String> {
        let _guard = self.lock_mutations()?;
        let key = self.store.create_folder(parent, name)?;
        self.refresh_scope(&normalize(parent))?;
        Ok(key)
    }

    /// Writes (or replaces) an item and patches the cached listing in place.
    pub fn put_item(&self, dir: &str, name: &str, record: &ItemRecord) -> Result<String> {
        let _guard = self.lock_mutations()?;
        let stored = self.store.write_item(dir, name, record)?;
        self.write_snapshot()?
            .upsert_item(&normalize(dir), &stored, record.kind());
        Ok(stored)
    }

    /// Adds a redirect item pointing at an existing, listed folder.
    pub fn link(&self, dir: &str, name: &str, target: &str) -> Result<String> {
        let target_path = normalize(target);
        self.store.listed_folder(&target_path)?;
        self.put_item(dir, name, &ItemRecord::Redirect { target_path })
    }

    pub fn set_folder_config(&self, key: &str, config: &FolderConfig) -> Result<()> {
        let _guard = self.lock_mutations()?;
        let key = normalize(key);
        self.store.write_folder_config(&key, config)?;
        // The parent's listing carries this folder's icon and lock.
        self.refresh_scope(parent_of(&key).unwrap_or_default())?;
        Ok(())
    }

    pub fn remove_item(&self, dir: &str, name: &str) -> Result<bool> {
        let _guard = self.lock_mutations()?;
        let removed = self.store.remove_item(dir, name)?;
        self.write_snapshot()?
            .remove_item(&normalize(dir), &sanitize_name(name));
        Ok(removed)
    }

    pub fn rename_item(&self, dir: &str, from: &str, to: &str) -> Result<String> {
        let _guard = self.lock_mutations()?;
        let dir = normalize(dir);
        let renamed = self.store.rename_item(&dir, from, to)?;
        let kind = self
            .store
            .read_item(&dir, &renamed)
            .map_or(ItemKind::Unknown, |record| record.kind());
        let mut snapshot = self.write_snapshot()?;
        snapshot.remove_item(&dir, &sanitize_name(from));
        snapshot.upsert_item(&dir, &renamed, kind);
        Ok(renamed)
    }

    pub fn remove_folder(&self, key: &str) -> Result<bool> {
        let _guard = self.lock_mutations()?;
        let key = normalize(key);
        let removed = self.store.remove_folder(&key)?;
        self.refresh_scope(parent_of(&key).unwrap_or_default())?;
        Ok(removed)
    }

    /// Renames the last segment of `key` and returns the new folder key.
    pub fn rename_folder(&self, key: &str, new_name: &str) -> Result<String> {
        let _guard = self.lock_mutations()?;
        let key = normalize(key);
        let renamed = self.store.rename_folder(&key, new_name)?;
        self.refresh_scope(parent_of(&key).unwrap_or_default())?;
        Ok(renamed)
    }

    /// Moves an entry of `dir`: an item when one named `from` exists there,
    /// otherwise the subfolder `from`.
    pub fn rename_entry(&self, dir: &str, from: &str, to: &str) -> Result<String> {
        let is_item = self
            .read_snapshot()?
            .entry(&normalize(dir))
            .is_some_and(|contents| contents.item(&sanitize_name(from)).is_some());
        if is_item {
            self.rename_item(dir, from, to)
        } else {
            self.rename_folder(&join(dir, from), to)
        }
    }
}
