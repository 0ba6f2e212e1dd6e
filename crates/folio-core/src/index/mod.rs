use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::{DirContents, FolderConfig, ItemKind};
use crate::path::{ancestors, is_within};

mod builder;
mod lifecycle;
mod natural;

pub use builder::{BuiltTree, build_tree};
pub use natural::natural_cmp;

/// Flat row of the search index: one per folder or item visited by a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRow {
    pub name: String,
    /// Key of the folder that lists this row.
    pub parent: String,
    pub is_folder: bool,
    pub kind: Option<ItemKind>,
}

impl SearchRow {
    /// Key of the folder a reader should open for this row.
    #[must_use]
    pub fn target_path(&self) -> String {
        if self.is_folder {
            crate::path::join(&self.parent, &self.name)
        } else {
            self.parent.clone()
        }
    }
}

/// In-memory mirror of the content store.
///
/// Entries are keyed by normalized relative path (root is `""`). The snapshot
/// never originates data; every change arrives through a build or one of the
/// incremental updates in `lifecycle`.
#[derive(Debug, Default, Clone)]
pub struct IndexSnapshot {
    entries: BTreeMap<String, DirContents>,
    configs: BTreeMap<String, FolderConfig>,
    rows: Vec<SearchRow>,
    built_at: Option<DateTime<Utc>>,
}

impl IndexSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached listing for `key`; an uncached folder reads as empty.
    #[must_use]
    pub fn dir_contents(&self, key: &str) -> DirContents {
        self.entries.get(key).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&DirContents> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn folder_config(&self, key: &str) -> Option<&FolderConfig> {
        self.configs.get(key)
    }

    /// Lock target of the nearest locked folder on the way from `key` to the root.
    #[must_use]
    pub fn effective_lock(&self, key: &str) -> Option<&str> {
        ancestors(key).find_map(|ancestor| {
            self.configs
                .get(ancestor)
                .and_then(FolderConfig::lock_target)
        })
    }

    #[must_use]
    pub fn rows(&self) -> &[SearchRow] {
        &self.rows
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.configs.clear();
        self.rows.clear();
        self.built_at = None;
    }

    /// Replaces everything with a freshly built tree.
    pub fn replace_all(&mut self, tree: BuiltTree) {
        self.clear();
        self.merge(tree);
    }

    /// Replaces the entries under `subtree` and leaves every other entry as it was.
    pub fn replace_subtree(&mut self, subtree: &str, tree: BuiltTree) {
        self.entries.retain(|key, _| !is_within(key, subtree));
        self.configs.retain(|key, _| !is_within(key, subtree));
        self.rows.retain(|row| !is_within(&row.parent, subtree));
        self.merge(tree);
    }

    fn merge(&mut self, tree: BuiltTree) {
        self.entries.extend(tree.entries);
        self.configs.extend(tree.configs);
        self.rows.extend(tree.rows);
        self.built_at = Some(tree.built_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FolderSummary, ItemSummary};

    fn tree_with(key: &str, folder: &str, config: Option<FolderConfig>) -> BuiltTree {
        let mut tree = BuiltTree::empty();
        tree.entries.push((
            key.to_string(),
            DirContents {
                folders: vec![FolderSummary {
                    name: folder.to_string(),
                    icon: "📁".to_string(),
                    lock_target: None,
                }],
                items: vec![ItemSummary {
                    name: "note".to_string(),
                    icon: "❓".to_string(),
                    kind: ItemKind::Qa,
                }],
            },
        ));
        if let Some(config) = config {
            tree.configs.push((key.to_string(), config));
        }
        tree.rows.push(SearchRow {
            name: folder.to_string(),
            parent: key.to_string(),
            is_folder: true,
            kind: None,
        });
        tree
    }

    #[test]
    fn uncached_paths_read_as_empty() {
        let snapshot = IndexSnapshot::new();
        assert!(snapshot.dir_contents("Nowhere").is_empty());
        assert!(snapshot.entry("Nowhere").is_none());
    }

    #[test]
    fn replace_subtree_keeps_siblings() {
        let mut snapshot = IndexSnapshot::new();
        snapshot.replace_all(tree_with("A", "old", None));
        let mut b = tree_with("B", "b-child", None);
        b.entries.extend(tree_with("A/x", "deep", None).entries);
        snapshot.merge(b);

        let before_b = snapshot.dir_contents("B");
        snapshot.replace_subtree("A", tree_with("A", "new", None));

        assert_eq!(snapshot.dir_contents("B"), before_b);
        assert_eq!(snapshot.dir_contents("A").folders[0].name, "new");
        assert!(snapshot.entry("A/x").is_none());
        assert_eq!(
            snapshot
                .rows()
                .iter()
                .filter(|row| row.parent == "A")
                .count(),
            1
        );
    }

    #[test]
    fn effective_lock_is_inherited_from_nearest_locked_ancestor() {
        let mut snapshot = IndexSnapshot::new();
        let locked = FolderConfig {
            locked_channel: Some("@vip".to_string()),
            ..FolderConfig::default()
        };
        snapshot.replace_all(tree_with("Vip", "inner", Some(locked)));
        assert_eq!(snapshot.effective_lock("Vip"), Some("@vip"));
        assert_eq!(snapshot.effective_lock("Vip/inner/deeper"), Some("@vip"));
        assert_eq!(snapshot.effective_lock("Public"), None);
        assert_eq!(snapshot.effective_lock(""), None);
    }

    #[test]
    fn search_row_target_path_points_at_navigable_folder() {
        let folder = SearchRow {
            name: "Action".to_string(),
            parent: "Movies".to_string(),
            is_folder: true,
            kind: None,
        };
        let item = SearchRow {
            name: "Heat".to_string(),
            parent: "Movies/Action".to_string(),
            is_folder: false,
            kind: Some(ItemKind::Copy),
        };
        assert_eq!(folder.target_path(), "Movies/Action");
        assert_eq!(item.target_path(), "Movies/Action");
    }
}
