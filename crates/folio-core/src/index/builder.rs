use std::fs;
use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::SearchRow;
use super::natural::natural_cmp;
use crate::models::{
    DirContents, FolderConfig, FolderSummary, ItemKind, ItemSummary, RebuildStats,
};
use crate::path::{PathResolver, normalize};
use crate::store::{is_reserved_record, is_reserved_root_dir, item_name, load_folder_config, read_item_at};

/// Result of walking one subtree, ready to be merged into a snapshot.
#[derive(Debug, Clone)]
pub struct BuiltTree {
    pub(crate) scope: String,
    pub(crate) entries: Vec<(String, DirContents)>,
    pub(crate) configs: Vec<(String, FolderConfig)>,
    pub(crate) rows: Vec<SearchRow>,
    pub(crate) unreadable_items: usize,
    pub(crate) built_at: DateTime<Utc>,
    elapsed_ms: u128,
}

impl BuiltTree {
    pub(crate) fn empty() -> Self {
        Self {
            scope: String::new(),
            entries: Vec::new(),
            configs: Vec::new(),
            rows: Vec::new(),
            unreadable_items: 0,
            built_at: Utc::now(),
            elapsed_ms: 0,
        }
    }

    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    #[must_use]
    pub fn stats(&self) -> RebuildStats {
        RebuildStats {
            scope: self.scope.clone(),
            folders: self.entries.len(),
            items: self.entries.iter().map(|(_, dir)| dir.items.len()).sum(),
            unreadable_items: self.unreadable_items,
            elapsed_ms: self.elapsed_ms,
            built_at: self.built_at,
        }
    }

    fn visit_dir(&mut self, path: &Path, key: &str) {
        let read_dir = match fs::read_dir(path) {
            Ok(read_dir) => read_dir,
            Err(err) => {
                warn!(target: "folio::index", path = %key, error = %err, "skipping unreadable folder");
                return;
            }
        };

        let mut contents = DirContents::default();
        for dirent in read_dir.flatten() {
            let name = dirent.file_name().to_string_lossy().to_string();
            if name.starts_with('.') || is_reserved_record(&name) {
                continue;
            }
            let Ok(file_type) = dirent.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                if key.is_empty() && is_reserved_root_dir(&name) {
                    continue;
                }
                let config = load_folder_config(&dirent.path()).unwrap_or_default();
                contents.folders.push(FolderSummary {
                    icon: config.icon_or_default(),
                    lock_target: config.lock_target().map(ToString::to_string),
                    name,
                });
            } else if file_type.is_file() {
                let Some(stem) = item_name(&name) else {
                    continue;
                };
                let kind = match read_item_at(&dirent.path()) {
                    Ok(record) => record.kind(),
                    Err(err) => {
                        warn!(
                            target: "folio::index",
                            folder = %key,
                            item = %stem,
                            error = %err,
                            "unparsable item record kept with generic type"
                        );
                        self.unreadable_items += 1;
                        ItemKind::Unknown
                    }
                };
                contents.items.push(ItemSummary {
                    name: stem.to_string(),
                    icon: kind.icon().to_string(),
                    kind,
                });
            }
        }

        contents.folders.sort_by(|a, b| natural_cmp(&a.name, &b.name));
        contents.items.sort_by(|a, b| natural_cmp(&a.name, &b.name));

        for folder in &contents.folders {
            self.rows.push(SearchRow {
                name: folder.name.clone(),
                parent: key.to_string(),
                is_folder: true,
                kind: None,
            });
        }
        for item in &contents.items {
            self.rows.push(SearchRow {
                name: item.name.clone(),
                parent: key.to_string(),
                is_folder: false,
                kind: Some(item.kind),
            });
        }

        if let Some(config) = load_folder_config(path) {
            self.configs.push((key.to_string(), config));
        }
        self.entries.push((key.to_string(), contents));
    }
}

/// Walks the store from `subtree` (root when empty) and collects every folder
/// listing below it.
///
/// Never fails: unreadable folders are skipped and unparsable records are
/// kept as [`ItemKind::Unknown`]. A subtree that no longer exists yields an
/// empty tree, which removes its entries when merged.
#[must_use]
pub fn build_tree(resolver: &PathResolver, subtree: &str) -> BuiltTree {
    let started = Instant::now();
    let scope = normalize(subtree);
    let mut tree = BuiltTree::empty();
    tree.scope.clone_from(&scope);

    let start = resolver.resolve(&scope);
    let clamped = !scope.is_empty() && start.as_path() == resolver.root();
    if clamped || !start.is_dir() {
        debug!(target: "folio::index", scope = %scope, "subtree missing; nothing to walk");
        return tree;
    }

    let root = resolver.root().to_path_buf();
    let walker = WalkDir::new(&start)
        .follow_links(false)
        .sort_by(|a, b| {
            natural_cmp(
                &a.file_name().to_string_lossy(),
                &b.file_name().to_string_lossy(),
            )
        })
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || is_listed_dir(entry, &root));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(target: "folio::index", error = %err, "walk error; continuing");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let Some(key) = resolver.key_for(entry.path()) else {
            continue;
        };
        tree.visit_dir(entry.path(), &key);
    }

    tree.elapsed_ms = started.elapsed().as_millis();
    tree
}

fn is_listed_dir(entry: &DirEntry, root: &Path) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return false;
    }
    let at_top_level = entry.path().parent() == Some(root);
    !(at_top_level && is_reserved_root_dir(&name))
}
