use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{FolioError, Result};
use crate::models::{FolderConfig, ItemRecord};
use crate::path::{PathResolver, join, normalize, parent_of, sanitize_name};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const ITEM_EXTENSION: &str = "json";

const RESERVED_RECORDS: &[&str] = &[
    CONFIG_FILE_NAME,
    "user.json",
    "users.json",
    "metadata.json",
    "preview.json",
    "activity.json",
    "links.json",
];
const RESERVED_ROOT_DIRS: &[&str] = &["_system"];

#[must_use]
pub fn is_reserved_record(file_name: &str) -> bool {
    RESERVED_RECORDS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(file_name))
}

#[must_use]
pub fn is_reserved_root_dir(name: &str) -> bool {
    RESERVED_ROOT_DIRS.contains(&name)
}

/// True when a rebuild would list the folder at `key`: no dot-prefixed
/// segment and no reserved top-level folder.
#[must_use]
pub fn is_listed_key(key: &str) -> bool {
    let key = normalize(key);
    let mut segments = key.split('/').filter(|segment| !segment.is_empty());
    match segments.next() {
        None => true,
        Some(first) if first.starts_with('.') || is_reserved_root_dir(first) => false,
        Some(_) => segments.all(|segment| !segment.starts_with('.')),
    }
}

/// Item name for a record file name (`Lost.json` -> `Lost`).
#[must_use]
pub fn item_name(file_name: &str) -> Option<&str> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    (ext.eq_ignore_ascii_case(ITEM_EXTENSION) && !stem.is_empty()).then_some(stem)
}

pub fn read_item_at(path: &Path) -> Result<ItemRecord> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Folder config stored in `dir`, if present and readable.
#[must_use]
pub fn load_folder_config(dir: &Path) -> Option<FolderConfig> {
    let path = dir.join(CONFIG_FILE_NAME);
    let raw = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(config) => Some(config),
        Err(err) => {
            warn!(target: "folio::store", path = %path.display(), error = %err, "ignoring malformed folder config");
            None
        }
    }
}

/// On-disk content hierarchy: folders, `<name>.json` item records and
/// optional `config.json` per folder.
#[derive(Debug, Clone)]
pub struct LocalContentStore {
    resolver: PathResolver,
}

impl LocalContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            resolver: PathResolver::new(root),
        }
    }

    #[must_use]
    pub const fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn initialize(&self) -> Result<()> {
        fs::create_dir_all(self.resolver.root())?;
        Ok(())
    }

    #[must_use]
    pub fn folder_exists(&self, key: &str) -> bool {
        self.resolver.resolve(key).is_dir()
    }

    /// Existing folder that a rebuild lists. Hidden and reserved folders are
    /// rejected so incremental writes never surface entries a rebuild drops.
    pub fn listed_folder(&self, key: &str) -> Result<PathBuf> {
        if !is_listed_key(key) {
            return Err(FolioError::Validation(format!(
                "folder is hidden or reserved: {}",
                normalize(key)
            )));
        }
        self.existing_folder(key)
    }

    /// Creates `name` under `parent` and returns the new folder key.
    pub fn create_folder(&self, parent: &str, name: &str) -> Result<String> {
        let name = Self::checked_name(name)?;
        let parent_path = self.listed_folder(parent)?;
        if normalize(parent).is_empty() && is_reserved_root_dir(&name) {
            return Err(FolioError::Validation(format!("reserved folder name: {name}")));
        }
        let path = parent_path.join(&name);
        if path.exists() && !path.is_dir() {
            return Err(FolioError::Conflict(format!("not a folder: {name}")));
        }
        fs::create_dir_all(&path)?;
        let key = join(parent, &name);
        info!(target: "folio::store", folder = %key, "folder created");
        Ok(key)
    }

    /// Writes an item record and returns the stored item name.
    pub fn write_item(&self, dir: &str, name: &str, record: &ItemRecord) -> Result<String> {
        let name = Self::checked_name(name)?;
        let dir_path = self.listed_folder(dir)?;
        let file_name = Self::item_file_name(&name)?;
        let content = serde_json::to_string_pretty(record)?;
        write_atomic(&dir_path.join(file_name), &content)?;
        info!(target: "folio::store", folder = %normalize(dir), item = %name, kind = %record.kind(), "item written");
        Ok(name)
    }

    pub fn read_item(&self, dir: &str, name: &str) -> Result<ItemRecord> {
        let path = self.item_path(dir, name)?;
        if !path.is_file() {
            return Err(FolioError::NotFound(join(dir, name)));
        }
        read_item_at(&path)
    }

    pub fn remove_item(&self, dir: &str, name: &str) -> Result<bool> {
        let path = self.item_path(dir, name)?;
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        info!(target: "folio::store", folder = %normalize(dir), item = %name, "item removed");
        Ok(true)
    }

    pub fn rename_item(&self, dir: &str, from: &str, to: &str) -> Result<String> {
        let to = Self::checked_name(to)?;
        self.listed_folder(dir)?;
        let from_path = self.item_path(dir, from)?;
        if !from_path.is_file() {
            return Err(FolioError::NotFound(join(dir, from)));
        }
        let to_path = self.item_path(dir, &to)?;
        if to_path.exists() {
            return Err(FolioError::Conflict(join(dir, &to)));
        }
        fs::rename(from_path, to_path)?;
        Ok(to)
    }

    pub fn read_folder_config(&self, key: &str) -> Option<FolderConfig> {
        load_folder_config(&self.resolver.resolve(key))
    }

    pub fn write_folder_config(&self, key: &str, config: &FolderConfig) -> Result<()> {
        let dir_path = self.existing_folder(key)?;
        let content = serde_json::to_string_pretty(config)?;
        write_atomic(&dir_path.join(CONFIG_FILE_NAME), &content)
    }

    pub fn remove_folder(&self, key: &str) -> Result<bool> {
        let key = self.non_root_key(key)?;
        let path = self.resolver.resolve(&key);
        if !path.is_dir() {
            return Ok(false);
        }
        fs::remove_dir_all(path)?;
        info!(target: "folio::store", folder = %key, "folder removed");
        Ok(true)
    }

    /// Renames the last segment of `key` and returns the new folder key.
    pub fn rename_folder(&self, key: &str, new_name: &str) -> Result<String> {
        let key = self.non_root_key(key)?;
        let new_name = Self::checked_name(new_name)?;
        let from_path = self.existing_folder(&key)?;
        let parent = parent_of(&key).unwrap_or_default();
        if parent.is_empty() && is_reserved_root_dir(&new_name) {
            return Err(FolioError::Validation(format!(
                "reserved folder name: {new_name}"
            )));
        }
        let to_key = join(parent, &new_name);
        let to_path = self.resolver.resolve(&to_key);
        if to_path.exists() {
            return Err(FolioError::Conflict(to_key));
        }
        fs::rename(from_path, to_path)?;
        info!(target: "folio::store", from = %key, to = %to_key, "folder renamed");
        Ok(to_key)
    }

    fn existing_folder(&self, key: &str) -> Result<PathBuf> {
        let path = self.resolver.resolve(key);
        if !path.is_dir() {
            return Err(FolioError::NotFound(normalize(key)));
        }
        Ok(path)
    }

    fn non_root_key(&self, key: &str) -> Result<String> {
        let key = normalize(key);
        if key.is_empty() {
            return Err(FolioError::PermissionDenied(
                "the store root cannot be removed or renamed".to_string(),
            ));
        }
        if self.resolver.resolve(&key).as_path() == self.resolver.root() {
            return Err(FolioError::PermissionDenied(format!(
                "folder resolves to the store root: {key}"
            )));
        }
        Ok(key)
    }

    fn item_path(&self, dir: &str, name: &str) -> Result<PathBuf> {
        let name = Self::checked_name(name)?;
        Ok(self.resolver.resolve(dir).join(Self::item_file_name(&name)?))
    }

    fn item_file_name(name: &str) -> Result<String> {
        let file_name = format!("{name}.{ITEM_EXTENSION}");
        if is_reserved_record(&file_name) {
            return Err(FolioError::Validation(format!("reserved item name: {name}")));
        }
        Ok(file_name)
    }

    fn checked_name(raw: &str) -> Result<String> {
        let name = sanitize_name(raw);
        if name.is_empty() || name.starts_with('.') {
            return Err(FolioError::Validation(format!("invalid name: {raw:?}")));
        }
        Ok(name)
    }
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| FolioError::Validation(format!("target has no parent: {}", path.display())))?;
    let file_name = path
        .file_name()
        .and_then(|x| x.to_str())
        .ok_or_else(|| FolioError::Validation(format!("invalid target filename: {}", path.display())))?;
    let tmp_path = parent.join(format!(".{file_name}.folio.tmp.{}", uuid::Uuid::new_v4().simple()));

    {
        let mut tmp = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&tmp_path)?;
        tmp.write_all(content.as_bytes())?;
        tmp.sync_all()?;
    }

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(FolioError::from(err));
    }
    Ok(())
}
