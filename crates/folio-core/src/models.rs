use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FOLDER_ICON: &str = "📁";
pub const GENERIC_ITEM_ICON: &str = "📄";

/// Chat reference of a `copy` item: a numeric id or a public `@username`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatRef {
    Id(i64),
    Username(String),
}

impl Display for ChatRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Username(name) => f.write_str(name),
        }
    }
}

/// One deliverable record, stored as `<folder>/<name>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemRecord {
    Copy {
        from_chat_id: ChatRef,
        message_id: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Url {
        url: String,
    },
    Redirect {
        target_path: String,
    },
    Qa {
        question: String,
        answer: String,
    },
    Poll {
        question: String,
        options: Vec<String>,
        correct_option_id: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
}

impl ItemRecord {
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Copy { .. } => ItemKind::Copy,
            Self::Url { .. } => ItemKind::Url,
            Self::Redirect { .. } => ItemKind::Redirect,
            Self::Qa { .. } => ItemKind::Qa,
            Self::Poll { .. } => ItemKind::Poll,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Copy,
    Url,
    Redirect,
    Qa,
    Poll,
    /// The record exists but could not be parsed.
    Unknown,
}

impl ItemKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Url => "url",
            Self::Redirect => "redirect",
            Self::Qa => "qa",
            Self::Poll => "poll",
            Self::Unknown => "unknown",
        }
    }

    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Copy => "🎬",
            Self::Url => "🔗",
            Self::Redirect => "↪️",
            Self::Qa => "❓",
            Self::Poll => "📊",
            Self::Unknown => GENERIC_ITEM_ICON,
        }
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional per-folder `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl FolderConfig {
    #[must_use]
    pub fn icon_or_default(&self) -> String {
        self.icon
            .as_deref()
            .map(str::trim)
            .filter(|icon| !icon.is_empty())
            .unwrap_or(DEFAULT_FOLDER_ICON)
            .to_string()
    }

    #[must_use]
    pub fn lock_target(&self) -> Option<&str> {
        self.locked_channel
            .as_deref()
            .map(str::trim)
            .filter(|target| !target.is_empty())
    }

    #[must_use]
    pub fn manual_suggestions(&self) -> Option<&[String]> {
        self.suggestions
            .as_deref()
            .filter(|suggestions| !suggestions.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderSummary {
    pub name: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub name: String,
    pub icon: String,
    pub kind: ItemKind,
}

/// Cached listing of one folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirContents {
    pub folders: Vec<FolderSummary>,
    pub items: Vec<ItemSummary>,
}

impl DirContents {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.items.is_empty()
    }

    #[must_use]
    pub fn folder(&self, name: &str) -> Option<&FolderSummary> {
        self.folders.iter().find(|folder| folder.name == name)
    }

    #[must_use]
    pub fn item(&self, name: &str) -> Option<&ItemSummary> {
        self.items.iter().find(|item| item.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub name: String,
    /// Folder to navigate to: the folder itself, or the item's parent.
    pub path: String,
    pub is_folder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ItemKind>,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    /// Folder that contains the suggested entry.
    pub path: String,
    pub is_folder: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub labels: Vec<T>,
    pub page_index: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebuildStats {
    pub scope: String,
    pub folders: usize,
    pub items: usize,
    pub unreadable_items: usize,
    pub elapsed_ms: u128,
    pub built_at: DateTime<Utc>,
}
