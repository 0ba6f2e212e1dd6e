use serde::Serialize;

use crate::models::ItemRecord;
use crate::path::normalize;

/// What opening an item should do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Hand the record to the delivery layer.
    Deliver { record: ItemRecord },
    /// Open another folder instead. `path` is already normalized.
    Navigate { path: String },
    /// The redirect target is locked for this user; nothing moves.
    Denied { path: String },
}

/// Turns a stored record into an [`Intent`]. A redirect is never delivered
/// itself; its target is clamped the same way the resolver clamps paths.
#[must_use]
pub fn resolve_item(record: ItemRecord) -> Intent {
    match record {
        ItemRecord::Redirect { target_path } => Intent::Navigate {
            path: normalize(&target_path),
        },
        record => Intent::Deliver { record },
    }
}
