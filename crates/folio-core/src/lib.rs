// Public fallible APIs in this crate share one concrete error contract (`FolioError`).
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod access;
pub mod config;
pub mod error;
pub mod index;
pub mod library;
pub mod models;
pub mod paginate;
pub mod path;
pub mod redirect;
pub mod search;
pub mod session;
pub mod store;
pub mod suggest;

pub use access::{AccessGate, MemberStatus, MembershipProvider, StaticMembership};
#[cfg(feature = "telegram")]
pub use access::TelegramMembership;
pub use config::AppConfig;
pub use error::{ErrorPayload, FolioError, Result};
pub use index::IndexSnapshot;
pub use library::Folio;
pub use models::{
    ChatRef, DirContents, FolderConfig, ItemKind, ItemRecord, Page, RebuildStats, SearchHit,
    Suggestion,
};
pub use redirect::Intent;
pub use search::Selection;
pub use session::SessionContext;
