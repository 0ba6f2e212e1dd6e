use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FolioError, Result};

#[cfg(feature = "telegram")]
mod telegram;

#[cfg(feature = "telegram")]
pub use telegram::TelegramMembership;

/// Membership of one user in a lock target, as reported by the chat platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    #[serde(alias = "creator")]
    Owner,
    Administrator,
    Member,
    Restricted { is_member: bool },
    Left,
    Kicked,
    Unknown,
}

impl MemberStatus {
    /// Maps a raw platform status string. Unrecognised values deny.
    #[must_use]
    pub fn from_raw(status: &str, is_member: Option<bool>) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "creator" | "owner" => Self::Owner,
            "administrator" => Self::Administrator,
            "member" => Self::Member,
            "restricted" => Self::Restricted {
                is_member: is_member.unwrap_or(false),
            },
            "left" => Self::Left,
            "kicked" | "banned" => Self::Kicked,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn grants_entry(self) -> bool {
        match self {
            Self::Owner | Self::Administrator | Self::Member => true,
            Self::Restricted { is_member } => is_member,
            Self::Left | Self::Kicked | Self::Unknown => false,
        }
    }
}

#[async_trait]
pub trait MembershipProvider: Send + Sync {
    async fn status(&self, chat: &str, user_id: i64) -> Result<MemberStatus>;
}

/// Fixed membership table. Users absent from a chat are reported as `Left`.
#[derive(Debug, Default, Clone)]
pub struct StaticMembership {
    statuses: HashMap<(String, i64), MemberStatus>,
    failing_chats: Vec<String>,
}

impl StaticMembership {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_status(mut self, chat: &str, user_id: i64, status: MemberStatus) -> Self {
        self.statuses.insert((chat.to_string(), user_id), status);
        self
    }

    /// Every query against `chat` returns an error.
    #[must_use]
    pub fn with_failing_chat(mut self, chat: &str) -> Self {
        self.failing_chats.push(chat.to_string());
        self
    }
}

#[async_trait]
impl MembershipProvider for StaticMembership {
    async fn status(&self, chat: &str, user_id: i64) -> Result<MemberStatus> {
        if self.failing_chats.iter().any(|failing| failing == chat) {
            return Err(FolioError::Membership(format!("chat {chat} unavailable")));
        }
        Ok(self
            .statuses
            .get(&(chat.to_string(), user_id))
            .copied()
            .unwrap_or(MemberStatus::Left))
    }
}

/// Decides whether an identity may open a locked folder.
#[derive(Clone)]
pub struct AccessGate {
    provider: Arc<dyn MembershipProvider>,
    operator_id: Option<i64>,
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("operator_id", &self.operator_id)
            .finish_non_exhaustive()
    }
}

impl AccessGate {
    pub fn new(provider: Arc<dyn MembershipProvider>, operator_id: Option<i64>) -> Self {
        Self {
            provider,
            operator_id,
        }
    }

    #[must_use]
    pub fn operator_id(&self) -> Option<i64> {
        self.operator_id
    }

    /// Evaluates an effective lock target. Never errors: any provider failure
    /// denies entry.
    pub async fn allows(&self, lock_target: Option<&str>, user_id: i64) -> bool {
        let Some(chat) = lock_target else {
            return true;
        };
        if self.operator_id == Some(user_id) {
            return true;
        }
        match self.provider.status(chat, user_id).await {
            Ok(status) => {
                let allowed = status.grants_entry();
                if !allowed {
                    debug!(
                        target: "folio::access",
                        chat = %chat,
                        user_id,
                        status = ?status,
                        "entry denied"
                    );
                }
                allowed
            }
            Err(err) => {
                warn!(
                    target: "folio::access",
                    chat = %chat,
                    user_id,
                    error = %err,
                    "membership query failed; denying entry"
                );
                false
            }
        }
    }
}
