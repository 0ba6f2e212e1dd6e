use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{MemberStatus, MembershipProvider};
use crate::config::DEFAULT_BOT_API_BASE;
use crate::error::{FolioError, Result};

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    result: Option<ChatMember>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMember {
    status: String,
    #[serde(default)]
    is_member: Option<bool>,
}

/// Membership lookups through the Bot API `getChatMember` method.
#[derive(Clone)]
pub struct TelegramMembership {
    base_url: String,
    token: String,
    http: Client,
}

impl std::fmt::Debug for TelegramMembership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramMembership")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TelegramMembership {
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(FolioError::Validation("bot token must not be empty".to_string()));
        }
        let http = Client::builder().build()?;
        Ok(Self {
            base_url: normalize_base_url(base_url),
            token: token.to_string(),
            http,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.base_url, self.token)
    }
}

#[async_trait]
impl MembershipProvider for TelegramMembership {
    async fn status(&self, chat: &str, user_id: i64) -> Result<MemberStatus> {
        let user = user_id.to_string();
        let response = self
            .http
            .get(self.method_url("getChatMember"))
            .query(&[("chat_id", chat), ("user_id", user.as_str())])
            .send()
            .await?;
        let http_status = response.status();
        let envelope = response.json::<ApiEnvelope>().await?;
        if !envelope.ok {
            let reason = envelope
                .description
                .unwrap_or_else(|| format!("http status {http_status}"));
            return Err(FolioError::Membership(reason));
        }
        let member = envelope
            .result
            .ok_or_else(|| FolioError::Membership("response carried no member".to_string()))?;
        Ok(MemberStatus::from_raw(&member.status, member.is_member))
    }
}

fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BOT_API_BASE.to_string()
    } else {
        trimmed.to_string()
    }
}
