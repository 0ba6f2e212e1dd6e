use crate::error::Result;
use crate::path::normalize;

use super::Folio;

impl Folio {
    /// Whether `user_id` may open `path`. The lock is inherited from the
    /// nearest locked ancestor; provider failures deny.
    pub async fn can_enter(&self, path: &str, user_id: i64) -> Result<bool> {
        let lock = self
            .read_snapshot()?
            .effective_lock(&normalize(path))
            .map(ToString::to_string);
        Ok(self.gate.allows(lock.as_deref(), user_id).await)
    }
}
