use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::path::normalize;

/// Per-session browsing cursor. Owned by the caller and passed in explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub path: String,
    pub page: usize,
    /// Consecutive redirects followed since the last ordinary navigation.
    pub redirect_hops: usize,
}

impl SessionContext {
    #[must_use]
    pub fn at(path: &str) -> Self {
        Self {
            path: normalize(path),
            ..Self::default()
        }
    }

    /// Ordinary navigation: moves to `path` and resets paging and hop count.
    pub fn navigate(&mut self, path: &str) {
        self.path = normalize(path);
        self.page = 0;
        self.redirect_hops = 0;
    }

    /// Navigation caused by a redirect item. Fails once more than `max_hops`
    /// redirects have been followed in a row; the cursor is left unchanged.
    pub fn follow_redirect(&mut self, target: &str, max_hops: usize) -> Result<()> {
        let target = normalize(target);
        if self.redirect_hops >= max_hops {
            return Err(FolioError::RedirectLoop {
                path: target,
                max_hops,
            });
        }
        self.path = target;
        self.page = 0;
        self.redirect_hops += 1;
        Ok(())
    }

    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// Contents changed under the cursor; start again from the first page.
    pub fn reset_page(&mut self) {
        self.page = 0;
    }
}
