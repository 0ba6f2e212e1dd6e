use std::path::PathBuf;

use crate::error::Result;
use crate::models::{DirContents, Page};
use crate::paginate::{folder_labels, paginate};
use crate::path::normalize;
use crate::redirect::{Intent, resolve_item};
use crate::session::SessionContext;

use super::Folio;

impl Folio {
    /// Cached listing of `path`; an uncached path reads as empty.
    pub fn get_dir_contents(&self, path: &str) -> Result<DirContents> {
        Ok(self.read_snapshot()?.dir_contents(&normalize(path)))
    }

    /// Absolute location of `path`, clamped inside the store root.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.store.resolver().resolve(path)
    }

    /// One page of `"{icon} {name}"` labels for `path`.
    pub fn page(&self, path: &str, page_index: usize) -> Result<Page<String>> {
        let contents = self.get_dir_contents(path)?;
        Ok(paginate(
            &folder_labels(&contents),
            page_index,
            self.config.page_size,
        ))
    }

    /// Reads the item payload from the store and decides what opening it does.
    pub fn open_item(&self, dir: &str, name: &str) -> Result<Intent> {
        let record = self.store.read_item(dir, name)?;
        Ok(resolve_item(record))
    }

    /// Moves `session` into `path` if the gate allows it. A denied entry
    /// leaves the session where it was.
    pub async fn enter(&self, session: &mut SessionContext, path: &str, user_id: i64) -> Result<bool> {
        if !self.can_enter(path, user_id).await? {
            return Ok(false);
        }
        session.navigate(path);
        Ok(true)
    }

    /// Opens `name` in the session's current folder. Redirects are followed
    /// through the gate and count toward the session's hop bound; a gate
    /// denial comes back as [`Intent::Denied`] with the session untouched.
    pub async fn open_in_session(
        &self,
        session: &mut SessionContext,
        name: &str,
        user_id: i64,
    ) -> Result<Intent> {
        let intent = self.open_item(&session.path, name)?;
        match intent {
            Intent::Navigate { path } => {
                if !self.can_enter(&path, user_id).await? {
                    return Ok(Intent::Denied { path });
                }
                session.follow_redirect(&path, self.config.max_redirect_hops)?;
                Ok(Intent::Navigate { path })
            }
            intent => {
                session.redirect_hops = 0;
                Ok(intent)
            }
        }
    }
}
