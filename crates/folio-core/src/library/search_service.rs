use rand::Rng;
use tracing::debug;

use crate::error::Result;
use crate::models::{SearchHit, Suggestion};
use crate::search::{Selection, search_rows, select};
use crate::suggest::suggest_from;

use super::Folio;

impl Folio {
    /// Ranked hits for `query` over every indexed name, locked folders included.
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let hits = search_rows(self.read_snapshot()?.rows(), query);
        debug!(target: "folio::search", query = %query, hits = hits.len(), "search");
        Ok(hits)
    }

    /// Search followed by the direct-or-choices policy.
    pub fn select(&self, query: &str) -> Result<Selection> {
        let hits = self.search(query)?;
        Ok(select(hits, self.config.search_choices))
    }

    pub fn suggest(&self, path: &str) -> Result<Option<Suggestion>> {
        self.suggest_with(path, &mut rand::rng())
    }

    pub fn suggest_with<R: Rng + ?Sized>(&self, path: &str, rng: &mut R) -> Result<Option<Suggestion>> {
        let snapshot = self.read_snapshot()?;
        Ok(suggest_from(&snapshot, path, rng))
    }
}
