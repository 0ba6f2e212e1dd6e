use std::cmp::Ordering;

use crate::index::SearchRow;
use crate::models::SearchHit;

mod noise;
mod select;

pub use select::{DIRECT_MATCH_SCORE, Selection, select};

pub(crate) use noise::is_noise_name;

pub const TIER_EXACT: f32 = 100.0;
pub const TIER_PREFIX: f32 = 80.0;
pub const TIER_WORD_BOUNDARY: f32 = 60.0;
pub const TIER_ALL_TOKENS: f32 = 20.0;

const LENGTH_PENALTY_PER_CHAR: f32 = 0.1;
const MAX_LENGTH_PENALTY: f32 = 10.0;

/// Lower-cased query with its whitespace tokens, computed once per search.
#[derive(Debug, Clone)]
pub struct NameQuery {
    text: String,
    tokens: Vec<String>,
    len: usize,
}

impl NameQuery {
    /// `None` for an empty or whitespace-only query.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim().to_lowercase();
        if text.is_empty() {
            return None;
        }
        let tokens = text.split_whitespace().map(ToString::to_string).collect();
        Some(Self {
            len: text.chars().count(),
            text,
            tokens,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Match tier for `name`, or `None` when it does not match at all.
    #[must_use]
    pub fn tier(&self, name: &str) -> Option<f32> {
        let name = name.to_lowercase();
        if name == self.text {
            return Some(TIER_EXACT);
        }
        if name.starts_with(&self.text) {
            return Some(TIER_PREFIX);
        }
        if occurs_on_word_boundary(&name, &self.text) {
            return Some(TIER_WORD_BOUNDARY);
        }
        if self.tokens.iter().all(|token| name.contains(token.as_str())) {
            return Some(TIER_ALL_TOKENS);
        }
        None
    }

    /// Tier minus the length penalty, so closer-length names win ties.
    #[must_use]
    pub fn score(&self, name: &str) -> Option<f32> {
        let tier = self.tier(name)?;
        Some(tier - self.length_penalty(name))
    }

    fn length_penalty(&self, name: &str) -> f32 {
        let extra = name.chars().count().saturating_sub(self.len);
        (usize_to_f32(extra) * LENGTH_PENALTY_PER_CHAR).min(MAX_LENGTH_PENALTY)
    }
}

/// Ranks every row against `query`, best first. Equal scores keep row order.
#[must_use]
pub fn search_rows(rows: &[SearchRow], query: &str) -> Vec<SearchHit> {
    let Some(query) = NameQuery::parse(query) else {
        return Vec::new();
    };

    let mut hits = rows
        .iter()
        .filter(|row| !is_noise_name(&row.name))
        .filter_map(|row| {
            let score = query.score(&row.name)?;
            Some(SearchHit {
                name: row.name.clone(),
                path: row.target_path(),
                is_folder: row.is_folder,
                kind: row.kind,
                score,
            })
        })
        .collect::<Vec<_>>();
    // `sort_by` is stable, which keeps encounter order for equal scores.
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    hits
}

fn occurs_on_word_boundary(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(idx, _)| {
        haystack[..idx]
            .chars()
            .next_back()
            .is_none_or(|prev| !prev.is_alphanumeric())
    })
}

#[allow(
    clippy::cast_precision_loss,
    reason = "name lengths are small; penalty is a coarse tie-break"
)]
fn usize_to_f32(value: usize) -> f32 {
    value as f32
}
