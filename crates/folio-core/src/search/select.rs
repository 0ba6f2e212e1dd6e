use serde::Serialize;

use crate::models::SearchHit;

/// Top score at or above which the best hit is taken without asking.
pub const DIRECT_MATCH_SCORE: f32 = 90.0;

/// What the caller should do with a ranked hit list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "selection", rename_all = "snake_case")]
pub enum Selection {
    Direct { hit: SearchHit },
    Choices { hits: Vec<SearchHit> },
    NoMatch,
}

impl Selection {
    #[must_use]
    pub fn hits(&self) -> &[SearchHit] {
        match self {
            Self::Direct { hit } => std::slice::from_ref(hit),
            Self::Choices { hits } => hits,
            Self::NoMatch => &[],
        }
    }
}

/// Picks a single destination when the ranking is unambiguous, otherwise the
/// first `max_choices` hits.
#[must_use]
pub fn select(mut hits: Vec<SearchHit>, max_choices: usize) -> Selection {
    let Some(top) = hits.first() else {
        return Selection::NoMatch;
    };
    if hits.len() == 1 || top.score >= DIRECT_MATCH_SCORE {
        let hit = hits.swap_remove(0);
        return Selection::Direct { hit };
    }
    hits.truncate(max_choices.max(1));
    Selection::Choices { hits }
}
