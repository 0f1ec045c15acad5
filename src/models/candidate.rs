use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One venue returned by the primary provider for a single category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    /// Distance from the search origin, in metres
    pub distance: f64,
    pub rating: f64,
    pub review_count: u32,
    /// Permanently closed, not "closed right now"
    pub is_closed: bool,
}

/// All candidates for one category, in the provider's sort order
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBatch {
    pub category: String,
    pub candidates: Vec<Candidate>,
}

impl CategoryBatch {
    /// Builds a batch, dropping repeated ids (first occurrence wins)
    pub fn new(category: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        let mut seen = HashSet::new();
        let candidates = candidates
            .into_iter()
            .filter(|c| seen.insert(c.id.clone()))
            .collect();

        Self {
            category: category.into(),
            candidates,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}

/// A candidate with its composite score.
///
/// Scores are normalized against the batch they came from and are only
/// comparable within that batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
}
