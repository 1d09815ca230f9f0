use serde::{Deserialize, Serialize};

use crate::models::{Decision, ScoredCandidate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Shortlisted,
    Rejected,
}

impl StatusFilter {
    fn admits(self, decision: Decision) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Shortlisted => decision == Decision::Shortlisted,
            StatusFilter::Rejected => decision == Decision::Rejected,
        }
    }
}

/// The filter controls of a screening view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineFilter {
    /// Any integer is accepted; scores live in 0..=255, so values outside
    /// that range simply admit everyone or no one.
    #[serde(default)]
    pub min_score: i64,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: StatusFilter,
}

impl PipelineFilter {
    /// Returns the visible subset in input order. Results are never re-sorted
    /// by score so cards don't jump around while the user types.
    pub fn apply(&self, candidates: &[ScoredCandidate]) -> Vec<ScoredCandidate> {
        let needle = self.search.trim().to_lowercase();

        candidates
            .iter()
            .filter(|c| i64::from(c.score) >= self.min_score)
            .filter(|c| self.status.admits(c.decision))
            .filter(|c| needle.is_empty() || search_haystack(c).contains(&needle))
            .cloned()
            .collect()
    }
}

/// Lower-cased text a search term is matched against.
fn search_haystack(scored: &ScoredCandidate) -> String {
    let c = &scored.candidate;
    let skills = c
        .skills
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    [
        c.name.as_str(),
        c.email.as_str(),
        c.current_title().unwrap_or(""),
        c.current_company().unwrap_or(""),
        c.address.as_deref().unwrap_or(""),
        skills.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}
