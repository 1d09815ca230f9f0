//! Fit Scoring — pluggable estimator that turns a candidate's available signals
//! into a single comparable score when the talent source provides none.
//!
//! Default: `HeuristicScoreEstimator` (pure, deterministic, no I/O).
//!
//! `AppState` holds an `Arc<dyn ScoreEstimator>`, built at startup from config.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Candidate, Decision, ScoredCandidate};

// ────────────────────────────────────────────────────────────────────────────
// Weights
// ────────────────────────────────────────────────────────────────────────────

/// Tunable constants of the heuristic. The defaults are placeholders rather
/// than a validated model, so every one of them is overridable from config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub base: f64,
    pub per_skill: f64,
    pub skill_cap: f64,
    pub profile_bonus: f64,
    pub summary_bonus: f64,
    pub active_bonus: f64,
    pub floor: f64,
    pub ceiling: f64,
    /// Substituted when the arithmetic produces NaN or infinity.
    pub neutral_score: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base: 40.0,
            per_skill: 3.0,
            skill_cap: 30.0,
            profile_bonus: 10.0,
            summary_bonus: 5.0,
            active_bonus: 10.0,
            floor: 20.0,
            ceiling: 99.0,
            neutral_score: 50.0,
        }
    }
}

pub const ACTIVE_STATUS: &str = "active";

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching handlers.
/// Implementations must be total: any candidate, however sparse, gets a score.
pub trait ScoreEstimator: Send + Sync {
    fn estimate(&self, candidate: &Candidate) -> u8;
}

// ────────────────────────────────────────────────────────────────────────────
// HeuristicScoreEstimator — default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Algorithm:
/// 1. start from `base`
/// 2. + min(skills × per_skill, skill_cap)
/// 3. + profile_bonus if a profile URL is present
/// 4. + summary_bonus if a summary is present
/// 5. + active_bonus if status is "active"
/// 6. non-finite → neutral_score, then clamp to [floor, ceiling]
#[derive(Debug, Clone, Default)]
pub struct HeuristicScoreEstimator {
    pub weights: ScoringWeights,
}

impl HeuristicScoreEstimator {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }
}

impl ScoreEstimator for HeuristicScoreEstimator {
    fn estimate(&self, candidate: &Candidate) -> u8 {
        compute_heuristic_score(candidate, &self.weights)
    }
}

fn compute_heuristic_score(candidate: &Candidate, weights: &ScoringWeights) -> u8 {
    let skill_bonus = (candidate.skill_count() as f64 * weights.per_skill).min(weights.skill_cap);

    let mut raw = weights.base + skill_bonus;
    if candidate.profile_url.is_some() {
        raw += weights.profile_bonus;
    }
    if candidate.summary.is_some() {
        raw += weights.summary_bonus;
    }
    if is_active(candidate) {
        raw += weights.active_bonus;
    }

    if !raw.is_finite() {
        raw = weights.neutral_score;
    }

    clamp_to_display(raw, weights)
}

fn is_active(candidate: &Candidate) -> bool {
    candidate
        .status
        .as_deref()
        .map(|s| s.trim().eq_ignore_ascii_case(ACTIVE_STATUS))
        .unwrap_or(false)
}

/// Clamps into the configured window and then into the u8 range, so a
/// misconfigured window can never produce a wrapped or NaN cast.
fn clamp_to_display(raw: f64, weights: &ScoringWeights) -> u8 {
    let (lo, hi) = if weights.floor <= weights.ceiling {
        (weights.floor, weights.ceiling)
    } else {
        (weights.ceiling, weights.floor)
    };
    let mut value = raw.max(lo).min(hi);
    if !value.is_finite() {
        value = ScoringWeights::default().neutral_score;
    }
    value.round().clamp(0.0, u8::MAX as f64) as u8
}

// ────────────────────────────────────────────────────────────────────────────
// List helpers
// ────────────────────────────────────────────────────────────────────────────

/// Scores every candidate, preserving order. Decisions start unset.
pub fn score_candidates(
    estimator: &dyn ScoreEstimator,
    candidates: Vec<Candidate>,
) -> Vec<ScoredCandidate> {
    candidates
        .into_iter()
        .map(|candidate| ScoredCandidate {
            score: estimator.estimate(&candidate),
            candidate,
            decision: Decision::Unset,
        })
        .collect()
}

/// Layers caller-owned decision tags onto a scored list, keyed by
/// `Candidate::key`. Keys with no matching candidate are ignored.
pub fn apply_decisions(scored: &mut [ScoredCandidate], decisions: &HashMap<String, Decision>) {
    if decisions.is_empty() {
        return;
    }
    for entry in scored.iter_mut() {
        if let Some(decision) = decisions.get(&entry.candidate.key()) {
            entry.decision = *decision;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::Skill;

    fn skill(name: &str) -> Skill {
        Skill {
            name: name.to_string(),
            mastery: None,
        }
    }

    fn alice() -> Candidate {
        Candidate {
            name: "Alice Martin".to_string(),
            skills: vec![skill("Python"), skill("TensorFlow"), skill("PyTorch")],
            profile_url: Some("https://linkedin.com/in/alice".to_string()),
            summary: Some("ML engineer".to_string()),
            status: Some("active".to_string()),
            ..Default::default()
        }
    }

    fn estimator() -> HeuristicScoreEstimator {
        HeuristicScoreEstimator::default()
    }

    #[test]
    fn test_full_profile_scores_74() {
        assert_eq!(estimator().estimate(&alice()), 74);
    }

    #[test]
    fn test_empty_candidate_scores_base() {
        let bob = Candidate {
            name: "Bob".to_string(),
            ..Default::default()
        };
        assert_eq!(estimator().estimate(&bob), 40);
    }

    #[test]
    fn test_skill_bonus_is_capped() {
        let many = Candidate {
            skills: (0..50).map(|i| skill(&format!("skill-{i}"))).collect(),
            ..Default::default()
        };
        // 40 + 30 (cap)
        assert_eq!(estimator().estimate(&many), 70);
    }

    #[test]
    fn test_blank_skill_names_do_not_count() {
        let c = Candidate {
            skills: vec![skill(""), skill("Go")],
            ..Default::default()
        };
        assert_eq!(estimator().estimate(&c), 43);
    }

    #[test]
    fn test_status_match_is_case_insensitive() {
        let c = Candidate {
            status: Some(" Active ".to_string()),
            ..Default::default()
        };
        assert_eq!(estimator().estimate(&c), 50);

        let inactive = Candidate {
            status: Some("passive".to_string()),
            ..Default::default()
        };
        assert_eq!(estimator().estimate(&inactive), 40);
    }

    #[test]
    fn test_score_is_clamped_to_ceiling() {
        let weights = ScoringWeights {
            base: 95.0,
            ..Default::default()
        };
        let est = HeuristicScoreEstimator::new(weights);
        assert_eq!(est.estimate(&alice()), 99);
    }

    #[test]
    fn test_score_is_clamped_to_floor() {
        let weights = ScoringWeights {
            base: -100.0,
            ..Default::default()
        };
        let est = HeuristicScoreEstimator::new(weights);
        assert_eq!(est.estimate(&Candidate::default()), 20);
    }

    #[test]
    fn test_non_finite_falls_back_to_neutral() {
        let weights = ScoringWeights {
            per_skill: f64::NAN,
            skill_cap: f64::NAN,
            ..Default::default()
        };
        let est = HeuristicScoreEstimator::new(weights);
        assert_eq!(est.estimate(&alice()), 50);
    }

    #[test]
    fn test_infinite_base_falls_back_to_neutral() {
        let weights = ScoringWeights {
            base: f64::INFINITY,
            ..Default::default()
        };
        let est = HeuristicScoreEstimator::new(weights);
        assert_eq!(est.estimate(&Candidate::default()), 50);
    }

    #[test]
    fn test_scores_always_within_display_window() {
        let est = estimator();
        let samples = vec![
            Candidate::default(),
            alice(),
            Candidate {
                skills: (0..1000).map(|i| skill(&i.to_string())).collect(),
                profile_url: Some("x".to_string()),
                summary: Some("y".to_string()),
                status: Some("active".to_string()),
                ..Default::default()
            },
        ];
        for c in &samples {
            let s = est.estimate(c);
            assert!((20..=99).contains(&s), "score {s} out of range");
        }
    }

    #[test]
    fn test_estimate_is_idempotent() {
        let est = estimator();
        let c = alice();
        assert_eq!(est.estimate(&c), est.estimate(&c));
    }

    #[test]
    fn test_score_candidates_preserves_order() {
        let bob = Candidate {
            name: "Bob".to_string(),
            ..Default::default()
        };
        let scored = score_candidates(&estimator(), vec![bob, alice()]);
        assert_eq!(scored[0].candidate.name, "Bob");
        assert_eq!(scored[0].score, 40);
        assert_eq!(scored[1].score, 74);
        assert!(scored.iter().all(|s| s.decision == Decision::Unset));
    }

    #[test]
    fn test_apply_decisions_matches_by_key() {
        let mut scored = score_candidates(
            &estimator(),
            vec![
                Candidate {
                    email: "bob@example.com".to_string(),
                    ..Default::default()
                },
                Candidate {
                    id: Some("c-2".to_string()),
                    ..Default::default()
                },
            ],
        );
        let decisions = HashMap::from([
            ("bob@example.com".to_string(), Decision::Rejected),
            ("c-2".to_string(), Decision::Shortlisted),
            ("ghost".to_string(), Decision::Shortlisted),
        ]);
        apply_decisions(&mut scored, &decisions);
        assert_eq!(scored[0].decision, Decision::Rejected);
        assert_eq!(scored[1].decision, Decision::Shortlisted);
    }
}
