pub mod candidate;

pub use candidate::{Candidate, Decision, ScoredCandidate};
