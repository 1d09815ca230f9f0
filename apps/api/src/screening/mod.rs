// Screening: fit scoring, decision tags and the filter controls of the
// screening view. Scoring and filtering are pure; only `service` does I/O.

pub mod filter;
pub mod handlers;
pub mod scoring;
pub mod service;
