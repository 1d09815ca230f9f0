use std::str::FromStr;

use anyhow::{Context, Result};

use crate::cache::DEFAULT_TTL_SECS;
use crate::screening::scoring::ScoringWeights;

const DEFAULT_TALENT_SOURCE_URL: &str = "http://localhost:5678/webhook";

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub talent_source_url: String,
    /// Takes precedence over `cache_dir` when both are set.
    pub redis_url: Option<String>,
    pub cache_dir: Option<String>,
    pub cache_ttl_secs: i64,
    pub scoring: ScoringWeights,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let cache_ttl_secs = optional_env("CACHE_TTL_SECS")?.unwrap_or(DEFAULT_TTL_SECS);
        if cache_ttl_secs <= 0 {
            anyhow::bail!("CACHE_TTL_SECS must be positive, got {cache_ttl_secs}");
        }

        Ok(Config {
            talent_source_url: std::env::var("TALENT_SOURCE_URL")
                .unwrap_or_else(|_| DEFAULT_TALENT_SOURCE_URL.to_string()),
            redis_url: non_empty_env("REDIS_URL"),
            cache_dir: non_empty_env("CACHE_DIR"),
            cache_ttl_secs,
            scoring: scoring_from_env()?,
            port: optional_env("PORT")?.unwrap_or(8080),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Defaults with any `SCORE_*` overrides applied.
fn scoring_from_env() -> Result<ScoringWeights> {
    let mut weights = ScoringWeights::default();
    let overrides: [(&str, &mut f64); 6] = [
        ("SCORE_BASE", &mut weights.base),
        ("SCORE_PER_SKILL", &mut weights.per_skill),
        ("SCORE_SKILL_CAP", &mut weights.skill_cap),
        ("SCORE_PROFILE_BONUS", &mut weights.profile_bonus),
        ("SCORE_SUMMARY_BONUS", &mut weights.summary_bonus),
        ("SCORE_ACTIVE_BONUS", &mut weights.active_bonus),
    ];
    for (key, slot) in overrides {
        if let Some(value) = optional_env::<f64>(key)? {
            *slot = value;
        }
    }
    Ok(weights)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn optional_env<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(None),
    }
}
