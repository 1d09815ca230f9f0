use anyhow::Context;
use tracing::info;

use crate::errors::AppError;
use crate::models::Candidate;
use crate::state::AppState;

pub fn cache_key(campaign_id: &str) -> String {
    format!("candidates:{campaign_id}")
}

/// Returns the campaign's candidates, from cache when fresh.
///
/// `refresh` drops the cached entry first. A successful fetch replaces the
/// entry wholesale; upstream failures are not cached.
pub async fn load_candidates(
    state: &AppState,
    campaign_id: &str,
    refresh: bool,
) -> Result<Vec<Candidate>, AppError> {
    let key = cache_key(campaign_id);

    // Cache backends may block (file, Redis), so keep them off the runtime threads.
    let cache = state.cache.clone();
    let read_key = key.clone();
    let cached = tokio::task::spawn_blocking(move || {
        if refresh {
            cache.clear(&read_key);
            None
        } else {
            cache.read::<Candidate>(&read_key)
        }
    })
    .await
    .context("cache read task panicked")?;

    if let Some(candidates) = cached {
        return Ok(candidates);
    }

    let candidates = state.source.fetch_candidates(campaign_id).await?;
    info!(
        "Loaded {} candidates for campaign {} from talent source",
        candidates.len(),
        campaign_id
    );

    let cache = state.cache.clone();
    let to_store = candidates.clone();
    tokio::task::spawn_blocking(move || cache.write(&key, &to_store))
        .await
        .context("cache write task panicked")?;

    Ok(candidates)
}
