use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::card::CardColor;

/// Asks the acting player which color a wild card should take.
#[async_trait]
pub trait ColorPrompt: Send + Sync {
    /// `None` when the player dismissed the prompt.
    async fn choose_color(&self) -> Option<CardColor>;
}

/// Waits at most `limit` for a choice. Running out of time counts as no
/// choice and drops the pending prompt.
pub async fn choose_within<P>(prompt: &P, limit: Duration) -> Option<CardColor>
where
    P: ColorPrompt + ?Sized,
{
    match tokio::time::timeout(limit, prompt.choose_color()).await {
        Ok(choice) => choice,
        Err(_) => {
            debug!(?limit, "Color prompt timed out");
            None
        }
    }
}
