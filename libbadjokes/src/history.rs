//! Reading the bot's own recent posts
//!
//! Everything here is rebuilt from the platform on each call.

use chrono::{DateTime, Utc};

use crate::config::Settings;
use crate::error::{BotError, Result};
use crate::twitter::{ClientFactory, TimelineQuery, Tweet};

/// Short-link suffixes found in the account's recent posts, sorted
///
/// An empty result means there is nothing recent to avoid.
pub async fn get_recent(factory: &dyn ClientFactory, settings: &Settings) -> Result<Vec<String>> {
    let client = factory.connect().await?;
    let query = TimelineQuery::recent(&settings.screen_name, settings.history_count);
    let tweets = client.user_timeline(&query).await?;

    tracing::trace!(count = tweets.len(), "timeline response");

    let handles = extract_short_link_ids(&tweets, &settings.short_link_prefix);
    tracing::debug!(handles = ?handles, "recently tweeted jokes");

    Ok(handles)
}

/// Creation time of the account's most recent post
///
/// # Errors
///
/// Returns [`BotError::EmptyTimeline`] when the timeline has no posts.
pub async fn get_last_timestamp(
    factory: &dyn ClientFactory,
    settings: &Settings,
) -> Result<DateTime<Utc>> {
    let client = factory.connect().await?;
    let query = TimelineQuery::recent(&settings.screen_name, settings.timestamp_count);
    let tweets = client.user_timeline(&query).await?;

    let Some(latest) = tweets.first() else {
        tracing::error!(screen_name = %settings.screen_name, "Unable to get most recent tweet");
        return Err(BotError::EmptyTimeline);
    };

    tracing::debug!(id = %latest.id_str, created_at = %latest.created_at, "most recent tweet");

    latest.created_at_utc()
}

/// Collect the suffix of every link whose display form starts with `prefix`
pub fn extract_short_link_ids(tweets: &[Tweet], prefix: &str) -> Vec<String> {
    let mut handles: Vec<String> = Vec::new();

    for tweet in tweets {
        tracing::trace!(
            created = %tweet.created_at,
            urls = ?tweet.display_urls().collect::<Vec<_>>(),
            "historical tweet"
        );

        handles.extend(
            tweet
                .display_urls()
                .filter_map(|url| url.strip_prefix(prefix))
                .map(str::to_string),
        );
    }

    handles.sort();
    handles
}
