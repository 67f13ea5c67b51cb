//! Posting a joke

use crate::catalog::Joke;
use crate::config::{Credentials, Settings};
use crate::error::Result;
use crate::twitter::{ClientFactory, StatusUpdate, Tweet};

/// Post `joke.joke` as a new status and wait for the platform to accept it
///
/// Both consumer credentials are checked before any client is built.
pub async fn tweet(
    factory: &dyn ClientFactory,
    credentials: &Credentials,
    settings: &Settings,
    joke: &Joke,
) -> Result<Tweet> {
    credentials.require_consumer()?;

    let client = factory.connect().await?;

    let update = StatusUpdate {
        status: joke.joke.clone(),
        source: settings.source.clone(),
        trim_user: true,
    };
    let posted = client.update_status(&update).await?;

    tracing::debug!(id = %posted.id_str, joke_id = %joke.id, "simple tweet response");

    Ok(posted)
}
