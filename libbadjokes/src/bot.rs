//! `JokeBot` ties the operations together
//!
//! Owns the client factory, the joke source, the settings and the
//! credentials for one process run.
//!
//! # Example
//!
//! ```no_run
//! use libbadjokes::{Credentials, JokeBot, Settings};
//!
//! # async fn example() -> libbadjokes::Result<()> {
//! let bot = JokeBot::from_settings(Settings::load()?, Credentials::from_env())?;
//! let posted = bot.run_once().await?;
//! println!("posted {}", posted.tweet.id_str);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::catalog::{HttpJokeSource, Joke, JokeSource};
use crate::config::{Credentials, Settings};
use crate::error::Result;
use crate::twitter::{ClientFactory, HttpClientFactory, Tweet};
use crate::{history, publisher, selector};

/// Outcome of a full run
#[derive(Debug, Clone)]
pub struct Posted {
    pub joke: Joke,
    pub tweet: Tweet,
}

pub struct JokeBot {
    factory: Arc<dyn ClientFactory>,
    source: Arc<dyn JokeSource>,
    settings: Settings,
    credentials: Arc<Credentials>,
}

impl JokeBot {
    pub fn new(
        factory: Arc<dyn ClientFactory>,
        source: Arc<dyn JokeSource>,
        settings: Settings,
        credentials: Arc<Credentials>,
    ) -> Self {
        Self {
            factory,
            source,
            settings,
            credentials,
        }
    }

    /// Wire the HTTP-backed platform client and catalog
    pub fn from_settings(settings: Settings, credentials: Credentials) -> Result<Self> {
        settings.validate()?;

        let credentials = Arc::new(credentials);
        let factory = HttpClientFactory::new(Arc::clone(&credentials), settings.clone());
        let source = HttpJokeSource::new(&settings)?;

        Ok(Self::new(
            Arc::new(factory),
            Arc::new(source),
            settings,
            credentials,
        ))
    }

    /// Identifiers linked from the account's recent posts
    pub async fn get_recent(&self) -> Result<Vec<String>> {
        history::get_recent(self.factory.as_ref(), &self.settings).await
    }

    /// Creation time of the account's latest post
    pub async fn get_last_timestamp(&self) -> Result<DateTime<Utc>> {
        history::get_last_timestamp(self.factory.as_ref(), &self.settings).await
    }

    /// Pick a catalog joke not in `recent`
    pub async fn find_random_not_recent(&self, recent: &[String]) -> Result<Joke> {
        let mut rng = StdRng::from_entropy();
        selector::find_random_not_recent(self.source.as_ref(), recent, &self.settings, &mut rng)
            .await
    }

    /// Post `joke`
    pub async fn tweet(&self, joke: &Joke) -> Result<Tweet> {
        publisher::tweet(
            self.factory.as_ref(),
            &self.credentials,
            &self.settings,
            joke,
        )
        .await
    }

    /// Read history and select a joke without posting it
    pub async fn pick(&self) -> Result<Joke> {
        let recent = self.get_recent().await?;
        self.find_random_not_recent(&recent).await
    }

    /// Read history, select a joke and post it
    ///
    /// Consumer credentials are checked first so a misconfigured run makes
    /// no network calls at all.
    pub async fn run_once(&self) -> Result<Posted> {
        self.credentials.require_consumer()?;

        let joke = self.pick().await?;
        tracing::info!(id = %joke.id, "posting joke");

        let tweet = self.tweet(&joke).await?;
        tracing::info!(tweet_id = %tweet.id_str, "posted joke");

        Ok(Posted { joke, tweet })
    }
}
