//! Platform client abstraction
//!
//! [`TwitterApi`] covers the three endpoints the bot touches. A
//! [`ClientFactory`] hands out a freshly verified client for each operation;
//! nothing is cached between operations.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use libbadjokes::config::{Credentials, Settings};
//! use libbadjokes::twitter::{ClientFactory, HttpClientFactory, TimelineQuery};
//!
//! # async fn example() -> libbadjokes::Result<()> {
//! let settings = Settings::default();
//! let factory = HttpClientFactory::new(Arc::new(Credentials::from_env()), settings.clone());
//!
//! let client = factory.connect().await?;
//! let tweets = client
//!     .user_timeline(&TimelineQuery::recent(&settings.screen_name, 5))
//!     .await?;
//! println!("{} recent tweets", tweets.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Credentials, Settings};
use crate::error::Result;

pub mod client;
pub mod oauth;
pub mod types;

pub use client::TwitterClient;
pub use types::{StatusUpdate, TimelineQuery, Tweet};

/// The platform endpoints the bot relies on
#[async_trait]
pub trait TwitterApi: Send + Sync {
    /// `GET account/verify_credentials`
    ///
    /// Returns the raw account payload; callers only log it.
    async fn verify_credentials(&self) -> Result<serde_json::Value>;

    /// `GET statuses/user_timeline`, newest first
    async fn user_timeline(&self, query: &TimelineQuery) -> Result<Vec<Tweet>>;

    /// `POST statuses/update`
    async fn update_status(&self, update: &StatusUpdate) -> Result<Tweet>;
}

/// Builds authenticated clients
///
/// Implementations must verify credentials once per `connect` and fail if
/// the verification call fails.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn TwitterApi>>;
}

/// Factory producing [`TwitterClient`]s over HTTPS
pub struct HttpClientFactory {
    credentials: Arc<Credentials>,
    settings: Settings,
}

impl HttpClientFactory {
    pub fn new(credentials: Arc<Credentials>, settings: Settings) -> Self {
        Self {
            credentials,
            settings,
        }
    }
}

#[async_trait]
impl ClientFactory for HttpClientFactory {
    async fn connect(&self) -> Result<Box<dyn TwitterApi>> {
        let client = TwitterClient::new(Arc::clone(&self.credentials), &self.settings)?;

        let user = client.verify_credentials().await?;
        tracing::debug!(api_response = %user, "verify_credentials result");

        Ok(Box::new(client))
    }
}
