//! In-memory doubles for the platform and the joke catalog
//!
//! Available in all builds so integration tests and the CLI tests can drive
//! the bot without credentials or network access. Call counters are shared
//! through `Arc<Mutex<..>>`, so clones observe the same counts.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::catalog::{Joke, JokeSource};
use crate::error::{Result, TransportError};
use crate::twitter::{ClientFactory, StatusUpdate, TimelineQuery, Tweet, TwitterApi};

/// Behavior and recorded calls of a [`MockTwitter`]
#[derive(Debug, Clone)]
pub struct MockTwitterConfig {
    /// Posts returned by `user_timeline`, newest first
    pub timeline: Vec<Tweet>,

    /// Error to return from `verify_credentials`
    pub verify_error: Option<String>,

    /// Error to return from `update_status`
    pub post_error: Option<String>,

    pub verify_call_count: Arc<Mutex<usize>>,

    /// Every timeline query received
    pub timeline_queries: Arc<Mutex<Vec<TimelineQuery>>>,

    /// Every status update received
    pub posted: Arc<Mutex<Vec<StatusUpdate>>>,
}

impl Default for MockTwitterConfig {
    fn default() -> Self {
        Self {
            timeline: Vec::new(),
            verify_error: None,
            post_error: None,
            verify_call_count: Arc::new(Mutex::new(0)),
            timeline_queries: Arc::new(Mutex::new(Vec::new())),
            posted: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockTwitter {
    config: MockTwitterConfig,
}

impl MockTwitter {
    pub fn new(config: MockTwitterConfig) -> Self {
        Self { config }
    }

    /// A client whose timeline holds `timeline`
    pub fn with_timeline(timeline: Vec<Tweet>) -> Self {
        Self::new(MockTwitterConfig {
            timeline,
            ..Default::default()
        })
    }

    /// A client whose credential check fails
    pub fn auth_failure(error: &str) -> Self {
        Self::new(MockTwitterConfig {
            verify_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    /// A client whose status updates fail
    pub fn post_failure(error: &str) -> Self {
        Self::new(MockTwitterConfig {
            post_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    pub fn verify_call_count(&self) -> usize {
        *lock(&self.config.verify_call_count)
    }

    pub fn timeline_queries(&self) -> Vec<TimelineQuery> {
        lock(&self.config.timeline_queries).clone()
    }

    pub fn posted(&self) -> Vec<StatusUpdate> {
        lock(&self.config.posted).clone()
    }
}

#[async_trait]
impl TwitterApi for MockTwitter {
    async fn verify_credentials(&self) -> Result<serde_json::Value> {
        *lock(&self.config.verify_call_count) += 1;

        match &self.config.verify_error {
            Some(error) => Err(TransportError::Authentication(error.clone()).into()),
            None => Ok(serde_json::json!({ "id_str": "1", "screen_name": "mock" })),
        }
    }

    async fn user_timeline(&self, query: &TimelineQuery) -> Result<Vec<Tweet>> {
        lock(&self.config.timeline_queries).push(query.clone());

        let count = query.count as usize;
        Ok(self.config.timeline.iter().take(count).cloned().collect())
    }

    async fn update_status(&self, update: &StatusUpdate) -> Result<Tweet> {
        if let Some(error) = &self.config.post_error {
            return Err(TransportError::Api {
                status: 403,
                message: error.clone(),
            }
            .into());
        }

        let mut posted = lock(&self.config.posted);
        posted.push(update.clone());

        Ok(Tweet {
            id_str: format!("{}", 1000 + posted.len()),
            created_at: "Mon Jan 02 15:04:05 +0000 2024".to_string(),
            full_text: Some(update.status.clone()),
            ..Default::default()
        })
    }
}

/// Factory handing out clones of one [`MockTwitter`]
///
/// Verifies credentials on every `connect`, like the real factory.
#[derive(Debug, Clone, Default)]
pub struct MockClientFactory {
    client: MockTwitter,
    connect_call_count: Arc<Mutex<usize>>,
}

impl MockClientFactory {
    pub fn new(client: MockTwitter) -> Self {
        Self {
            client,
            connect_call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn connect_call_count(&self) -> usize {
        *lock(&self.connect_call_count)
    }

    /// The shared client, for inspecting recorded calls
    pub fn client(&self) -> &MockTwitter {
        &self.client
    }
}

#[async_trait]
impl ClientFactory for MockClientFactory {
    async fn connect(&self) -> Result<Box<dyn TwitterApi>> {
        *lock(&self.connect_call_count) += 1;

        let client = self.client.clone();
        client.verify_credentials().await?;
        Ok(Box::new(client))
    }
}

/// Catalog source returning a fixed list
#[derive(Debug, Clone, Default)]
pub struct StaticJokeSource {
    jokes: Vec<Joke>,
    error: Option<String>,
    fetch_call_count: Arc<Mutex<usize>>,
}

impl StaticJokeSource {
    pub fn new(jokes: Vec<Joke>) -> Self {
        Self {
            jokes,
            ..Default::default()
        }
    }

    /// A source whose every fetch fails
    pub fn failing(error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Default::default()
        }
    }

    pub fn fetch_count(&self) -> usize {
        *lock(&self.fetch_call_count)
    }
}

#[async_trait]
impl JokeSource for StaticJokeSource {
    async fn fetch(&self) -> Result<Vec<Joke>> {
        *lock(&self.fetch_call_count) += 1;

        match &self.error {
            Some(error) => Err(TransportError::Network(error.clone()).into()),
            None => Ok(self.jokes.clone()),
        }
    }
}

/// Lock a mock counter, recovering from poisoning left by a failed test
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_factory_verifies_each_connect() {
        let factory = MockClientFactory::new(MockTwitter::default());

        factory.connect().await.unwrap();
        factory.connect().await.unwrap();

        assert_eq!(factory.connect_call_count(), 2);
        assert_eq!(factory.client().verify_call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_factory_auth_failure() {
        let factory = MockClientFactory::new(MockTwitter::auth_failure("Invalid or expired token"));

        let err = factory.connect().await.err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_mock_timeline_respects_count() {
        let timeline = vec![Tweet::default(), Tweet::default(), Tweet::default()];
        let client = MockTwitter::with_timeline(timeline);

        let tweets = client
            .user_timeline(&TimelineQuery::recent("someone", 2))
            .await
            .unwrap();

        assert_eq!(tweets.len(), 2);
        assert_eq!(client.timeline_queries().len(), 1);
    }

    #[tokio::test]
    async fn test_static_source_counts_fetches() {
        let source = StaticJokeSource::new(vec![]);
        source.fetch().await.unwrap();
        source.clone().fetch().await.unwrap();
        assert_eq!(source.fetch_count(), 2);
    }
}
