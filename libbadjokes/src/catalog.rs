//! Joke catalog served by the content site

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::Result;
use crate::transport::{build_http_client, map_reqwest_error, read_json};

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    /// The text that gets posted
    pub joke: String,
    /// Catalog identifier, also the short-link suffix
    pub id: String,
}

/// Shape of the catalog document
#[derive(Debug, Clone, Deserialize)]
pub struct JokeCatalog {
    pub jokes: Vec<Joke>,
}

/// Source of the full joke list
#[async_trait]
pub trait JokeSource: Send + Sync {
    /// Fetch the whole catalog, in catalog order
    async fn fetch(&self) -> Result<Vec<Joke>>;
}

/// Fetches the catalog over HTTP on every call
pub struct HttpJokeSource {
    http: reqwest::Client,
    url: String,
}

impl HttpJokeSource {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            http: build_http_client(settings)?,
            url: settings.catalog_url.clone(),
        })
    }
}

#[async_trait]
impl JokeSource for HttpJokeSource {
    async fn fetch(&self) -> Result<Vec<Joke>> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, "fetch jokes"))?;

        let catalog: JokeCatalog = read_json(response, "fetch jokes").await?;
        tracing::debug!(url = %self.url, count = catalog.jokes.len(), "joke response");

        let (jokes, empty): (Vec<Joke>, Vec<Joke>) =
            catalog.jokes.into_iter().partition(|j| !j.joke.is_empty());
        if !empty.is_empty() {
            let ids: Vec<&str> = empty.iter().map(|j| j.id.as_str()).collect();
            tracing::warn!(ids = ?ids, "skipping catalog entries with empty text");
        }

        Ok(jokes)
    }
}
