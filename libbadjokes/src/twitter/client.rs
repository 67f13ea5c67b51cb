//! HTTP implementation of [`TwitterApi`] against the v1.1 REST endpoints

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::{Credentials, Settings};
use crate::error::Result;
use crate::transport::{build_http_client, map_reqwest_error, read_json};
use crate::twitter::oauth::authorization_header;
use crate::twitter::types::{StatusUpdate, TimelineQuery, Tweet};
use crate::twitter::TwitterApi;

pub struct TwitterClient {
    http: reqwest::Client,
    api_base: String,
    credentials: Arc<Credentials>,
}

impl TwitterClient {
    pub fn new(credentials: Arc<Credentials>, settings: &Settings) -> Result<Self> {
        Ok(Self {
            http: build_http_client(settings)?,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/1.1/{}.json", self.api_base, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
        context: &str,
    ) -> Result<T> {
        let url = self.endpoint(path);
        let auth = authorization_header(&self.credentials, "GET", &url, params);

        tracing::trace!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .query(params)
            .header(reqwest::header::AUTHORIZATION, auth)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, context))?;

        read_json(response, context).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
        context: &str,
    ) -> Result<T> {
        let url = self.endpoint(path);
        let auth = authorization_header(&self.credentials, "POST", &url, params);

        tracing::trace!(%url, "POST");
        let response = self
            .http
            .post(&url)
            .form(params)
            .header(reqwest::header::AUTHORIZATION, auth)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, context))?;

        read_json(response, context).await
    }
}

#[async_trait]
impl TwitterApi for TwitterClient {
    async fn verify_credentials(&self) -> Result<serde_json::Value> {
        self.get("account/verify_credentials", &[], "verify credentials")
            .await
    }

    async fn user_timeline(&self, query: &TimelineQuery) -> Result<Vec<Tweet>> {
        self.get("statuses/user_timeline", &query.to_params(), "user timeline")
            .await
    }

    async fn update_status(&self, update: &StatusUpdate) -> Result<Tweet> {
        self.post("statuses/update", &update.to_params(), "post status")
            .await
    }
}
