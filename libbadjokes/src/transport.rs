//! Shared HTTP plumbing for the platform client and the joke catalog

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::Settings;
use crate::error::{Result, TransportError};

/// Build the HTTP client used for every outbound call
///
/// Requests time out after `settings.timeout_secs`. Certificate validation
/// stays on.
pub fn build_http_client(settings: &Settings) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(settings.timeout())
        .danger_accept_invalid_certs(false)
        .user_agent(concat!("badjokes-bot/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            TransportError::Network(format!("Failed to build HTTP client: {}", e)).into()
        })
}

/// Map a reqwest failure to a transport error, keeping the operation name
pub(crate) fn map_reqwest_error(error: reqwest::Error, context: &str) -> TransportError {
    if error.is_timeout() {
        return TransportError::Network(format!("{} timed out: {}", context, error));
    }
    if error.is_decode() {
        return TransportError::Decode(format!("{}: {}", context, error));
    }
    if let Some(status) = error.status() {
        return status_error(status.as_u16(), &error.to_string(), context);
    }
    TransportError::Network(format!("{} failed: {}", context, error))
}

/// Classify a non-success HTTP status
pub(crate) fn status_error(status: u16, message: &str, context: &str) -> TransportError {
    match status {
        401 | 403 => TransportError::Authentication(format!("{}: {}", context, message)),
        429 => TransportError::RateLimit(format!("{}: {}", context, message)),
        _ => TransportError::Api {
            status,
            message: format!("{}: {}", context, message),
        },
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrors {
    errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEntry {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

/// Pull a readable message out of an error body
///
/// Understands the platform's `{"errors": [{"code", "message"}]}` envelope
/// and falls back to the raw body.
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrors>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed
            .errors
            .iter()
            .map(|e| match e.code {
                Some(code) => format!("{} (code {})", e.message, code),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        _ => {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_string()
            } else {
                trimmed.to_string()
            }
        }
    }
}

/// Check the status and decode a JSON body
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| map_reqwest_error(e, context))?;

    if !status.is_success() {
        return Err(status_error(status.as_u16(), &error_message(&body), context).into());
    }

    serde_json::from_str(&body)
        .map_err(|e| TransportError::Decode(format!("{}: {}", context, e)).into())
}
