//! Wire types for the Twitter v1.1 endpoints the bot uses
//!
//! Only the fields the bot reads are modelled; everything else in the
//! payload is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};

/// `created_at` layout after the leading weekday, e.g. `Jan 02 15:04:05 +0000 2024`
///
/// The weekday name is skipped rather than cross-checked against the date.
pub const CREATED_AT_FORMAT: &str = "%b %d %H:%M:%S %z %Y";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    #[serde(default)]
    pub id_str: String,
    #[serde(default)]
    pub created_at: String,
    /// Present when requested with `tweet_mode=extended`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Entities,
}

impl Tweet {
    pub fn body(&self) -> &str {
        self.full_text
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or("")
    }

    pub fn display_urls(&self) -> impl Iterator<Item = &str> {
        self.entities.urls.iter().map(|u| u.display_url.as_str())
    }

    /// Parse `created_at` into UTC
    pub fn created_at_utc(&self) -> Result<DateTime<Utc>> {
        parse_created_at(&self.created_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlEntity {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub display_url: String,
    #[serde(default)]
    pub expanded_url: String,
}

/// Parameters for `statuses/user_timeline`
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineQuery {
    pub count: u32,
    pub exclude_replies: bool,
    pub screen_name: String,
    pub trim_user: bool,
    pub tweet_mode: String,
}

impl TimelineQuery {
    /// Non-reply posts in extended mode with trimmed author data
    pub fn recent(screen_name: &str, count: u32) -> Self {
        Self {
            count,
            exclude_replies: true,
            screen_name: screen_name.to_string(),
            trim_user: true,
            tweet_mode: "extended".to_string(),
        }
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        vec![
            ("count".to_string(), self.count.to_string()),
            ("exclude_replies".to_string(), self.exclude_replies.to_string()),
            ("screen_name".to_string(), self.screen_name.clone()),
            ("trim_user".to_string(), self.trim_user.to_string()),
            ("tweet_mode".to_string(), self.tweet_mode.clone()),
        ]
    }
}

/// Body of `statuses/update`
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: String,
    pub source: String,
    pub trim_user: bool,
}

impl StatusUpdate {
    pub fn to_params(&self) -> Vec<(String, String)> {
        vec![
            ("status".to_string(), self.status.clone()),
            ("source".to_string(), self.source.clone()),
            ("trim_user".to_string(), self.trim_user.to_string()),
        ]
    }
}

pub fn parse_created_at(value: &str) -> Result<DateTime<Utc>> {
    let (_weekday, rest) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| BotError::Timestamp(format!("'{}': missing weekday", value)))?;

    DateTime::parse_from_str(rest, CREATED_AT_FORMAT)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| BotError::Timestamp(format!("'{}': {}", value, e)))
}
