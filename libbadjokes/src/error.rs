//! Error types for the bad jokes bot

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BotError>;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("No tweets in timeline")]
    EmptyTimeline,

    #[error("No unused jokes after {attempts} attempts")]
    Exhausted { attempts: usize },

    #[error("Invalid timestamp: {0}")]
    Timestamp(String),
}

impl BotError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            BotError::Config(_) => 3,
            BotError::Transport(TransportError::Authentication(_)) => 2,
            BotError::Transport(_) => 1,
            BotError::EmptyTimeline => 1,
            BotError::Exhausted { .. } => 1,
            BotError::Timestamp(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("you must set {0}")]
    MissingCredential(String),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Failures reported by the platform API or the joke catalog
///
/// These are surfaced unchanged to the caller. Nothing in the crate retries them.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    Decode(String),
}
