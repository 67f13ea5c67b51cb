//! badjokes - a bot that posts one not-recently-used joke at a time
//!
//! The bot reads its own recent posts, collects the joke ids linked from
//! them, draws a joke from the catalog that is not among them and posts it.

pub mod bot;
pub mod catalog;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod publisher;
pub mod selector;
pub mod transport;
pub mod twitter;

// Mock doubles are available for all builds (not just tests) to support integration tests
pub mod mock;

// Re-export commonly used types
pub use bot::{JokeBot, Posted};
pub use catalog::{Joke, JokeSource};
pub use config::{Credentials, MatchField, Settings};
pub use error::{BotError, ConfigError, Result, TransportError};
pub use twitter::{ClientFactory, TwitterApi};
