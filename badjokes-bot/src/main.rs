//! badjokes-bot - post a joke that has not been posted recently

use clap::{Parser, Subcommand};
use libbadjokes::logging::{LogFormat, LoggingConfig};
use libbadjokes::{Credentials, JokeBot, Result, Settings};

#[derive(Parser, Debug)]
#[command(name = "badjokes-bot")]
#[command(version, about = "Post a joke that has not been posted recently")]
#[command(long_about = r#"Post a joke that has not been posted recently.

Credentials are read from the environment:
    TWITTER_CONSUMER_KEY, TWITTER_CONSUMER_SECRET,
    TWITTER_ACCESS_TOKEN, TWITTER_ACCESS_SECRET

Settings are read from $BADJOKES_CONFIG, or ~/.config/badjokes/config.toml
when present.

EXIT CODES:
    0 - Success
    1 - Platform, catalog or selection error
    2 - Authentication error
    3 - Configuration error
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log format (text, json or pretty)
    #[arg(long, default_value = "text", env = "BADJOKES_LOG_FORMAT")]
    log_format: LogFormat,

    /// Minimum log level when not verbose
    #[arg(long, default_value = "info", env = "BADJOKES_LOG_LEVEL")]
    log_level: String,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text")]
    #[arg(value_parser = ["text", "json"])]
    format: String,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Pick an unused joke and post it (default)
    Post,
    /// Pick an unused joke and print it without posting
    Pick,
    /// Print the joke ids linked from recent posts
    Recent,
    /// Print the time of the most recent post
    Last,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::new(cli.log_format, cli.log_level.clone(), cli.verbose).init();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "run failed");
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load()?;
    let bot = JokeBot::from_settings(settings, Credentials::from_env())?;
    let json = cli.format == "json";

    match cli.command.unwrap_or(Command::Post) {
        Command::Post => {
            let posted = bot.run_once().await?;
            if json {
                print_json(&serde_json::json!({
                    "tweet_id": posted.tweet.id_str,
                    "joke_id": posted.joke.id,
                    "joke": posted.joke.joke,
                }));
            } else {
                println!("{}\t{}", posted.tweet.id_str, posted.joke.joke);
            }
        }
        Command::Pick => {
            let joke = bot.pick().await?;
            if json {
                print_json(&serde_json::json!(joke));
            } else {
                println!("{}\t{}", joke.id, joke.joke);
            }
        }
        Command::Recent => {
            let recent = bot.get_recent().await?;
            if json {
                print_json(&serde_json::json!(recent));
            } else {
                for id in recent {
                    println!("{}", id);
                }
            }
        }
        Command::Last => {
            let timestamp = bot.get_last_timestamp().await?;
            if json {
                print_json(&serde_json::json!({ "created_at": timestamp.to_rfc3339() }));
            } else {
                println!("{}", timestamp.to_rfc3339());
            }
        }
    }

    Ok(())
}

fn print_json(value: &serde_json::Value) {
    println!("{}", value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_post() {
        let cli = Cli::try_parse_from(["badjokes-bot"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.format, "text");
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_subcommands() {
        let cli = Cli::try_parse_from(["badjokes-bot", "--format", "json", "recent"]).unwrap();
        assert_eq!(cli.command, Some(Command::Recent));
        assert_eq!(cli.format, "json");

        let cli = Cli::try_parse_from(["badjokes-bot", "-v", "last"]).unwrap();
        assert_eq!(cli.command, Some(Command::Last));
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["badjokes-bot", "--format", "csv"]).is_err());
    }

    #[test]
    fn test_cli_log_format_parses() {
        let cli = Cli::try_parse_from(["badjokes-bot", "--log-format", "json"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
