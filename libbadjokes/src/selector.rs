//! Picking a joke that has not been posted recently

use rand::Rng;

use crate::catalog::{Joke, JokeSource};
use crate::config::{MatchField, Settings};
use crate::error::{BotError, Result};

/// Draw a random catalog entry not present in `recent`
///
/// The catalog is re-fetched on every attempt. After `settings.max_attempts`
/// misses the call fails with [`BotError::Exhausted`]. An empty catalog
/// counts as a miss.
pub async fn find_random_not_recent<R>(
    source: &dyn JokeSource,
    recent: &[String],
    settings: &Settings,
    rng: &mut R,
) -> Result<Joke>
where
    R: Rng + Send,
{
    for attempt in 1..=settings.max_attempts {
        let jokes = source.fetch().await?;

        let Some(index) = random_index(jokes.len(), rng) else {
            tracing::warn!(attempt, "joke catalog is empty");
            continue;
        };

        let candidate = &jokes[index];
        if !is_recent(candidate, recent, settings.match_on) {
            tracing::debug!(attempt, id = %candidate.id, "picked joke");
            return Ok(candidate.clone());
        }

        tracing::info!(recent = ?recent, joke = %candidate.joke, "guessed a recent joke");
    }

    Err(BotError::Exhausted {
        attempts: settings.max_attempts,
    })
}

/// Uniform index in `[0, len)`, or `None` for an empty list
pub(crate) fn random_index<R: Rng>(len: usize, rng: &mut R) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.gen_range(0..len))
    }
}

fn is_recent(joke: &Joke, recent: &[String], field: MatchField) -> bool {
    let key = match field {
        MatchField::Text => &joke.joke,
        MatchField::Id => &joke.id,
    };
    recent.iter().any(|r| r == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::StaticJokeSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn joke(text: &str, id: &str) -> Joke {
        Joke {
            joke: text.to_string(),
            id: id.to_string(),
        }
    }

    #[test]
    fn test_random_index_stays_inside_catalog() {
        // The historical bot drew from [0, len], which could land one past
        // the end. Indices here must always be valid.
        let mut rng = StdRng::seed_from_u64(7);
        for len in 1..20 {
            for _ in 0..200 {
                let index = random_index(len, &mut rng).unwrap();
                assert!(index < len, "index {} out of range for {}", index, len);
            }
        }
    }

    #[test]
    fn test_random_index_empty() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(random_index(0, &mut rng), None);
    }

    #[test]
    fn test_random_index_reaches_every_entry() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; 5];
        for _ in 0..500 {
            seen[random_index(5, &mut rng).unwrap()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_is_recent_compares_selected_field() {
        let j = joke("Knock knock", "knock");
        let recent = vec!["knock".to_string()];

        assert!(!is_recent(&j, &recent, MatchField::Text));
        assert!(is_recent(&j, &recent, MatchField::Id));
        assert!(is_recent(&j, &["Knock knock".to_string()], MatchField::Text));
    }

    #[tokio::test]
    async fn test_returns_joke_absent_from_history() {
        let source = StaticJokeSource::new(vec![
            joke("old one", "a"),
            joke("fresh one", "b"),
            joke("older one", "c"),
        ]);
        let recent = vec!["old one".to_string(), "older one".to_string()];
        let mut rng = StdRng::seed_from_u64(42);

        let picked = find_random_not_recent(&source, &recent, &Settings::default(), &mut rng)
            .await
            .unwrap();

        assert_eq!(picked, joke("fresh one", "b"));
        assert!(source.fetch_count() <= 100);
    }

    #[tokio::test]
    async fn test_empty_history_takes_first_draw() {
        let source = StaticJokeSource::new(vec![joke("one", "1"), joke("two", "2")]);
        let mut rng = StdRng::seed_from_u64(1);

        find_random_not_recent(&source, &[], &Settings::default(), &mut rng)
            .await
            .unwrap();

        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_exhausts_after_max_attempts() {
        let source = StaticJokeSource::new(vec![joke("one", "1"), joke("two", "2")]);
        let recent = vec!["one".to_string(), "two".to_string()];
        let mut rng = StdRng::seed_from_u64(3);

        let err = find_random_not_recent(&source, &recent, &Settings::default(), &mut rng)
            .await
            .unwrap_err();

        assert!(matches!(err, BotError::Exhausted { attempts: 100 }));
        assert_eq!(source.fetch_count(), 100);
    }

    #[tokio::test]
    async fn test_empty_catalog_exhausts() {
        let source = StaticJokeSource::new(vec![]);
        let settings = Settings {
            max_attempts: 5,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);

        let err = find_random_not_recent(&source, &[], &settings, &mut rng)
            .await
            .unwrap_err();

        assert!(matches!(err, BotError::Exhausted { attempts: 5 }));
        assert_eq!(source.fetch_count(), 5);
    }

    #[tokio::test]
    async fn test_match_on_id() {
        let source = StaticJokeSource::new(vec![joke("same text", "used"), joke("same text", "new")]);
        let settings = Settings {
            match_on: MatchField::Id,
            ..Default::default()
        };
        let recent = vec!["used".to_string()];
        let mut rng = StdRng::seed_from_u64(9);

        let picked = find_random_not_recent(&source, &recent, &settings, &mut rng)
            .await
            .unwrap();

        assert_eq!(picked.id, "new");
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let source = StaticJokeSource::failing("catalog offline");
        let mut rng = StdRng::seed_from_u64(3);

        let err = find_random_not_recent(&source, &[], &Settings::default(), &mut rng)
            .await
            .unwrap_err();

        assert!(matches!(err, BotError::Transport(_)));
        assert_eq!(source.fetch_count(), 1);
    }
}
