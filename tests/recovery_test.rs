use anyhow::Result;
use movie_night::core::documents::load_document;
use movie_night::domain::model::{CandidateDocument, PollDocument};
use movie_night::{BotConfig, Coordinator, LocalStorage, MovieNightError};
use tempfile::TempDir;

fn config_for(dir: &TempDir) -> Result<BotConfig> {
    let normalized_path = dir.path().to_string_lossy().replace('\\', "/");
    let config = BotConfig::from_toml_str(&format!(
        r#"
[bot]
name = "recovery-test"

[storage]
directory = "{}"
"#,
        normalized_path
    ))?;
    Ok(config)
}

async fn boot(dir: &TempDir) -> Result<Coordinator<LocalStorage, BotConfig>> {
    let config = config_for(dir)?;
    let storage = LocalStorage::new(config.storage.directory.clone());
    Ok(Coordinator::restore(storage, config).await?)
}

async fn say(
    coordinator: &mut Coordinator<LocalStorage, BotConfig>,
    author: &str,
    line: &str,
) -> String {
    coordinator
        .handle_line(author, line)
        .await
        .unwrap_or_default()
}

#[tokio::test]
async fn test_fresh_start_with_empty_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let coordinator = boot(&temp_dir).await?;

    assert!(coordinator.candidates().is_empty());
    assert!(!coordinator.poll().is_active());
    Ok(())
}

#[tokio::test]
async fn test_restart_mid_poll_resumes_exactly() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let mut first = boot(&temp_dir).await?;
    for title in ["Alien", "Heat", "Ran"] {
        say(&mut first, "host", &format!("!suggest {}", title)).await;
    }
    say(&mut first, "host", "!create 0 1 2").await;
    say(&mut first, "ann", "!vote 3").await;
    say(&mut first, "bob", "!vote 1").await;
    say(&mut first, "cat", "!vote 3").await;
    let before = first.poll().poll().clone();
    drop(first);

    let mut second = boot(&temp_dir).await?;

    assert_eq!(second.poll().poll(), &before);
    assert_eq!(second.candidates().len(), 3);

    // Votes keep working against the restored tally.
    say(&mut second, "bob", "!vote 3").await;
    let response = say(&mut second, "host", "!close").await;
    assert!(response.starts_with("The winner is Ran!"));
    Ok(())
}

#[tokio::test]
async fn test_close_removes_poll_document_and_winner() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = config_for(&temp_dir)?;

    let mut coordinator = boot(&temp_dir).await?;
    say(&mut coordinator, "host", "!suggest Alien").await;
    say(&mut coordinator, "host", "!suggest Heat").await;
    say(&mut coordinator, "host", "!create 0 1").await;
    say(&mut coordinator, "ann", "!vote 2").await;

    let storage = LocalStorage::new(temp_dir.path());
    let poll: Option<PollDocument> = load_document(&storage, &config.storage.poll_file).await?;
    assert_eq!(poll.map(|p| p.votes.len()), Some(1));

    say(&mut coordinator, "host", "!close").await;

    let poll: Option<PollDocument> = load_document(&storage, &config.storage.poll_file).await?;
    assert!(poll.is_none());
    let movies: Option<CandidateDocument> =
        load_document(&storage, &config.storage.movie_file).await?;
    let titles: Vec<String> = movies
        .unwrap_or_default()
        .into_iter()
        .map(|c| c.title)
        .collect();
    assert_eq!(titles, vec!["Alien".to_string()]);

    let restarted = boot(&temp_dir).await?;
    assert!(!restarted.poll().is_active());
    assert_eq!(restarted.candidates().lookup("Alien"), Some(0));
    Ok(())
}

#[tokio::test]
async fn test_corrupt_poll_document_fails_startup() -> Result<()> {
    let temp_dir = TempDir::new()?;
    tokio::fs::write(temp_dir.path().join("currentpoll.json"), "choices: [").await?;

    let result = boot(&temp_dir).await;

    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn test_inconsistent_poll_document_fails_startup() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let documents = [
        r#"{"choices":[]}"#,
        r#"{"choices":[{"title":"X","votes":0},{"title":"X","votes":0},{"title":"Y","votes":0}]}"#,
        r#"{"choices":[{"title":"X","votes":0}],"votes":{"a":"Gone","b":"X"}}"#,
    ];

    for document in documents {
        tokio::fs::write(temp_dir.path().join("currentpoll.json"), document).await?;

        let storage = LocalStorage::new(temp_dir.path());
        match Coordinator::restore(storage, config_for(&temp_dir)?).await {
            Err(MovieNightError::CorruptDocument { path, .. }) => {
                assert_eq!(path, "currentpoll.json")
            }
            Err(other) => panic!("unexpected error for {}: {}", document, other),
            Ok(_) => panic!("accepted {}", document),
        }
    }
    Ok(())
}
