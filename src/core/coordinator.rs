use crate::core::candidates::{CandidateError, CandidateRepository};
use crate::core::command::{Command, HELP_TEXT};
use crate::core::countdown;
use crate::core::documents::{delete_document, load_document, save_document};
use crate::core::poll::PollEngine;
use crate::domain::model::{CandidateDocument, PollDocument};
use crate::domain::ports::{ConfigProvider, MetadataLookup, Storage};
use crate::utils::error::{MovieNightError, Result};
use std::collections::BTreeSet;

const EMPTY_LIST: &str = "There are currently no movies in the list. `!suggest` one!";

/// Translates chat commands into calls on the candidate list and the poll,
/// mirrors state to storage after each mutation, and renders replies.
///
/// Storage is a best-effort mirror: a failed write is reported in the reply
/// but the in-memory change stands.
pub struct Coordinator<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    candidates: CandidateRepository,
    poll: PollEngine,
    metadata: Option<Box<dyn MetadataLookup>>,
}

impl<S: Storage, C: ConfigProvider> Coordinator<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            candidates: CandidateRepository::new(),
            poll: PollEngine::new(),
            metadata: None,
        }
    }

    /// Rebuilds state from the documents in `storage`. A saved poll document
    /// means a poll was running when the process stopped, so it resumes
    /// active.
    pub async fn restore(storage: S, config: C) -> Result<Self> {
        let mut coordinator = Self::new(storage, config);

        match load_document::<_, CandidateDocument>(
            &coordinator.storage,
            coordinator.config.movie_document(),
        )
        .await?
        {
            Some(document) => {
                tracing::info!("Loading saved movie list ({} titles)", document.len());
                coordinator.candidates = CandidateRepository::from_document(document);
            }
            None => tracing::info!("Starting with an empty movie list"),
        }

        match load_document::<_, PollDocument>(
            &coordinator.storage,
            coordinator.config.poll_document(),
        )
        .await?
        {
            Some(document) => {
                tracing::info!("Restarting saved poll");
                tracing::debug!("Using poll data {:?}", document);
                coordinator.poll = PollEngine::from_document(document).map_err(|source| {
                    MovieNightError::CorruptDocument {
                        path: coordinator.config.poll_document().to_string(),
                        source,
                    }
                })?;
            }
            None => tracing::info!("Creating fresh poll"),
        }

        Ok(coordinator)
    }

    pub fn with_metadata(mut self, lookup: Box<dyn MetadataLookup>) -> Self {
        self.metadata = Some(lookup);
        self
    }

    pub fn candidates(&self) -> &CandidateRepository {
        &self.candidates
    }

    pub fn poll(&self) -> &PollEngine {
        &self.poll
    }

    /// Handles one line of chat. Lines without the command prefix get no
    /// reply.
    pub async fn handle_line(&mut self, author: &str, line: &str) -> Option<String> {
        let command = Command::parse(self.config.command_prefix(), line)?;
        Some(self.handle(author, command).await)
    }

    pub async fn handle(&mut self, author: &str, command: Command) -> String {
        tracing::debug!(author, "Handling {:?}", command);

        match command {
            Command::Suggest(title) => self.suggest(&title).await,
            Command::List => self.list(),
            Command::Remove(ids) => self.remove(&ids).await,
            Command::MovieInfo(ids) => self.movie_info(&ids).await,
            Command::Create(ids) => self.create(author, &ids).await,
            Command::Vote(choice) => self.vote(author, choice.as_deref()).await,
            Command::Status => self.poll.status(),
            Command::Close => self.close().await,
            Command::When => self.when(),
            Command::Help => self.help(),
            Command::Unknown(name) => {
                let prefix = self.config.command_prefix();
                format!(
                    "Unknown command `{}{}`. Try `{}help`.",
                    prefix, name, prefix
                )
            }
        }
    }

    async fn suggest(&mut self, title: &str) -> String {
        if title.trim().is_empty() {
            return format!("Usage: {}suggest <title>", self.config.command_prefix());
        }

        if !self.candidates.add(title) {
            return format!("\"{}\" has already been suggested.", title);
        }

        tracing::info!("'{}' added to the movie list", title);
        let mut response = format!("\"{}\" has been added to the movie list.", title);
        self.save_candidates(&mut response).await;
        response
    }

    fn list(&self) -> String {
        if self.candidates.is_empty() {
            return EMPTY_LIST.to_string();
        }

        self.candidates
            .list()
            .iter()
            .enumerate()
            .map(|(index, movie)| format!("MovieID: {} - Title: {}", index, movie.title))
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn remove(&mut self, ids: &[String]) -> String {
        if ids.is_empty() {
            return format!("Usage: {}remove <MovieID>...", self.config.command_prefix());
        }

        let indices = match parse_ids(ids, self.candidates.len()) {
            Ok(indices) => indices,
            Err(response) => return response,
        };
        let batch: BTreeSet<usize> = indices.into_iter().collect();

        let removed = match self.candidates.remove(&batch) {
            Ok(removed) => removed,
            Err(e) => return e.to_string(),
        };

        let titles: Vec<String> = removed
            .iter()
            .map(|c| format!("\"{}\"", c.title))
            .collect();
        tracing::info!("Removed {} from the movie list", titles.join(", "));

        let mut response = format!("{} removed from the movie list.", titles.join(", "));
        self.save_candidates(&mut response).await;
        response
    }

    async fn movie_info(&self, ids: &[String]) -> String {
        let Some(metadata) = &self.metadata else {
            return "Movie info lookups are not configured.".to_string();
        };
        if self.candidates.is_empty() {
            return EMPTY_LIST.to_string();
        }
        if ids.is_empty() {
            return format!(
                "Usage: {}movieinfo <MovieID>...",
                self.config.command_prefix()
            );
        }

        let titles = match parse_ids(ids, self.candidates.len()).and_then(|indices| {
            self.candidates
                .resolve(&indices)
                .map_err(|e| e.to_string())
        }) {
            Ok(titles) => titles,
            Err(response) => return response,
        };

        let mut lines = Vec::with_capacity(titles.len());
        for title in &titles {
            match metadata.describe(title).await {
                Ok(details) => lines.push(details.summary()),
                Err(e) => {
                    tracing::warn!("Metadata lookup for '{}' failed: {}", title, e);
                    lines.push(format!("{}: couldn't find any movie info.", title));
                }
            }
        }
        lines.join("\n")
    }

    async fn create(&mut self, author: &str, ids: &[String]) -> String {
        let titles = match parse_ids(ids, self.candidates.len()).and_then(|indices| {
            self.candidates
                .resolve(&indices)
                .map_err(|e| e.to_string())
        }) {
            Ok(titles) => titles,
            Err(response) => return response,
        };

        if let Err(e) = self.poll.start(&titles) {
            tracing::warn!("Failed to start poll: {}", e);
            return format!("Error starting the poll. {}", e);
        }

        tracing::info!("{} started a poll over {} movies", author, titles.len());
        let mut response = format!(
            "{} has started a poll! Please vote for one of the following:\n{}",
            author,
            self.poll.status()
        );
        if let Err(e) = self.save_poll().await {
            tracing::warn!("Couldn't save poll after starting: {}", e);
            response.push_str(
                "\nCouldn't save the poll to a file after starting. Poll will not be saved (this is ok)",
            );
        }
        response
    }

    async fn vote(&mut self, voter: &str, choice: Option<&str>) -> String {
        let Some(choice) = choice else {
            return format!("Usage: {}vote <number>", self.config.command_prefix());
        };

        if let Err(e) = self.poll.vote(voter, choice) {
            return e.to_string();
        }

        let mut response = format!("Thanks for your vote {}!", voter);
        if let Err(e) = self.save_poll().await {
            tracing::warn!("Couldn't save poll after vote: {}", e);
            response.push_str("\n(Warning: couldn't save the poll. Your vote will be lost on restart.)");
        }
        response
    }

    async fn close(&mut self) -> String {
        if !self.poll.is_active() {
            return "There is no active poll to close.".to_string();
        }

        let winner = match self.poll.close() {
            Ok(winner) => winner.to_string(),
            Err(e) => return e.to_string(),
        };

        let mut response = format!(
            "The winner is {}! \"{}\" will be removed from the movie list.",
            winner, winner
        );

        if let Err(e) = delete_document(&self.storage, self.config.poll_document()).await {
            tracing::warn!("Couldn't delete saved poll: {}", e);
            response.push_str("\n(Warning: couldn't delete the saved poll.)");
        }

        match self.candidates.lookup(&winner) {
            Some(index) => {
                if let Err(e) = self.candidates.remove(&BTreeSet::from([index])) {
                    tracing::error!("Winner index {} vanished: {}", index, e);
                    return response;
                }
                self.save_candidates(&mut response).await;
            }
            None => {
                tracing::error!("Winner '{}' is not in the movie list", winner);
                response.push_str("\nHey boss, I couldn't find the ID of the winning movie. Halp.");
            }
        }
        response
    }

    fn when(&self) -> String {
        let (weekday, hour) = self.config.movie_night();
        let now = chrono::Local::now().naive_local();
        countdown::format_countdown(countdown::until_next(now, weekday, hour))
    }

    fn help(&self) -> String {
        let prefix = self.config.command_prefix();
        HELP_TEXT
            .iter()
            .map(|(name, usage, brief)| {
                if usage.is_empty() {
                    format!("{}{} - {}", prefix, name, brief)
                } else {
                    format!("{}{} {} - {}", prefix, name, usage, brief)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn save_poll(&self) -> Result<()> {
        save_document(
            &self.storage,
            self.config.poll_document(),
            &self.poll.to_document(),
        )
        .await
    }

    async fn save_candidates(&self, response: &mut String) {
        if let Err(e) = save_document(
            &self.storage,
            self.config.movie_document(),
            self.candidates.list(),
        )
        .await
        {
            tracing::warn!("Couldn't save the movie list: {}", e);
            response.push_str(
                "\n(Warning: couldn't save the movie list. This change will be lost on restart.)",
            );
        }
    }
}

/// Parses every id before anything is touched; the first bad entry aborts the
/// whole batch. Ids past the end of the list are left for the repository to
/// reject.
fn parse_ids(ids: &[String], len: usize) -> std::result::Result<Vec<usize>, String> {
    ids.iter()
        .map(|id| {
            let index = id
                .parse::<i64>()
                .map_err(|_| format!("{} is not a number. Please give me a number.", id))?;
            usize::try_from(index)
                .map_err(|_| CandidateError::IndexOutOfRange { index, len }.to_string())
        })
        .collect()
}
