use crate::domain::model::{Poll, PollChoice, PollDocument, PollState};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Poll validation failures. The display text is shown to the voter as is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollError {
    #[error("A poll needs at least one movie.")]
    EmptyChoiceList,

    #[error("\"{0}\" is listed more than once.")]
    DuplicateChoice(String),

    #[error("There is no active poll. Start one with `create`.")]
    NotActive,

    #[error("{0} is not a number. Please give me a number.")]
    NotANumber(String),

    #[error("{choice} is not on the ballot. Pick a number from 1 to {count}.")]
    OutOfRange { choice: String, count: usize },

    #[error("Saved poll has a vote from {voter} for \"{title}\", which is not on the ballot.")]
    DanglingVote { voter: String, title: String },

    #[error("Saved poll counts {stored} votes for \"{title}\" but has {counted} ballots for it.")]
    TallyMismatch {
        title: String,
        stored: u32,
        counted: u32,
    },

    #[error("Saved poll already has a winner, \"{0}\".")]
    UnexpectedWinner(String),
}

/// Owns the single live [`Poll`] and drives it through
/// empty -> active -> closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollEngine {
    poll: Poll,
}

impl PollEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrates a poll from its persisted document. A document on disk
    /// means the process stopped mid-poll, so the poll comes back active.
    /// The document must describe a valid running poll: a non-empty ballot of
    /// distinct titles, every vote naming a choice, tallies matching the
    /// recorded ballots, and no winner yet.
    pub fn from_document(document: PollDocument) -> Result<Self, PollError> {
        check_titles(document.choices.iter().map(|c| c.title.as_str()))?;

        if let Some(winner) = document.winner {
            return Err(PollError::UnexpectedWinner(winner));
        }

        let mut counted: HashMap<&str, u32> = document
            .choices
            .iter()
            .map(|c| (c.title.as_str(), 0))
            .collect();
        for (voter, title) in &document.votes {
            match counted.get_mut(title.as_str()) {
                Some(count) => *count += 1,
                None => {
                    return Err(PollError::DanglingVote {
                        voter: voter.clone(),
                        title: title.clone(),
                    })
                }
            }
        }
        for choice in &document.choices {
            let ballots = counted.get(choice.title.as_str()).copied().unwrap_or(0);
            if ballots != choice.votes {
                return Err(PollError::TallyMismatch {
                    title: choice.title.clone(),
                    stored: choice.votes,
                    counted: ballots,
                });
            }
        }

        Ok(Self {
            poll: Poll {
                is_active: true,
                choices: document.choices,
                votes: document.votes,
                winner: None,
            },
        })
    }

    pub fn to_document(&self) -> PollDocument {
        self.poll.to_document()
    }

    pub fn poll(&self) -> &Poll {
        &self.poll
    }

    pub fn state(&self) -> PollState {
        self.poll.state()
    }

    pub fn is_active(&self) -> bool {
        self.poll.is_active
    }

    pub fn winner(&self) -> Option<&str> {
        self.poll.winner.as_deref()
    }

    /// Opens a fresh poll over `titles`, discarding any previous ballot.
    /// On error the current state is left alone.
    pub fn start<S: AsRef<str>>(&mut self, titles: &[S]) -> Result<(), PollError> {
        check_titles(titles.iter().map(|t| t.as_ref()))?;

        self.poll = Poll {
            is_active: true,
            choices: titles.iter().map(|t| PollChoice::new(t.as_ref())).collect(),
            votes: Default::default(),
            winner: None,
        };
        tracing::debug!("Poll started with {} choices", self.poll.choices.len());
        Ok(())
    }

    /// Records `voter`'s ballot for the 1-based `choice_ref`. A repeat vote
    /// moves the ballot instead of adding a second one.
    pub fn vote(&mut self, voter: &str, choice_ref: &str) -> Result<(), PollError> {
        if !self.poll.is_active {
            return Err(PollError::NotActive);
        }

        let choice_ref = choice_ref.trim();
        let number: i64 = choice_ref
            .parse()
            .map_err(|_| PollError::NotANumber(choice_ref.to_string()))?;

        let count = self.poll.choices.len();
        let index = usize::try_from(number)
            .ok()
            .filter(|n| (1..=count).contains(n))
            .map(|n| n - 1)
            .ok_or_else(|| PollError::OutOfRange {
                choice: choice_ref.to_string(),
                count,
            })?;

        let title = self.poll.choices[index].title.clone();
        if let Some(previous) = self.poll.votes.insert(voter.to_string(), title) {
            if let Some(choice) = self.poll.choices.iter_mut().find(|c| c.title == previous) {
                choice.votes = choice.votes.saturating_sub(1);
            }
        }
        self.poll.choices[index].votes += 1;

        tracing::debug!("{} voted for choice {}", voter, number);
        Ok(())
    }

    /// Renders the ballot in display order with current tallies.
    pub fn status(&self) -> String {
        if self.poll.choices.is_empty() {
            return "There is no poll running. Start one with `create` and some MovieIDs."
                .to_string();
        }

        let mut lines = Vec::with_capacity(self.poll.choices.len() + 1);
        if let Some(winner) = &self.poll.winner {
            lines.push(format!("The poll is closed. The winner was {}.", winner));
        }
        for (position, choice) in self.poll.choices.iter().enumerate() {
            lines.push(format!(
                "{}. {} - {} {}",
                position + 1,
                choice.title,
                choice.votes,
                if choice.votes == 1 { "vote" } else { "votes" }
            ));
        }
        lines.join("\n")
    }

    /// Closes the poll and picks the winner: the highest tally, ties going to
    /// the earliest choice in display order. Choices and votes are kept for
    /// `status` until the next `start`.
    pub fn close(&mut self) -> Result<&str, PollError> {
        if !self.poll.is_active {
            return Err(PollError::NotActive);
        }

        let mut best: Option<&PollChoice> = None;
        for choice in &self.poll.choices {
            if best.map_or(true, |b| choice.votes > b.votes) {
                best = Some(choice);
            }
        }
        // An active poll always has at least one choice.
        let winner = best.ok_or(PollError::EmptyChoiceList)?.title.clone();

        tracing::info!("Poll closed, winner is '{}'", winner);
        self.poll.is_active = false;
        Ok(self.poll.winner.insert(winner).as_str())
    }
}

/// A ballot needs at least one title and no title twice.
fn check_titles<'a>(titles: impl ExactSizeIterator<Item = &'a str>) -> Result<(), PollError> {
    if titles.len() == 0 {
        return Err(PollError::EmptyChoiceList);
    }

    let mut seen = HashSet::with_capacity(titles.len());
    for title in titles {
        if !seen.insert(title) {
            return Err(PollError::DuplicateChoice(title.to_string()));
        }
    }
    Ok(())
}
