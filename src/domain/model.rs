use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A suggested title. Its identifier is its position in the candidate list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
}

impl Candidate {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// A candidate as offered in one poll, with its running tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollChoice {
    pub title: String,
    pub votes: u32,
}

impl PollChoice {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            votes: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Empty,
    Active,
    Closed,
}

/// The poll aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Poll {
    pub is_active: bool,
    pub choices: Vec<PollChoice>,
    /// Voter identity to chosen title, one entry per voter.
    pub votes: BTreeMap<String, String>,
    pub winner: Option<String>,
}

impl Poll {
    pub fn state(&self) -> PollState {
        if self.is_active {
            PollState::Active
        } else if self.winner.is_some() {
            PollState::Closed
        } else {
            PollState::Empty
        }
    }

    pub fn to_document(&self) -> PollDocument {
        PollDocument {
            choices: self.choices.clone(),
            votes: self.votes.clone(),
            winner: self.winner.clone(),
        }
    }
}

/// Persisted form of a [`Poll`]. `is_active` is not stored: a poll document
/// only exists on disk while a poll is running.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollDocument {
    pub choices: Vec<PollChoice>,
    #[serde(default)]
    pub votes: BTreeMap<String, String>,
    #[serde(default)]
    pub winner: Option<String>,
}

/// Persisted form of the candidate list.
pub type CandidateDocument = Vec<Candidate>;

/// Display decoration returned by the metadata lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDetails {
    pub title: String,
    pub year: Option<String>,
    pub plot: Option<String>,
}

impl MovieDetails {
    /// One-line `"<title>, <year>: <plot>"`. Plot text after a `::` is the
    /// author credit and is dropped.
    pub fn summary(&self) -> String {
        let year = self.year.as_deref().unwrap_or("unknown year");
        let plot = self
            .plot
            .as_deref()
            .map(|p| p.split("::").next().unwrap_or(p).trim())
            .filter(|p| !p.is_empty())
            .unwrap_or("No plot available.");
        format!("{}, {}: {}", self.title, year, plot)
    }
}
