use crate::domain::model::{Candidate, CandidateDocument};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CandidateError {
    #[error("MovieID {index} doesn't exist. There are {len} movies in the list.")]
    IndexOutOfRange { index: i64, len: usize },
}

/// Ordered list of suggested titles. Identifiers are positions and shift down
/// after a removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateRepository {
    candidates: Vec<Candidate>,
}

impl CandidateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the repository from a persisted document. Duplicate titles
    /// are dropped, keeping the first occurrence.
    pub fn from_document(document: CandidateDocument) -> Self {
        let mut repository = Self::new();
        for candidate in document {
            if !repository.add(&candidate.title) {
                tracing::warn!("Dropping duplicate title '{}' from saved list", candidate.title);
            }
        }
        repository
    }

    pub fn to_document(&self) -> CandidateDocument {
        self.candidates.clone()
    }

    /// Appends `title` unless an identical title is already present.
    pub fn add(&mut self, title: &str) -> bool {
        if self.lookup(title).is_some() {
            return false;
        }
        self.candidates.push(Candidate::new(title));
        true
    }

    /// Removes every candidate named in `indices`, all resolved against the
    /// list as it was before this call. Nothing is removed if any index is out
    /// of range. Returns the removed candidates in list order.
    pub fn remove(&mut self, indices: &BTreeSet<usize>) -> Result<Vec<Candidate>, CandidateError> {
        let len = self.candidates.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(CandidateError::IndexOutOfRange {
                index: index as i64,
                len,
            });
        }

        let mut removed = Vec::with_capacity(indices.len());
        let mut kept = Vec::with_capacity(len - indices.len());
        for (index, candidate) in self.candidates.drain(..).enumerate() {
            if indices.contains(&index) {
                removed.push(candidate);
            } else {
                kept.push(candidate);
            }
        }
        self.candidates = kept;
        Ok(removed)
    }

    pub fn lookup(&self, title: &str) -> Option<usize> {
        self.candidates.iter().position(|c| c.title == title)
    }

    pub fn get(&self, index: usize) -> Result<&Candidate, CandidateError> {
        self.candidates
            .get(index)
            .ok_or(CandidateError::IndexOutOfRange {
                index: index as i64,
                len: self.candidates.len(),
            })
    }

    /// Resolves identifiers to titles against the current snapshot, so a
    /// caller can mutate afterwards without positions shifting underneath it.
    pub fn resolve(&self, indices: &[usize]) -> Result<Vec<String>, CandidateError> {
        indices
            .iter()
            .map(|&index| self.get(index).map(|c| c.title.clone()))
            .collect()
    }

    pub fn list(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
