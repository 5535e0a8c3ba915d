pub mod candidates;
pub mod command;
pub mod coordinator;
pub mod countdown;
pub mod documents;
pub mod poll;

pub use crate::domain::model::{Candidate, Poll, PollChoice, PollDocument, PollState};
pub use crate::domain::ports::{ConfigProvider, MetadataLookup, Storage};
pub use crate::utils::error::Result;
