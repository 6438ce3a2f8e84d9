// File: ./src/extract/mod.rs
//! Transcript to task extraction.
//!
//! [`TranscriptParser`] is the entry point. It asks the [`PrimaryExtractor`]
//! (a hosted language model) first; whenever that path fails the
//! [`RuleBasedExtractor`] answers instead, so parsing itself never errors.
pub mod dates;
pub mod patterns;
pub mod primary;
pub mod rules;

pub use primary::PrimaryExtractor;
pub use rules::RuleBasedExtractor;

use crate::config::Config;
use crate::llm::{AnthropicClient, LanguageModel, LlmError};
use crate::model::{ParsedTask, Priority, TaskStatus};
use chrono::NaiveDate;
use std::time::Duration;
use thiserror::Error;

/// Fields either extractor derives from a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub title: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("language model request failed: {0}")]
    Transport(#[from] LlmError),
    #[error("malformed model reply: {0}")]
    MalformedResponse(String),
    #[error("model reply failed validation: {0}")]
    Validation(String),
}

pub struct TranscriptParser<M> {
    primary: PrimaryExtractor<M>,
}

impl<M: LanguageModel> TranscriptParser<M> {
    pub fn new(primary: PrimaryExtractor<M>) -> Self {
        Self { primary }
    }

    /// Callers reject blank transcripts before getting here.
    pub async fn parse(&self, transcript: &str) -> ParsedTask {
        self.parse_at(transcript, dates::local_today()).await
    }

    pub async fn parse_at(&self, transcript: &str, today: NaiveDate) -> ParsedTask {
        let Extraction {
            title,
            priority,
            due_date,
        } = self.primary.extract_at(transcript, today).await;

        ParsedTask {
            title,
            priority,
            due_date,
            status: TaskStatus::ToDo,
            transcript: transcript.to_string(),
        }
    }
}

impl TranscriptParser<AnthropicClient> {
    pub fn from_config(config: &Config) -> Self {
        let primary = PrimaryExtractor::new(AnthropicClient::from_config(config))
            .with_timeout(Duration::from_secs(config.timeout_secs));
        Self::new(primary)
    }
}
