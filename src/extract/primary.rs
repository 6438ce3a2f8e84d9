// File: ./src/extract/primary.rs
use crate::extract::dates::{local_today, parse_iso_date};
use crate::extract::patterns::JSON_OBJECT;
use crate::extract::rules::{RuleBasedExtractor, capitalize_first, truncate_chars};
use crate::extract::{ExtractError, Extraction};
use crate::llm::{LanguageModel, LlmError};
use crate::model::{MAX_TITLE_CHARS, Priority};
use chrono::NaiveDate;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Model-backed extraction with the rule-based extractor as its safety net.
#[derive(Debug, Clone)]
pub struct PrimaryExtractor<M> {
    model: M,
    fallback: RuleBasedExtractor,
    timeout: Duration,
}

impl<M: LanguageModel> PrimaryExtractor<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            fallback: RuleBasedExtractor::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub async fn extract(&self, transcript: &str) -> Extraction {
        self.extract_at(transcript, local_today()).await
    }

    /// Never fails: any error from the model path is logged and replaced by
    /// the rule-based result for the same transcript and reference day.
    pub async fn extract_at(&self, transcript: &str, today: NaiveDate) -> Extraction {
        match self.try_extract_at(transcript, today).await {
            Ok(extraction) => {
                log::debug!("model extraction accepted: {:?}", extraction);
                extraction
            }
            Err(ExtractError::Transport(LlmError::MissingApiKey)) => {
                log::debug!("no API key configured, using rule-based parsing");
                self.fallback.extract_at(transcript, today)
            }
            Err(err) => {
                log::warn!("AI parsing failed, falling back to rule-based parsing: {}", err);
                self.fallback.extract_at(transcript, today)
            }
        }
    }

    /// The model path alone, with its failure visible. One attempt, no retries.
    pub async fn try_extract_at(
        &self,
        transcript: &str,
        today: NaiveDate,
    ) -> Result<Extraction, ExtractError> {
        let prompt = build_prompt(transcript, today);
        let reply = tokio::time::timeout(self.timeout, self.model.complete(&prompt))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))??;
        parse_reply(&reply)
    }
}

pub fn build_prompt(transcript: &str, today: NaiveDate) -> String {
    format!(
        r#"You are a task parser. Extract structured data from this natural language task description.

Today is {today} ({weekday}).

Input: "{transcript}"

Return ONLY valid JSON with exactly these fields:
- title: string (the main task, cleaned up, without filler words)
- priority: "Low" | "Medium" | "High"
- dueDate: ISO date string (YYYY-MM-DD) or null
- status: "To Do" (always)

Rules:
1. Priority keywords:
   - High: urgent, critical, high priority, important, asap
   - Low: low priority, minor, small, whenever
   - Medium: default when neither applies
2. Dates, relative to today:
   - today = today, tomorrow = add 1 day
   - in N days = add N days
   - next week = add 7 days
   - a weekday name (Monday..Sunday) = its next occurrence; "next <weekday>" is never today
3. Remove filler such as "create a task", "add", "remind me to", "make a task to",
   and trailing "task", "by", "before", "due"; also remove the priority and date words.
4. Capitalize the first letter of the title.

Return JSON only, no explanation."#,
        today = today.format("%Y-%m-%d"),
        weekday = today.format("%A"),
        transcript = transcript,
    )
}

/// Turns a free-form model reply into an extraction, or explains why it can't.
pub fn parse_reply(reply: &str) -> Result<Extraction, ExtractError> {
    // Reasoning models may prefix their answer with a <think> block.
    let answer = reply.rsplit("</think>").next().unwrap_or(reply);

    let json = JSON_OBJECT
        .find(answer)
        .ok_or_else(|| ExtractError::MalformedResponse("no JSON object found in reply".into()))?;

    let value: Value = serde_json::from_str(json.as_str())
        .map_err(|e| ExtractError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let title = value
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ExtractError::Validation("title is missing or empty".into()))?;

    let priority = value
        .get("priority")
        .and_then(Value::as_str)
        .and_then(|p| p.parse::<Priority>().ok())
        .unwrap_or_default();

    let due_date = match value.get("dueDate").or_else(|| value.get("due_date")) {
        Some(Value::String(s)) => {
            let parsed = parse_iso_date(s);
            if parsed.is_none() {
                log::debug!("ignoring unparseable dueDate from model: {:?}", s);
            }
            parsed
        }
        _ => None,
    };

    Ok(Extraction {
        title: truncate_chars(&capitalize_first(title), MAX_TITLE_CHARS),
        priority,
        due_date,
    })
}
