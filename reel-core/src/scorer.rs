//! Scoring engine abstraction.

use crate::model::{AnalysisMode, AnalyzeResponse, RULE_ENGINE};
use async_trait::async_trait;
use thiserror::Error;

/// Error from a scoring engine.
#[derive(Debug, Clone, Error)]
#[error("[{engine}] {message}")]
pub struct ScorerError {
    pub engine: String,
    pub message: String,
    /// Upstream HTTP status, when the engine is remote
    pub status_code: Option<u16>,
}

impl ScorerError {
    pub fn new(engine: impl Into<String>, message: impl ToString) -> Self {
        Self {
            engine: engine.into(),
            message: message.to_string(),
            status_code: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }
}

/// Something that turns a script into a report.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Engine name, stamped into `meta.engine` by the rule engine.
    fn name(&self) -> &str;

    async fn score(&self, text: &str, mode: AnalysisMode) -> Result<AnalyzeResponse, ScorerError>;
}

/// The deterministic lexicon engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleScorer;

impl RuleScorer {
    /// Score synchronously.
    pub fn score_now(&self, text: &str, mode: AnalysisMode) -> AnalyzeResponse {
        match mode {
            AnalysisMode::DramaEmotion => crate::analyze(text),
        }
    }
}

#[async_trait]
impl Scorer for RuleScorer {
    fn name(&self) -> &str {
        RULE_ENGINE
    }

    async fn score(&self, text: &str, mode: AnalysisMode) -> Result<AnalyzeResponse, ScorerError> {
        Ok(self.score_now(text, mode))
    }
}
