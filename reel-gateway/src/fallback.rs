//! Primary engine with a rule-engine safety net.

use crate::llm::QwenScorer;
use async_trait::async_trait;
use reel_common::config::{Config, EngineKind};
use reel_core::{AnalysisMode, AnalyzeResponse, RuleScorer, Scorer, ScorerError};
use std::sync::Arc;

/// Tries the primary engine once and falls back to the rule engine on any
/// error. Never fails.
pub struct FallbackScorer {
    primary: Option<Arc<dyn Scorer>>,
    fallback: RuleScorer,
}

impl FallbackScorer {
    pub fn new(primary: Option<Arc<dyn Scorer>>) -> Self {
        Self {
            primary,
            fallback: RuleScorer,
        }
    }

    /// Rule engine only.
    pub fn rule_only() -> Self {
        Self::new(None)
    }

    /// Select the primary engine from configuration.
    pub fn from_config(config: &Config) -> Self {
        match config.engine() {
            EngineKind::Llm => {
                let primary: Arc<dyn Scorer> = Arc::new(QwenScorer::from_config(&config.llm));
                Self::new(Some(primary))
            }
            EngineKind::Rule => Self::rule_only(),
        }
    }

    /// Name of the engine tried first.
    pub fn primary_name(&self) -> &str {
        self.primary
            .as_deref()
            .map_or(self.fallback.name(), |p| p.name())
    }
}

#[async_trait]
impl Scorer for FallbackScorer {
    fn name(&self) -> &str {
        self.primary_name()
    }

    async fn score(&self, text: &str, mode: AnalysisMode) -> Result<AnalyzeResponse, ScorerError> {
        if let Some(primary) = &self.primary {
            match primary.score(text, mode).await {
                Ok(report) => return Ok(report),
                Err(e) => {
                    tracing::warn!(
                        failed_engine = %e.engine,
                        error = %e.message,
                        "Falling back to rule engine"
                    );
                }
            }
        }
        Ok(self.fallback.score_now(text, mode))
    }
}
