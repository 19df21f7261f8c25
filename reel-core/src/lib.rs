//! Reel Core - Rule-based diagnostics for short-form drama scripts.
//!
//! This crate provides:
//! - Signal lexicons and span counting
//! - The rhythm, emotion curve, and retention analyzers
//! - Evidence extraction and report synthesis
//! - Validation for reports produced by other engines
//! - The [`Scorer`] trait and the rule engine behind it
//!
//! ```
//! let report = reel_core::analyze("她突然停下脚步，原来他一直都在等她。");
//! assert!(report.score <= 100);
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod aggregate;
pub mod dimension;
pub mod evidence;
pub mod lexicon;
pub mod model;
pub mod schema;
pub mod scorer;
pub mod signal;
pub mod text;

pub use model::{
    AnalysisMode, AnalyzeResponse, DimensionResult, EvidenceItem, Issue, Meta, RiskLevel,
    RiskTier, Section, API_VERSION,
};
pub use schema::{validate_report, SchemaError};
pub use scorer::{RuleScorer, Scorer, ScorerError};

use serde::Serialize;

/// A report together with the dimension results it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub report: AnalyzeResponse,
    pub rhythm: DimensionResult,
    pub emotion: DimensionResult,
    pub retention: DimensionResult,
}

/// Run all three analyzers over `script` and keep their results.
///
/// The script is expected to be trimmed and within the accepted length range;
/// anything else still yields a well-formed report.
pub fn analyze_detailed(script: &str) -> Analysis {
    let rhythm = dimension::analyze_rhythm(script);
    let emotion = dimension::analyze_emotion_curve(script);
    let retention = dimension::analyze_retention_triggers(script);
    let report = aggregate::synthesize(script, &rhythm, &emotion, &retention);

    tracing::debug!(
        rhythm = rhythm.score,
        emotion = emotion.score,
        retention = retention.score,
        total = report.score,
        "Script analyzed"
    );

    Analysis {
        report,
        rhythm,
        emotion,
        retention,
    }
}

/// Diagnose `script` with the rule engine.
pub fn analyze(script: &str) -> AnalyzeResponse {
    analyze_detailed(script).report
}
