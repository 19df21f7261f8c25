//! Validation of externally produced reports.
//!
//! A report from an alternate engine is untrusted JSON. It is accepted only
//! if it deserializes into [`AnalyzeResponse`] and meets the same bounds the
//! rule engine guarantees. `summary` and `evidence` are truncated rather
//! than rejected; evidence that is not quoted from the script is dropped.

use crate::model::{
    AnalyzeResponse, Issue, Meta, RiskTier, MAX_DIRECTIONS, MAX_EVIDENCE, MAX_EVIDENCE_CHARS,
    MAX_SUMMARY, MAX_TIER_ISSUES,
};
use crate::text;
use serde_json::{Map, Value};
use thiserror::Error;

/// Reasons an external report is rejected.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("report must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("report does not match schema: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("score {0} is outside 0..=100")]
    ScoreOutOfRange(u32),

    #[error("expected 1 to 3 directions, got {0}")]
    Directions(usize),

    #[error("{tier} has {count} issues, at most 3 allowed")]
    TooManyIssues { tier: &'static str, count: usize },
}

/// Validate `value` as a report about `script`.
///
/// Missing `meta.version` and `meta.engine` are taken from `defaults`.
pub fn validate_report(
    value: Value,
    script: &str,
    defaults: &Meta,
) -> Result<AnalyzeResponse, SchemaError> {
    let mut object = match value {
        Value::Object(map) => map,
        other => return Err(SchemaError::NotAnObject(json_kind(&other))),
    };

    fill_meta(&mut object, defaults);
    for list in ["issues_high", "issues_mid", "evidence"] {
        object
            .entry(list)
            .or_insert_with(|| Value::Array(Vec::new()));
    }
    for tier in ["issues_high", "issues_mid"] {
        if let Some(Value::Array(items)) = object.get(tier) {
            if items.len() > MAX_TIER_ISSUES {
                return Err(SchemaError::TooManyIssues {
                    tier,
                    count: items.len(),
                });
            }
        }
    }
    for (list, cap) in [("summary", MAX_SUMMARY), ("evidence", MAX_EVIDENCE)] {
        if let Some(Value::Array(items)) = object.get_mut(list) {
            items.truncate(cap);
        }
    }

    let mut report: AnalyzeResponse = serde_json::from_value(Value::Object(object))?;

    if report.score > 100 {
        return Err(SchemaError::ScoreOutOfRange(report.score));
    }
    if report.directions.is_empty() || report.directions.len() > MAX_DIRECTIONS {
        return Err(SchemaError::Directions(report.directions.len()));
    }

    set_tier(&mut report.issues_high, RiskTier::High);
    set_tier(&mut report.issues_mid, RiskTier::Mid);

    report.evidence.retain_mut(|item| {
        let quote = text::head(item.text.trim(), MAX_EVIDENCE_CHARS);
        if quote.is_empty() || !script.contains(quote) {
            return false;
        }
        item.text = quote.to_string();
        true
    });

    Ok(report)
}

fn fill_meta(object: &mut Map<String, Value>, defaults: &Meta) {
    let meta = object
        .entry("meta")
        .or_insert_with(|| Value::Object(Map::new()));
    if !meta.is_object() {
        *meta = Value::Object(Map::new());
    }
    if let Value::Object(meta) = meta {
        meta.entry("version")
            .or_insert_with(|| Value::String(defaults.version.clone()));
        meta.entry("engine")
            .or_insert_with(|| Value::String(defaults.engine.clone()));
    }
}

fn set_tier(issues: &mut [Issue], tier: RiskTier) {
    for issue in issues {
        issue.tier = tier;
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
