//! Diagnostic report types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Version stamped into every report's metadata.
pub const API_VERSION: &str = "1.0.0";

/// Engine name stamped by the rule engine.
pub const RULE_ENGINE: &str = "rule";

pub const MAX_SUMMARY: usize = 4;
pub const MAX_TIER_ISSUES: usize = 3;
pub const MAX_DIRECTIONS: usize = 3;
pub const MAX_EVIDENCE: usize = 6;
/// Maximum characters in an evidence fragment.
pub const MAX_EVIDENCE_CHARS: usize = 12;

/// Analysis mode requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Drama / emotional short-video scripts.
    #[default]
    DramaEmotion,
}

impl AnalysisMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DramaEmotion => "drama_emotion",
        }
    }
}

impl std::str::FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "drama_emotion" => Ok(Self::DramaEmotion),
            other => Err(format!("unsupported analysis mode: {other}")),
        }
    }
}

/// Coarse position within a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "前段", alias = "opening")]
    Opening,
    #[serde(rename = "中段", alias = "middle")]
    Middle,
    #[serde(rename = "后段", alias = "ending")]
    Ending,
}

impl Section {
    /// Display label, identical to the serialized form.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Opening => "前段",
            Self::Middle => "中段",
            Self::Ending => "后段",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Overall drop-off risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Warn,
    Bad,
}

impl RiskLevel {
    /// Classify a total score: 75+ is safe, 60–74 warn, below 60 bad.
    pub const fn from_score(score: u32) -> Self {
        if score >= 75 {
            Self::Safe
        } else if score >= 60 {
            Self::Warn
        } else {
            Self::Bad
        }
    }
}

/// Priority of a diagnosed issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiskTier {
    High,
    #[default]
    Mid,
}

impl RiskTier {
    /// Words in a reason that mark an absence or severe lack.
    pub const ABSENCE_MARKERS: &'static [&'static str] = &["无", "缺乏", "没有", "极低", "极弱"];

    /// Legacy tiering: a reason that mentions an absence is high risk.
    pub fn classify_reason(reason: Option<&str>) -> Self {
        let reason = reason.unwrap_or_default();
        if Self::ABSENCE_MARKERS.iter().any(|m| reason.contains(m)) {
            Self::High
        } else {
            Self::Mid
        }
    }
}

/// A diagnosed issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Human-readable finding
    pub text: String,
    /// Short diagnostic rationale
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(skip)]
    pub tier: RiskTier,
}

impl Issue {
    /// A high-risk issue.
    pub fn high(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reason: Some(reason.into()),
            tier: RiskTier::High,
        }
    }

    /// A mid-risk issue.
    pub fn mid(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reason: Some(reason.into()),
            tier: RiskTier::Mid,
        }
    }
}

/// A short verbatim quote substantiating a diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub text: String,
    pub position: Section,
    pub reason: String,
}

/// Report metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub version: String,
    pub engine: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Meta {
    pub fn new(version: impl Into<String>, engine: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            engine: engine.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Metadata for reports produced by the rule engine.
    pub fn rule() -> Self {
        Self::new(API_VERSION, RULE_ENGINE)
    }
}

/// The complete diagnostic report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub score: u32,
    pub risk_level: RiskLevel,
    pub summary: Vec<String>,
    pub issues_high: Vec<Issue>,
    pub issues_mid: Vec<Issue>,
    pub risky_section: Section,
    pub viewer_reaction: String,
    pub directions: Vec<String>,
    pub evidence: Vec<EvidenceItem>,
    pub meta: Meta,
}

/// Output of one dimension analyzer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionResult {
    pub score: u32,
    /// Points available in this dimension
    pub max: u32,
    pub issues: Vec<Issue>,
    pub evidence_candidates: Vec<String>,
}

impl DimensionResult {
    /// Start a dimension at full marks.
    pub(crate) fn full(max: u32) -> DimensionBuilder {
        DimensionBuilder {
            max,
            deducted: 0,
            issues: Vec::new(),
            evidence_candidates: Vec::new(),
        }
    }
}

/// Accumulates deductions for one analyzer run.
#[derive(Debug)]
pub(crate) struct DimensionBuilder {
    max: u32,
    deducted: u32,
    issues: Vec<Issue>,
    evidence_candidates: Vec<String>,
}

impl DimensionBuilder {
    /// Deduct `points` and record the issue that explains it.
    pub(crate) fn deduct(&mut self, points: u32, issue: Issue) {
        self.deducted += points;
        self.issues.push(issue);
    }

    pub(crate) fn evidence(&mut self, fragment: impl Into<String>) {
        self.evidence_candidates.push(fragment.into());
    }

    /// Finish, flooring the score at zero.
    pub(crate) fn finish(self) -> DimensionResult {
        DimensionResult {
            score: self.max.saturating_sub(self.deducted),
            max: self.max,
            issues: self.issues,
            evidence_candidates: self.evidence_candidates,
        }
    }
}
