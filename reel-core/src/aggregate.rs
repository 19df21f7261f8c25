//! Report synthesis from the three dimension results.

use crate::evidence::{backfill_from_issues, find_evidence};
use crate::model::{
    AnalyzeResponse, DimensionResult, Issue, Meta, RiskLevel, RiskTier, Section, MAX_DIRECTIONS,
    MAX_EVIDENCE, MAX_SUMMARY, MAX_TIER_ISSUES,
};

/// Backfill evidence from issues when fewer than this many quotes were found.
const MIN_EVIDENCE: usize = 3;

const SUMMARY_PER_TIER: usize = 2;

const DEFAULT_DIRECTION: &str = "强化结尾的情绪收束或思考点";

/// Assemble the final report.
pub fn synthesize(
    script: &str,
    rhythm: &DimensionResult,
    emotion: &DimensionResult,
    retention: &DimensionResult,
) -> AnalyzeResponse {
    let score = rhythm.score + emotion.score + retention.score;

    let issues: Vec<&Issue> = rhythm
        .issues
        .iter()
        .chain(&emotion.issues)
        .chain(&retention.issues)
        .collect();

    let (high, mid): (Vec<&Issue>, Vec<&Issue>) =
        issues.iter().copied().partition(|issue| issue.tier == RiskTier::High);
    let issues_high: Vec<Issue> = high.into_iter().take(MAX_TIER_ISSUES).cloned().collect();
    let issues_mid: Vec<Issue> = mid.into_iter().take(MAX_TIER_ISSUES).cloned().collect();

    let summary = issues_high
        .iter()
        .take(SUMMARY_PER_TIER)
        .chain(issues_mid.iter().take(SUMMARY_PER_TIER))
        .map(|issue| issue.text.clone())
        .take(MAX_SUMMARY)
        .collect();

    let mut evidence = find_evidence(script);
    if evidence.len() < MIN_EVIDENCE {
        let all: Vec<Issue> = issues.iter().copied().cloned().collect();
        evidence.extend(backfill_from_issues(script, &all));
    }
    evidence.truncate(MAX_EVIDENCE);

    AnalyzeResponse {
        score,
        risk_level: RiskLevel::from_score(score),
        summary,
        issues_high,
        issues_mid,
        risky_section: risky_section(score, rhythm.score),
        viewer_reaction: viewer_reaction(score).to_string(),
        directions: directions(rhythm.score, emotion.score, retention.score),
        evidence,
        meta: Meta::rule(),
    }
}

/// Where viewers are most likely to leave.
///
/// A low total points at the opening regardless of the breakdown.
pub fn risky_section(total: u32, rhythm: u32) -> Section {
    if total < 50 {
        Section::Opening
    } else if rhythm < 20 {
        Section::Middle
    } else {
        Section::Ending
    }
}

/// First-person prediction of a viewer's reaction.
pub fn viewer_reaction(total: u32) -> &'static str {
    if total < 50 {
        "如果我是观众，我会在前5秒觉得没什么意思就划走了"
    } else if total < 70 {
        "如果我是观众，我会在中段觉得节奏太慢就划走了"
    } else {
        "如果我是观众，我会看完但可能不会点赞"
    }
}

/// One direction per weak dimension, or a default when none is weak.
pub fn directions(rhythm: u32, emotion: u32, retention: u32) -> Vec<String> {
    let mut out: Vec<String> = [
        (rhythm < 25, "在开头建立明确的冲突或悬念"),
        (emotion < 25, "增加至少一次情绪或剧情转折"),
        (retention < 20, "提升中段的信息密度和节奏感"),
    ]
    .into_iter()
    .filter(|(weak, _)| *weak)
    .map(|(_, direction)| direction.to_string())
    .collect();

    if out.is_empty() {
        out.push(DEFAULT_DIRECTION.to_string());
    }
    out.truncate(MAX_DIRECTIONS);
    out
}
