//! Rhythm: how quickly the script gets going and keeps moving.

use super::{opening, opening_quote};
use crate::lexicon::{CONFLICT, CONTRAST, EMOTION, FILLER, SUSPENSE, TURNING_POINT};
use crate::model::{DimensionResult, Issue, MAX_EVIDENCE_CHARS};
use crate::signal::flag;
use crate::text;

pub const RHYTHM_MAX: u32 = 35;

/// Longest filler-anchored snippet considered for evidence.
const FILLER_SNIPPET_CHARS: usize = 20;

/// Score the rhythm dimension (35 points).
pub fn analyze_rhythm(script: &str) -> DimensionResult {
    let mut dim = DimensionResult::full(RHYTHM_MAX);

    // Opening density: up to 12 points.
    let head = opening(script);
    let signals = CONFLICT.count_in(head)
        + EMOTION.count_in(head)
        + SUSPENSE.count_in(head)
        + flag(head, CONTRAST.entries);

    match signals {
        0 => {
            dim.deduct(
                10,
                Issue::high(
                    "前5秒缺乏明确冲突或悬念，容易让人划走",
                    "前5秒内无任何冲突词、情绪词、悬念句式、反差对比",
                ),
            );
            dim.evidence(opening_quote(script));
        }
        1 => dim.deduct(7, Issue::mid("前5秒信息密度偏低，吸引力不足", "前5秒仅有1个弱信号")),
        2 => dim.deduct(
            3,
            Issue::mid("前5秒有一定吸引力，但可以更强", "前5秒有1-2个中等信号"),
        ),
        _ => {}
    }

    // Middle pacing: up to 12 points, skipped when the span is empty.
    let middle = text::fraction_span(script, 0.2, 0.7);
    if !middle.is_empty() {
        let filler = FILLER.count_in(middle);
        let turning = TURNING_POINT.count_in(middle);

        if filler >= 3 && turning == 0 {
            dim.deduct(
                9,
                Issue::high(
                    "中段节奏偏慢，存在明显拖沓段落",
                    "中段存在连续3句以上平铺直叙，无转折",
                ),
            );
            if let Some(snippet) = filler_snippet(middle) {
                dim.evidence(snippet);
            }
        } else if filler >= 2 && turning <= 1 {
            dim.deduct(
                6,
                Issue::mid("中段节奏可以更快，信息密度有待提升", "中段存在连续2句平铺直叙"),
            );
        } else if turning <= 1 {
            dim.deduct(
                3,
                Issue::mid("中段节奏尚可，但仍有优化空间", "中段有1-2次推进，但节奏不够紧凑"),
            );
        }
    }

    // Overall density: up to 11 points.
    let total = CONFLICT.count_in(script) + EMOTION.count_in(script) + TURNING_POINT.count_in(script);
    match total {
        0 => dim.deduct(
            8,
            Issue::high("整体信息密度过低，缺乏吸引人的元素", "全文无明显冲突、转折、情绪变化"),
        ),
        1..=2 => dim.deduct(
            5,
            Issue::mid(
                "整体信息密度偏低，可以增加更多冲突或转折",
                format!("全文仅有{total}个弱信号点"),
            ),
        ),
        3..=5 => dim.deduct(
            2,
            Issue::mid(
                "整体信息密度尚可，但可以更均衡",
                format!("全文有{total}个信号点，但分布不均"),
            ),
        ),
        _ => {}
    }

    let result = dim.finish();
    tracing::debug!(score = result.score, signals, total, "Rhythm analyzed");
    result
}

/// Snippet starting at the first filler term in lexicon order, kept only if
/// it fits an evidence quote.
fn filler_snippet(middle: &str) -> Option<&str> {
    let start = FILLER.entries.iter().find_map(|p| p.find_in(middle))?;
    let snippet = text::head(&middle[start..], FILLER_SNIPPET_CHARS);
    (text::char_len(snippet) <= MAX_EVIDENCE_CHARS).then_some(snippet)
}
