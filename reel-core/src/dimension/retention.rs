//! Retention triggers: the hook, mid-script pull, and the final beat.

use super::{closing, opening, opening_quote};
use crate::lexicon::{
    CONFLICT, CONTRAST, EMOTION, RELATABLE_MARKERS, RESOLUTION_MARKERS, REVELATION_MARKERS,
    SUSPENSE, TIME_MARKERS, TURNING_POINT,
};
use crate::model::{DimensionResult, Issue};
use crate::signal::{any_signal, flag};
use crate::text;

pub const RETENTION_MAX: u32 = 30;

/// Score the retention-trigger dimension (30 points).
pub fn analyze_retention_triggers(script: &str) -> DimensionResult {
    let mut dim = DimensionResult::full(RETENTION_MAX);

    // Opening hook: up to 15 points.
    let head = opening(script);
    let (strong, weak) = hook_strength(head);

    match (strong, weak) {
        (0, 0) => {
            dim.deduct(
                12,
                Issue::high("前5秒缺乏吸引力，容易被划走", "前5秒无冲突、无悬念、无反差、无强情绪"),
            );
            dim.evidence(opening_quote(script));
        }
        (0, 1) => dim.deduct(9, Issue::mid("前5秒吸引力不足，需要更强的钩子", "前5秒仅有1个弱信号")),
        (1, _) => dim.deduct(6, Issue::mid("前5秒有一定吸引力，但可以更强", "前5秒有1个中等信号")),
        (2, _) => dim.deduct(3, Issue::mid("前5秒吸引力较强，能抓住注意力", "前5秒有1个强信号")),
        _ => {}
    }

    // Mid-script hooks: up to 10 points, skipped when the span is empty.
    let middle = text::fraction_span(script, 0.2, 0.8);
    if !middle.is_empty() {
        let hooks = CONFLICT.count_in(middle)
            + TURNING_POINT.count_in(middle)
            + SUSPENSE.count_in(middle);
        match hooks {
            0 => dim.deduct(
                8,
                Issue::high("中段缺乏留存点，容易让人中途划走", "中段无任何冲突、转折、悬念"),
            ),
            1 => dim.deduct(5, Issue::mid("中段留存点较弱，可以增加更多钩子", "中段有1个弱信号点")),
            2 => dim.deduct(2, Issue::mid("中段留存点尚可，但可以更强", "中段有1-2个中等信号点")),
            _ => {}
        }
    }

    // Ending payoff: up to 5 points.
    let tail = closing(script);
    let payoff = flag(tail, RESOLUTION_MARKERS.entries)
        + flag(tail, REVELATION_MARKERS.entries)
        + flag(tail, RELATABLE_MARKERS.entries);
    match payoff {
        0 => dim.deduct(
            4,
            Issue::high("结尾缺乏落点，没有留下印象", "结尾无情绪收束、无思考点、无共鸣点"),
        ),
        1 => dim.deduct(
            2,
            Issue::mid("结尾落点较弱，可以更明显", "结尾有轻微情绪收束，但不够明显"),
        ),
        _ => {}
    }

    let result = dim.finish();
    tracing::debug!(score = result.score, strong, weak, payoff, "Retention analyzed");
    result
}

/// Strong and weak hook signals in the opening span.
///
/// Strong signals are a headline conflict paired with a headline emotion, a
/// headline suspense question, and a contrast construction (0–3). Weak
/// signals are emotion words plus a time marker, minus the strong count, so
/// the value goes negative when strong signals dominate.
fn hook_strength(head: &str) -> (usize, isize) {
    let conflict_with_emotion =
        any_signal(head, CONFLICT.leading(3)) && any_signal(head, EMOTION.leading(5));
    let strong = usize::from(conflict_with_emotion)
        + flag(head, SUSPENSE.leading(4))
        + flag(head, CONTRAST.entries);

    let weak = (EMOTION.count_in(head) + flag(head, TIME_MARKERS.entries)) as isize - strong as isize;
    (strong, weak)
}
