//! Emotion curve: reversals, escalation, and range of feeling.

use crate::lexicon::{EMOTION, PROGRESSIVE, TURNING_POINT};
use crate::model::{DimensionResult, Issue, MAX_EVIDENCE_CHARS};
use crate::text;

pub const EMOTION_MAX: u32 = 35;

const SENTENCE_ENDS: &[char] = &['。', '！', '？'];

/// Score the emotion-curve dimension (35 points).
pub fn analyze_emotion_curve(script: &str) -> DimensionResult {
    let mut dim = DimensionResult::full(EMOTION_MAX);

    // Turning points: up to 15 points.
    let turning = TURNING_POINT.count_in(script);
    let emotion = EMOTION.count_in(script);

    if turning == 0 && emotion <= 1 {
        dim.deduct(
            12,
            Issue::high("缺乏情绪转折，情绪曲线平直，难以产生代入感", "全文无任何情绪转折"),
        );
        if let Some(sentence) = flat_sentence(script) {
            dim.evidence(sentence);
        }
    } else if turning == 1 && emotion <= 2 {
        dim.deduct(8, Issue::mid("情绪转折较弱，变化不够明显", "全文仅有1次弱转折"));
    } else if turning <= 2 {
        dim.deduct(
            4,
            Issue::mid(
                "存在情绪转折，但可以更强烈或增加转折次数",
                format!("全文有{turning}次转折"),
            ),
        );
    }

    // Progression: up to 10 points.
    match PROGRESSIVE.count_in(script) {
        0 => dim.deduct(
            8,
            Issue::high("情绪缺乏递进，始终停留在同一强度", "情绪始终停留在同一强度，无递进或变化"),
        ),
        1 => dim.deduct(
            5,
            Issue::mid("情绪递进较弱，可以更明显", "情绪有轻微递进，但变化不明显"),
        ),
        2 => dim.deduct(
            2,
            Issue::mid("情绪递进尚可，但可以更强烈", "情绪有明显递进，但可以更强"),
        ),
        _ => {}
    }

    // Variety: up to 10 points, counting distinct emotion terms.
    let variety = emotion;
    match variety {
        0 => dim.deduct(8, Issue::high("情绪过于单一，缺乏层次感", "全文无明显情绪词")),
        1 => dim.deduct(
            5,
            Issue::mid("情绪种类较少，可以增加更多情绪层次", format!("全文仅有{variety}种情绪")),
        ),
        2 => dim.deduct(
            2,
            Issue::mid("情绪多样性尚可，但可以更均衡", format!("全文有{variety}种情绪，但分布不均")),
        ),
        _ => {}
    }

    let result = dim.finish();
    tracing::debug!(score = result.score, turning, emotion, "Emotion curve analyzed");
    result
}

/// The first short, non-blank sentence among the opening three.
fn flat_sentence(script: &str) -> Option<&str> {
    text::split_sentences(script, SENTENCE_ENDS)
        .take(3)
        .find(|s| text::char_len(s) <= MAX_EVIDENCE_CHARS && !s.trim().is_empty())
        .map(str::trim)
}
