//! Evidence extraction.
//!
//! Re-scans the script for short sentences that carry a recognisable signal
//! and quotes them verbatim with a position bucket and a reason tag.

use crate::lexicon::{CONFLICT, CONTRAST, EMOTION, FILLER, SUSPENSE};
use crate::model::{EvidenceItem, Issue, MAX_EVIDENCE, MAX_EVIDENCE_CHARS};
use crate::text;

const SENTENCE_ENDS: &[char] = &['。', '！', '？', '\n'];

/// Characters of an issue reason used to locate it in the script.
const REASON_PROBE_CHARS: usize = 6;

/// Characters of an issue's text kept as a backfilled evidence reason.
const BACKFILL_REASON_CHARS: usize = 30;

/// Signal category of a sentence, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceKind {
    Conflict,
    Emotion,
    Suspense,
    Contrast,
    FlatNarration,
}

impl EvidenceKind {
    /// Reason tag attached to evidence of this kind.
    pub const fn reason(self) -> &'static str {
        match self {
            Self::Conflict => "包含冲突词",
            Self::Emotion => "包含情绪词",
            Self::Suspense => "包含悬念句式",
            Self::Contrast => "包含反差对比",
            Self::FlatNarration => "平铺直叙",
        }
    }

    /// The highest-priority category present in `sentence`.
    pub fn classify(sentence: &str) -> Option<Self> {
        if CONFLICT.any_in(sentence) {
            Some(Self::Conflict)
        } else if EMOTION.any_in(sentence) {
            Some(Self::Emotion)
        } else if SUSPENSE.any_in(sentence) {
            Some(Self::Suspense)
        } else if CONTRAST.any_in(sentence) {
            Some(Self::Contrast)
        } else if FILLER.leading(2).iter().all(|p| p.matches_in(sentence)) {
            Some(Self::FlatNarration)
        } else {
            None
        }
    }
}

/// Quote up to six short signal-bearing sentences from `script`.
pub fn find_evidence(script: &str) -> Vec<EvidenceItem> {
    let total = text::char_len(script);

    text::split_sentences(script, SENTENCE_ENDS)
        .map(str::trim)
        .filter(|s| !s.is_empty() && text::char_len(s) <= MAX_EVIDENCE_CHARS)
        .filter_map(|sentence| {
            let kind = EvidenceKind::classify(sentence)?;
            let offset = text::char_offset_of(script, sentence).unwrap_or(0);
            Some(EvidenceItem {
                text: sentence.to_string(),
                position: text::section_at(offset, total),
                reason: kind.reason().to_string(),
            })
        })
        .take(MAX_EVIDENCE)
        .collect()
}

/// Approximate evidence for issues that have no quotable sentence.
///
/// Looks at the first three issues and, for each with a short reason,
/// searches the script for the reason's opening characters. A hit quotes the script at
/// that offset; reasons that cannot be located are skipped so every quote
/// stays verbatim. The match is lexical only and need not relate to the
/// issue itself.
pub fn backfill_from_issues(script: &str, issues: &[Issue]) -> Vec<EvidenceItem> {
    let total = text::char_len(script);

    issues
        .iter()
        .take(3)
        .filter_map(|issue| {
            let reason = issue.reason.as_deref()?;
            let reason_len = text::char_len(reason);
            if reason_len > MAX_EVIDENCE_CHARS || reason_len < REASON_PROBE_CHARS {
                return None;
            }
            let probe = text::head(reason, REASON_PROBE_CHARS);
            let offset = text::char_offset_of(script, probe)?;
            let quote = text::slice(script, offset, offset + MAX_EVIDENCE_CHARS);
            Some(EvidenceItem {
                text: quote.to_string(),
                position: text::section_at(offset, total),
                reason: text::head(&issue.text, BACKFILL_REASON_CHARS).to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Section;

    #[test]
    fn classify_priority_order() {
        assert_eq!(EvidenceKind::classify("但是我很开心"), Some(EvidenceKind::Conflict));
        assert_eq!(EvidenceKind::classify("我很开心"), Some(EvidenceKind::Emotion));
        assert_eq!(EvidenceKind::classify("到底发生了什么"), Some(EvidenceKind::Suspense));
        assert_eq!(EvidenceKind::classify("本来要走结果留下"), Some(EvidenceKind::Contrast));
        assert_eq!(EvidenceKind::classify("然后接着吃饭"), Some(EvidenceKind::FlatNarration));
        assert_eq!(EvidenceKind::classify("然后吃饭"), None);
    }

    #[test]
    fn extracts_short_signal_sentences_with_positions() {
        let script = "我很开心。今天是普通的一天，阳光很好，街上人来人往，大家都在忙碌着自己的事情。\n到底怎么了？";
        let evidence = find_evidence(script);
        assert_eq!(evidence.len(), 2);
        assert_eq!(evidence[0].text, "我很开心");
        assert_eq!(evidence[0].position, Section::Opening);
        assert_eq!(evidence[0].reason, "包含情绪词");
        assert_eq!(evidence[1].text, "到底怎么了");
        assert_eq!(evidence[1].position, Section::Ending);
        assert_eq!(evidence[1].reason, "包含悬念句式");
    }

    #[test]
    fn stops_at_six_items() {
        let script = "我很开心。".repeat(10);
        let evidence = find_evidence(&script);
        assert_eq!(evidence.len(), MAX_EVIDENCE);
        // Identical sentences all resolve to the first occurrence.
        assert!(evidence.iter().all(|e| e.position == Section::Opening));
    }

    #[test]
    fn non_matching_sentences_do_not_count() {
        let mut script = "平静。".repeat(20);
        script.push_str("我很害怕。");
        let evidence = find_evidence(&script);
        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0].position, Section::Ending);
    }

    #[test]
    fn backfill_quotes_script_verbatim() {
        let script = "序幕：全文仅有1次弱转折的故事开始了，后面还有很多很多内容内容内容内容。";
        let issues = vec![
            Issue::mid("情绪转折较弱，变化不够明显", "全文仅有1次弱转折"),
            Issue::mid("无法定位", "这个原因不在原文里"),
        ];
        let backfill = backfill_from_issues(script, &issues);
        assert_eq!(backfill.len(), 1);
        assert_eq!(backfill[0].text, "全文仅有1次弱转折的故事");
        assert!(script.contains(&backfill[0].text));
        assert_eq!(backfill[0].position, Section::Opening);
        assert_eq!(backfill[0].reason, "情绪转折较弱，变化不够明显");
    }

    #[test]
    fn backfill_ignores_long_or_short_reasons() {
        let script = "全文无任何冲突词、情绪词、悬念句式、反差对比。短因";
        let issues = vec![
            Issue::high("a", "全文无任何冲突词、情绪词、悬念句式、反差对比"),
            Issue::mid("b", "短因"),
        ];
        assert!(backfill_from_issues(script, &issues).is_empty());
    }
}
