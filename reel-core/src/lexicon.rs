//! Signal lexicons.
//!
//! Fixed trigger-word tables, one per narrative device. Entries are ordered
//! and counted individually, so a term listed twice (竟然 and 居然 in the
//! conflict table) contributes twice.

use regex::Regex;
use std::sync::LazyLock;

/// One lexicon entry: a literal substring or a compiled regular expression.
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    Literal(&'static str),
    Regex(&'static LazyLock<Regex>),
}

impl Pattern {
    /// Whether this pattern occurs anywhere in `span`.
    pub fn matches_in(&self, span: &str) -> bool {
        match self {
            Self::Literal(word) => span.contains(word),
            Self::Regex(re) => re.is_match(span),
        }
    }

    /// Byte offset of the first match in `span`.
    pub fn find_in(&self, span: &str) -> Option<usize> {
        match self {
            Self::Literal(word) => span.find(word),
            Self::Regex(re) => re.find(span).map(|m| m.start()),
        }
    }
}

/// A named, ordered set of signal patterns.
#[derive(Debug)]
pub struct Lexicon {
    pub name: &'static str,
    pub entries: &'static [Pattern],
}

impl Lexicon {
    /// The first `n` entries, used where only the strongest terms count.
    pub fn leading(&self, n: usize) -> &'static [Pattern] {
        &self.entries[..n.min(self.entries.len())]
    }
}

static CONTRAST_DESPITE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("明明.*?却").expect("valid contrast pattern"));
static CONTRAST_EXPECTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("本来.*?结果").expect("valid contrast pattern"));
static CONTRAST_THEN_NOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("以前.*?现在").expect("valid contrast pattern"));
static CONTRAST_BEFORE_NOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("之前.*?现在").expect("valid contrast pattern"));

use Pattern::Literal as L;

pub static CONFLICT: Lexicon = Lexicon {
    name: "conflict",
    entries: &[
        L("但是"),
        L("可是"),
        L("然而"),
        L("竟然"),
        L("居然"),
        L("没想到"),
        L("突然"),
        L("竟然"),
        L("居然"),
        L("却"),
        L("但"),
    ],
};

pub static EMOTION: Lexicon = Lexicon {
    name: "emotion",
    entries: &[
        L("愤怒"),
        L("震惊"),
        L("崩溃"),
        L("绝望"),
        L("惊喜"),
        L("激动"),
        L("紧张"),
        L("害怕"),
        L("开心"),
        L("难过"),
        L("伤心"),
        L("高兴"),
        L("兴奋"),
        L("焦虑"),
        L("担心"),
    ],
};

pub static SUSPENSE: Lexicon = Lexicon {
    name: "suspense",
    entries: &[
        L("为什么"),
        L("怎么会"),
        L("到底"),
        L("究竟"),
        L("原来"),
        L("竟然"),
        L("居然"),
        L("怎么"),
        L("如何"),
    ],
};

pub static CONTRAST: Lexicon = Lexicon {
    name: "contrast",
    entries: &[
        Pattern::Regex(&CONTRAST_DESPITE),
        Pattern::Regex(&CONTRAST_EXPECTED),
        Pattern::Regex(&CONTRAST_THEN_NOW),
        Pattern::Regex(&CONTRAST_BEFORE_NOW),
    ],
};

pub static TURNING_POINT: Lexicon = Lexicon {
    name: "turning_point",
    entries: &[
        L("但是"),
        L("可是"),
        L("然而"),
        L("突然"),
        L("一下子"),
        L("瞬间"),
        L("终于"),
        L("原来"),
    ],
};

pub static PROGRESSIVE: Lexicon = Lexicon {
    name: "progressive",
    entries: &[
        L("越来越"),
        L("逐渐"),
        L("慢慢"),
        L("突然"),
        L("一下子"),
        L("瞬间"),
    ],
};

pub static FILLER: Lexicon = Lexicon {
    name: "filler",
    entries: &[L("然后"), L("接着"), L("之后"), L("后来"), L("接下来")],
};

// Marker groups for the opening hook and the ending payoff.

pub static TIME_MARKERS: Lexicon = Lexicon {
    name: "time_marker",
    entries: &[L("今天"), L("昨天"), L("刚才")],
};

pub static RESOLUTION_MARKERS: Lexicon = Lexicon {
    name: "resolution",
    entries: &[L("终于"), L("释然"), L("明白"), L("懂了")],
};

pub static REVELATION_MARKERS: Lexicon = Lexicon {
    name: "revelation",
    entries: &[L("原来"), L("其实")],
};

pub static RELATABLE_MARKERS: Lexicon = Lexicon {
    name: "relatable",
    entries: &[L("每个人"), L("我们都"), L("生活")],
};

/// The seven signal lexicons, in priority order.
pub fn all() -> [&'static Lexicon; 7] {
    [
        &CONFLICT,
        &EMOTION,
        &SUSPENSE,
        &CONTRAST,
        &TURNING_POINT,
        &PROGRESSIVE,
        &FILLER,
    ]
}
