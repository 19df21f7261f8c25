//! Dimension analyzers.
//!
//! Each analyzer starts from full marks and applies three tiered
//! deductions, recording one [`Issue`](crate::model::Issue) per deduction:
//!
//! | dimension  | max | sub-checks                               |
//! |------------|-----|------------------------------------------|
//! | rhythm     | 35  | opening density, middle pacing, density  |
//! | emotion    | 35  | turning points, progression, variety     |
//! | retention  | 30  | opening hook, mid-script hooks, payoff   |

pub mod emotion;
pub mod retention;
pub mod rhythm;

pub use emotion::analyze_emotion_curve;
pub use retention::analyze_retention_triggers;
pub use rhythm::analyze_rhythm;

use crate::text;

/// Characters treated as "the first five seconds" or "the last beat".
pub(crate) const EDGE_SPAN_CHARS: usize = 50;

/// The opening span of a script.
pub(crate) fn opening(script: &str) -> &str {
    text::head(script, EDGE_SPAN_CHARS)
}

/// The closing span of a script.
pub(crate) fn closing(script: &str) -> &str {
    text::tail(script, EDGE_SPAN_CHARS)
}

/// An opening fragment short enough to quote as evidence.
pub(crate) fn opening_quote(script: &str) -> &str {
    text::head(opening(script), crate::model::MAX_EVIDENCE_CHARS)
}
