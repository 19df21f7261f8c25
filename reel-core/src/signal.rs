//! Signal counting over text spans.

use crate::lexicon::{Lexicon, Pattern};

/// Number of patterns that match `span` at least once.
///
/// A pattern contributes at most 1 no matter how often it repeats.
pub fn count_signals(span: &str, patterns: &[Pattern]) -> usize {
    patterns.iter().filter(|p| p.matches_in(span)).count()
}

/// Whether any pattern matches `span`.
pub fn any_signal(span: &str, patterns: &[Pattern]) -> bool {
    patterns.iter().any(|p| p.matches_in(span))
}

/// `1` if any pattern matches, else `0`.
pub fn flag(span: &str, patterns: &[Pattern]) -> usize {
    usize::from(any_signal(span, patterns))
}

impl Lexicon {
    /// Shorthand for [`count_signals`] over the whole lexicon.
    pub fn count_in(&self, span: &str) -> usize {
        count_signals(span, self.entries)
    }

    /// Shorthand for [`any_signal`] over the whole lexicon.
    pub fn any_in(&self, span: &str) -> bool {
        any_signal(span, self.entries)
    }
}
