//! Fact matching: does the page text corroborate the location's facts?
//!
//! Two interchangeable implementations sit behind [`FactMatcher`]: the
//! AI-delegated matcher covering address, hours, and phone, and the
//! deterministic text matcher covering the address only. Which one runs is
//! a configuration choice, not a code path.

mod ai;
mod text;

pub use ai::AiMatcher;
pub use text::TextMatcher;

use sitecheck_core::{FactCheck, Location};

/// Per-fact outcome of checking one location against one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactReport {
    pub address: FactCheck,
    pub hours: FactCheck,
    pub phone: FactCheck,
}

impl FactReport {
    /// A report where no fact could be checked, with the same reason on each.
    #[must_use]
    pub fn undetermined(reason: &str) -> Self {
        Self {
            address: FactCheck::undetermined(reason),
            hours: FactCheck::undetermined(reason),
            phone: FactCheck::undetermined(reason),
        }
    }
}

/// The configured matcher implementation.
pub enum FactMatcher {
    Ai(AiMatcher),
    Text(TextMatcher),
}

impl FactMatcher {
    /// Check the location's facts against extracted page text.
    ///
    /// Never fails: matcher-side problems surface as undetermined facts
    /// with an error description on the report.
    pub async fn check(&self, location: &Location, page_text: &str) -> FactReport {
        match self {
            FactMatcher::Ai(matcher) => matcher.check(location, page_text).await,
            FactMatcher::Text(matcher) => matcher.check(location, page_text),
        }
    }
}
