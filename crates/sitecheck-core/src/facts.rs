//! Fact-check outcome types.
//!
//! A fact (address, hours, or phone) checked against a page ends in exactly
//! one of four states, instead of the loose found/match boolean pairs the
//! wire formats use. `Undetermined` specifically means "could not check",
//! which is distinct from "checked and absent".

/// Outcome of checking one fact against extracted page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactStatus {
    /// The fact's category appears on the page and agrees with the record.
    Matched,
    /// The fact's category appears on the page but disagrees with the record.
    FoundOnly,
    /// The fact's category does not appear on the page.
    NotFound,
    /// The check could not be performed (fetch failure, matcher failure,
    /// or the fact was not attempted by the configured matcher).
    Undetermined,
}

impl FactStatus {
    /// Build a status from nullable found/match flags, as returned by the
    /// external matcher.
    ///
    /// Enforces the invariant that a fact cannot match unless it was found:
    /// a `true` match flag paired with a non-`true` found flag is coerced to
    /// the found flag's state, discarding the match claim.
    #[must_use]
    pub fn from_flags(found: Option<bool>, matched: Option<bool>) -> Self {
        match found {
            Some(true) => {
                if matched.unwrap_or(false) {
                    FactStatus::Matched
                } else {
                    FactStatus::FoundOnly
                }
            }
            Some(false) => FactStatus::NotFound,
            None => FactStatus::Undetermined,
        }
    }

    /// Nullable "was the fact's category found on the page" flag.
    #[must_use]
    pub fn is_found(self) -> Option<bool> {
        match self {
            FactStatus::Matched | FactStatus::FoundOnly => Some(true),
            FactStatus::NotFound => Some(false),
            FactStatus::Undetermined => None,
        }
    }

    /// Nullable "did the found instance agree with the record" flag.
    #[must_use]
    pub fn is_match(self) -> Option<bool> {
        match self {
            FactStatus::Matched => Some(true),
            FactStatus::FoundOnly | FactStatus::NotFound => Some(false),
            FactStatus::Undetermined => None,
        }
    }
}

/// A [`FactStatus`] plus an optional human-readable explanation.
///
/// The error string is set when the status is degraded (`NotFound` with a
/// reason, or `Undetermined` from a failure); it is `None` for clean
/// outcomes and for facts a matcher variant does not attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactCheck {
    pub status: FactStatus,
    pub error: Option<String>,
}

impl FactCheck {
    #[must_use]
    pub fn matched() -> Self {
        Self {
            status: FactStatus::Matched,
            error: None,
        }
    }

    #[must_use]
    pub fn found_only(error: impl Into<String>) -> Self {
        Self {
            status: FactStatus::FoundOnly,
            error: Some(error.into()),
        }
    }

    #[must_use]
    pub fn not_found(error: impl Into<String>) -> Self {
        Self {
            status: FactStatus::NotFound,
            error: Some(error.into()),
        }
    }

    /// A check that failed before a verdict could be reached.
    #[must_use]
    pub fn undetermined(error: impl Into<String>) -> Self {
        Self {
            status: FactStatus::Undetermined,
            error: Some(error.into()),
        }
    }

    /// A fact the configured matcher does not cover. Undetermined, but not
    /// a failure, so no error string.
    #[must_use]
    pub fn unattempted() -> Self {
        Self {
            status: FactStatus::Undetermined,
            error: None,
        }
    }

    /// Build a check from nullable wire flags plus an optional error,
    /// applying the [`FactStatus::from_flags`] coercion.
    #[must_use]
    pub fn from_flags(found: Option<bool>, matched: Option<bool>, error: Option<String>) -> Self {
        Self {
            status: FactStatus::from_flags(found, matched),
            error,
        }
    }

    #[must_use]
    pub fn is_found(&self) -> Option<bool> {
        self.status.is_found()
    }

    #[must_use]
    pub fn is_match(&self) -> Option<bool> {
        self.status.is_match()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_flags_found_and_matched() {
        assert_eq!(
            FactStatus::from_flags(Some(true), Some(true)),
            FactStatus::Matched
        );
    }

    #[test]
    fn from_flags_found_not_matched() {
        assert_eq!(
            FactStatus::from_flags(Some(true), Some(false)),
            FactStatus::FoundOnly
        );
    }

    #[test]
    fn from_flags_found_with_null_match_is_found_only() {
        assert_eq!(
            FactStatus::from_flags(Some(true), None),
            FactStatus::FoundOnly
        );
    }

    #[test]
    fn from_flags_coerces_match_without_found() {
        // A responder claiming "matched but not found" violates the
        // invariant; the match claim is discarded.
        assert_eq!(
            FactStatus::from_flags(Some(false), Some(true)),
            FactStatus::NotFound
        );
        assert_eq!(
            FactStatus::from_flags(None, Some(true)),
            FactStatus::Undetermined
        );
    }

    #[test]
    fn match_flag_never_true_without_found() {
        let all_flags = [Some(true), Some(false), None];
        for found in all_flags {
            for matched in all_flags {
                let status = FactStatus::from_flags(found, matched);
                if status.is_match() == Some(true) {
                    assert_eq!(status.is_found(), Some(true));
                }
            }
        }
    }

    #[test]
    fn undetermined_has_null_flags() {
        let check = FactCheck::undetermined("fetch failed");
        assert_eq!(check.is_found(), None);
        assert_eq!(check.is_match(), None);
        assert!(check.error.is_some());
    }

    #[test]
    fn unattempted_is_undetermined_without_error() {
        let check = FactCheck::unattempted();
        assert_eq!(check.status, FactStatus::Undetermined);
        assert!(check.error.is_none());
    }

    #[test]
    fn not_found_reports_false_match() {
        let check = FactCheck::not_found("postal code not in page text");
        assert_eq!(check.is_found(), Some(false));
        assert_eq!(check.is_match(), Some(false));
    }
}
