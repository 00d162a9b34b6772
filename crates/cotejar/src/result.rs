//! Result and error types for Cotejar.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for Cotejar operations
pub type CotejarResult<T> = Result<T, CotejarError>;

/// What the wait loop last observed about an element that never became ready.
///
/// Carried inside [`CotejarError::Timeout`] so a failed wait says *why* the
/// predicate never held, not just that it didn't.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaitBlocker {
    /// No strategy resolved any element
    Absent,
    /// Element resolved but was not displayed
    NotVisible,
    /// Element resolved and displayed but disabled
    Disabled,
}

impl std::fmt::Display for WaitBlocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Absent => "element absent",
            Self::NotVisible => "present but not visible",
            Self::Disabled => "present but disabled",
        };
        write!(f, "{s}")
    }
}

/// Diagnostic payload for a failed verification.
///
/// Built by [`crate::report::VerificationReporter`]; carries the
/// expected/actual delta plus the page context at the moment of failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Human-readable description of what was being verified
    pub message: String,
    /// Expected value
    pub expected: String,
    /// Observed value
    pub actual: String,
    /// URL of the page at failure time
    pub url: String,
    /// Title of the page at failure time
    pub title: String,
}

impl std::fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: expected '{}', got '{}' (url: {}, title: {})",
            self.message, self.expected, self.actual, self.url, self.title
        )
    }
}

/// Errors that can occur in Cotejar
#[derive(Debug, Error)]
pub enum CotejarError {
    /// Wait predicate never satisfied within the deadline
    #[error("timed out after {ms}ms waiting for {predicate} ({blocker})")]
    Timeout {
        /// Predicate that was being waited on (e.g. "clickable input[type='number']")
        predicate: String,
        /// Last-seen reason the predicate did not hold
        blocker: WaitBlocker,
        /// Wait budget in milliseconds
        ms: u64,
    },

    /// Navigation did not land on the expected page
    #[error("navigation to {url} failed: {message}")]
    Navigation {
        /// URL that was requested
        url: String,
        /// What went wrong (ready locator never appeared, URL mismatch, ...)
        message: String,
    },

    /// A verified write still mismatched after the one-shot retry
    #[error("input mismatch after retry: expected '{expected}', field reads '{actual}'")]
    InputMismatch {
        /// Value the write was supposed to leave in the field
        expected: String,
        /// Value the readback actually observed
        actual: String,
    },

    /// A field still held residue after clear and one retry
    #[error("clear failed after retry: field still reads '{residual}'")]
    Clear {
        /// Value left in the field after both clear attempts
        residual: String,
    },

    /// Assertion mismatch, enriched with page context
    #[error("verification failed: {0}")]
    Verification(VerificationReport),

    /// A selector resolved to more than one live element
    #[error("locator '{selector}' matched {matched} elements, expected exactly 1")]
    LocatorAmbiguity {
        /// Selector that over-matched
        selector: String,
        /// Number of elements it resolved to
        matched: usize,
    },

    /// Logical field name not registered on the page session
    #[error("unknown field '{field}' for this page")]
    UnknownField {
        /// Field name that was requested
        field: String,
    },

    /// Fault reported by the underlying browser-session provider
    #[error("browser session error: {message}")]
    Driver {
        /// Provider's error message
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    mod wait_blocker_tests {
        use super::*;

        #[test]
        fn test_blocker_display() {
            assert_eq!(WaitBlocker::Absent.to_string(), "element absent");
            assert_eq!(WaitBlocker::NotVisible.to_string(), "present but not visible");
            assert_eq!(WaitBlocker::Disabled.to_string(), "present but disabled");
        }

        #[test]
        fn test_blocker_equality() {
            assert_eq!(WaitBlocker::Absent, WaitBlocker::Absent);
            assert_ne!(WaitBlocker::Absent, WaitBlocker::Disabled);
        }
    }

    mod error_display_tests {
        use super::*;

        #[test]
        fn test_timeout_carries_predicate_and_blocker() {
            let err = CotejarError::Timeout {
                predicate: "clickable input[type='number']".to_string(),
                blocker: WaitBlocker::Disabled,
                ms: 15_000,
            };
            let msg = err.to_string();
            assert!(msg.contains("15000ms"));
            assert!(msg.contains("clickable input[type='number']"));
            assert!(msg.contains("present but disabled"));
        }

        #[test]
        fn test_input_mismatch_carries_both_values() {
            let err = CotejarError::InputMismatch {
                expected: "123".to_string(),
                actual: String::new(),
            };
            let msg = err.to_string();
            assert!(msg.contains("'123'"));
            assert!(msg.contains("''"));
        }

        #[test]
        fn test_ambiguity_reports_count() {
            let err = CotejarError::LocatorAmbiguity {
                selector: "h3".to_string(),
                matched: 4,
            };
            assert!(err.to_string().contains("matched 4 elements"));
        }
    }

    mod verification_report_tests {
        use super::*;

        #[test]
        fn test_report_display_includes_context() {
            let report = VerificationReport {
                message: "field value".to_string(),
                expected: "456".to_string(),
                actual: "123".to_string(),
                url: "https://the-internet.herokuapp.com/inputs".to_string(),
                title: "The Internet".to_string(),
            };
            let msg = report.to_string();
            assert!(msg.contains("expected '456'"));
            assert!(msg.contains("got '123'"));
            assert!(msg.contains("/inputs"));
            assert!(msg.contains("The Internet"));
        }

        #[test]
        fn test_report_round_trips_through_json() {
            let report = VerificationReport {
                message: "m".to_string(),
                expected: "e".to_string(),
                actual: "a".to_string(),
                url: "u".to_string(),
                title: "t".to_string(),
            };
            let json = serde_json::to_string(&report).unwrap();
            let back: VerificationReport = serde_json::from_str(&json).unwrap();
            assert_eq!(report, back);
        }
    }
}
