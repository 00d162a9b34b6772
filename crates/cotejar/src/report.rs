//! Diagnostic construction for failed verifications.
//!
//! The reporter only builds data. Printing, logging, or attaching the
//! payload to a test report is the caller's concern.

use crate::result::VerificationReport;
use crate::session::BrowserSession;

/// Stateless builder of [`VerificationReport`] payloads.
#[derive(Debug, Clone, Copy)]
pub struct VerificationReporter;

impl VerificationReporter {
    /// Build a report for a failed comparison, capturing the session's
    /// current URL and title alongside the expected/actual delta.
    #[must_use]
    pub fn diagnose<S: BrowserSession + ?Sized>(
        session: &S,
        message: &str,
        expected: &str,
        actual: &str,
    ) -> VerificationReport {
        VerificationReport {
            message: message.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            url: session.current_url(),
            title: session.current_title(),
        }
    }

    /// Render a report as a JSON string, for callers that attach diagnostics
    /// to structured test output.
    #[must_use]
    pub fn to_json(report: &VerificationReport) -> String {
        serde_json::to_string(report).unwrap_or_else(|_| report.to_string())
    }
}
