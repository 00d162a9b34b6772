//! The interaction operation set: navigate, type, clear, read, assert.
//!
//! The engine's distinguishing behavior is that mutations are *verified*, not
//! assumed. Browser form controls may not reflect a synchronous write
//! (debounced handlers, masked inputs), so after every write or clear the
//! engine reads the field back and compares. A mismatched readback earns
//! exactly one silent retry of the full cycle, fresh resolution included,
//! before failing with the expected/actual delta. One retry, never more:
//! a second failure is signal, and masking it would turn a broken page into
//! a false green.
//!
//! Per-field state machine across a scenario:
//! `Unknown → Populated(v) → Empty → Populated(v') → …`, where every claimed
//! transition is backed by an observed readback.

use crate::locator::Locator;
use crate::report::VerificationReporter;
use crate::result::{CotejarError, CotejarResult};
use crate::session::BrowserSession;
use crate::sync::{ElementHandle, ReadyPredicate, SyncPolicy};
use tracing::{debug, warn};

/// The uniform shape every mutating/verifying attempt reduces to internally.
///
/// The public operations translate this into `Result`; the struct exists so
/// the retry branch works on plain data instead of catching errors.
#[derive(Debug, Clone)]
pub struct InteractionResult {
    /// Whether the attempt's readback confirmed the intended state
    pub success: bool,
    /// Value the readback observed, if a readback happened
    pub observed_value: Option<String>,
    /// Description of the mismatch, if any
    pub error: Option<String>,
}

impl InteractionResult {
    fn confirmed(observed: String) -> Self {
        Self {
            success: true,
            observed_value: Some(observed),
            error: None,
        }
    }

    fn mismatched(observed: String, error: String) -> Self {
        Self {
            success: false,
            observed_value: Some(observed),
            error: Some(error),
        }
    }
}

/// Synchronized, verifying operation set over one browser session.
///
/// Holds the session by reference; owns no browser lifecycle. Operations are
/// strictly ordered — the session is a single-writer resource and callers
/// must not run two operations concurrently against it.
#[derive(Debug)]
pub struct InteractionEngine<'a, S: BrowserSession + ?Sized> {
    session: &'a S,
    policy: SyncPolicy,
}

impl<'a, S: BrowserSession + ?Sized> InteractionEngine<'a, S> {
    /// Create an engine over an externally owned session
    #[must_use]
    pub fn new(session: &'a S, policy: SyncPolicy) -> Self {
        Self { session, policy }
    }

    /// The policy governing this engine's waits
    #[must_use]
    pub fn policy(&self) -> &SyncPolicy {
        &self.policy
    }

    /// The underlying session
    #[must_use]
    pub fn session(&self) -> &S {
        self.session
    }

    /// Navigate to `url`, wait for `ready` to be present within the
    /// page-load budget, and verify the landing URL contains
    /// `expected_path`.
    ///
    /// Never retried: a failed navigation surfaces immediately. The URL
    /// check defends against silent redirects — the ready locator appearing
    /// on the wrong page is not success.
    pub fn navigate(&self, url: &str, ready: &Locator, expected_path: &str) -> CotejarResult<()> {
        debug!(url, "navigating");
        self.session.navigate_to(url)?;

        match self.policy.wait_for_page_ready(self.session, ready) {
            Ok(_) => {}
            Err(err @ CotejarError::Timeout { .. }) => {
                return Err(CotejarError::Navigation {
                    url: url.to_string(),
                    message: format!("ready locator never appeared: {err}"),
                })
            }
            Err(other) => return Err(other),
        }

        let landed = self.session.current_url();
        if !landed.contains(expected_path) {
            return Err(CotejarError::Navigation {
                url: url.to_string(),
                message: format!("landed on '{landed}', expected path containing '{expected_path}'"),
            });
        }
        debug!(url = %landed, "navigation confirmed");
        Ok(())
    }

    /// Clear the field, write `text`, and verify by readback. One silent
    /// retry of the whole cycle on mismatch, then
    /// [`CotejarError::InputMismatch`].
    pub fn set_value(&self, locator: &Locator, text: &str) -> CotejarResult<()> {
        let first = self.write_attempt(locator, text)?;
        if first.success {
            return Ok(());
        }
        warn!(
            locator = %locator,
            observed = first.observed_value.as_deref().unwrap_or(""),
            "write readback mismatched, retrying once"
        );

        let second = self.write_attempt(locator, text)?;
        if second.success {
            return Ok(());
        }
        Err(CotejarError::InputMismatch {
            expected: text.to_string(),
            actual: second.observed_value.unwrap_or_default(),
        })
    }

    /// Clear the field and verify the readback is empty. One silent retry on
    /// residue, then [`CotejarError::Clear`].
    pub fn clear(&self, locator: &Locator) -> CotejarResult<()> {
        let first = self.clear_attempt(locator)?;
        if first.success {
            return Ok(());
        }
        warn!(
            locator = %locator,
            residual = first.observed_value.as_deref().unwrap_or(""),
            "clear left residue, retrying once"
        );

        let second = self.clear_attempt(locator)?;
        if second.success {
            return Ok(());
        }
        Err(CotejarError::Clear {
            residual: second.observed_value.unwrap_or_default(),
        })
    }

    /// Read the field's current `value` attribute.
    ///
    /// Waits for presence only — reading must not require interactability. A
    /// missing attribute normalizes to the empty string, never null.
    pub fn read_value(&self, locator: &Locator) -> CotejarResult<String> {
        let handle = self.policy.wait_for(self.session, locator, ReadyPredicate::Present)?;
        self.readback(&handle)
    }

    /// Assert the field reads back empty; on residue, raise a verification
    /// failure enriched with page context.
    pub fn assert_empty(&self, locator: &Locator) -> CotejarResult<()> {
        let actual = self.read_value(locator)?;
        if actual.is_empty() {
            return Ok(());
        }
        Err(CotejarError::Verification(VerificationReporter::diagnose(
            self.session,
            &format!("field {locator} should be empty"),
            "",
            &actual,
        )))
    }

    /// Assert the field reads back exactly `expected` (string equality is
    /// authoritative — no numeric coercion).
    pub fn assert_equals(&self, locator: &Locator, expected: &str) -> CotejarResult<()> {
        let actual = self.read_value(locator)?;
        if actual == expected {
            return Ok(());
        }
        Err(CotejarError::Verification(VerificationReporter::diagnose(
            self.session,
            &format!("field {locator} value"),
            expected,
            &actual,
        )))
    }

    /// Assert the field's declared `type` attribute equals `expected_type`
    /// literally; behavior is not inferred.
    pub fn assert_field_type(&self, locator: &Locator, expected_type: &str) -> CotejarResult<()> {
        let handle = self.policy.wait_for(self.session, locator, ReadyPredicate::Present)?;
        let actual = self
            .session
            .attribute(&handle.element, "type")?
            .unwrap_or_default();
        if actual == expected_type {
            return Ok(());
        }
        Err(CotejarError::Verification(VerificationReporter::diagnose(
            self.session,
            &format!("field {locator} declared type"),
            expected_type,
            &actual,
        )))
    }

    /// One full clear+write+readback cycle against a freshly resolved
    /// element.
    fn write_attempt(&self, locator: &Locator, text: &str) -> CotejarResult<InteractionResult> {
        let handle = self.policy.wait_for(self.session, locator, ReadyPredicate::Clickable)?;
        self.session.clear_input(&handle.element)?;
        self.session.send_input(&handle.element, text)?;

        let observed = self.readback(&handle)?;
        if observed == text {
            debug!(locator = %locator, value = text, "write confirmed");
            Ok(InteractionResult::confirmed(observed))
        } else {
            Ok(InteractionResult::mismatched(
                observed.clone(),
                format!("wrote '{text}', field reads '{observed}'"),
            ))
        }
    }

    /// One clear+readback cycle against a freshly resolved element.
    fn clear_attempt(&self, locator: &Locator) -> CotejarResult<InteractionResult> {
        let handle = self.policy.wait_for(self.session, locator, ReadyPredicate::Clickable)?;
        self.session.clear_input(&handle.element)?;

        let observed = self.readback(&handle)?;
        if observed.is_empty() {
            debug!(locator = %locator, "clear confirmed");
            Ok(InteractionResult::confirmed(observed))
        } else {
            Ok(InteractionResult::mismatched(
                observed.clone(),
                format!("cleared, field still reads '{observed}'"),
            ))
        }
    }

    fn readback(&self, handle: &ElementHandle) -> CotejarResult<String> {
        Ok(self
            .session
            .attribute(&handle.element, "value")?
            .unwrap_or_default())
    }
}
