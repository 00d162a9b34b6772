//! Synchronization policy and the element wait loop.
//!
//! Every interaction passes through [`SyncPolicy::wait_for`] before touching
//! an element. The wait is a bounded sleep-and-recheck poll, not parallelism:
//! resolve the locator, test the readiness predicate, sleep, repeat until the
//! deadline. This is the single point that absorbs rendering latency.
//!
//! A wait that exhausts its deadline fails with the *last-seen* blocker
//! (absent / not visible / disabled), so a timeout tells you what the page
//! looked like, not just that time ran out.

use crate::locator::{Locator, Selector};
use crate::result::{CotejarError, CotejarResult, WaitBlocker};
use crate::session::{BrowserSession, ElementRef};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default element wait budget (15 seconds)
pub const DEFAULT_ELEMENT_TIMEOUT_MS: u64 = 15_000;

/// Default page-load wait budget (30 seconds)
pub const DEFAULT_PAGE_LOAD_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Readiness predicate applied to a resolved element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadyPredicate {
    /// Element exists in the DOM
    Present,
    /// Present and displayed
    Visible,
    /// Present, displayed, and enabled
    Clickable,
}

impl std::fmt::Display for ReadyPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Present => "present",
            Self::Visible => "visible",
            Self::Clickable => "clickable",
        };
        write!(f, "{s}")
    }
}

/// A resolved, live element reference for the duration of one operation.
///
/// Produced by the wait loop and consumed immediately; never stored across
/// operations, since the underlying node may be destroyed and recreated
/// between them.
#[derive(Debug, Clone)]
pub struct ElementHandle {
    /// Provider reference to the resolved node
    pub element: ElementRef,
    /// The selector alternative that won resolution
    pub resolved_by: Selector,
}

/// Timeout and polling configuration governing all waits.
///
/// All durations must be positive: the setters panic on zero and
/// deserialization rejects it, so a constructed policy always has usable
/// budgets. `element_timeout` and `page_load_timeout` are independent
/// budgets; neither bounds the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SyncPolicyRepr")]
pub struct SyncPolicy {
    element_timeout_ms: u64,
    page_load_timeout_ms: u64,
    poll_interval_ms: u64,
}

/// Unvalidated wire shape for [`SyncPolicy`]; absent keys take defaults
#[derive(Debug, Deserialize)]
#[serde(default)]
struct SyncPolicyRepr {
    element_timeout_ms: u64,
    page_load_timeout_ms: u64,
    poll_interval_ms: u64,
}

impl Default for SyncPolicyRepr {
    fn default() -> Self {
        Self {
            element_timeout_ms: DEFAULT_ELEMENT_TIMEOUT_MS,
            page_load_timeout_ms: DEFAULT_PAGE_LOAD_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl TryFrom<SyncPolicyRepr> for SyncPolicy {
    type Error = String;

    fn try_from(repr: SyncPolicyRepr) -> Result<Self, Self::Error> {
        for (name, ms) in [
            ("element_timeout_ms", repr.element_timeout_ms),
            ("page_load_timeout_ms", repr.page_load_timeout_ms),
            ("poll_interval_ms", repr.poll_interval_ms),
        ] {
            if ms == 0 {
                return Err(format!("{name} must be positive"));
            }
        }
        Ok(Self {
            element_timeout_ms: repr.element_timeout_ms,
            page_load_timeout_ms: repr.page_load_timeout_ms,
            poll_interval_ms: repr.poll_interval_ms,
        })
    }
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            element_timeout_ms: DEFAULT_ELEMENT_TIMEOUT_MS,
            page_load_timeout_ms: DEFAULT_PAGE_LOAD_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl SyncPolicy {
    /// Create a policy with default timeouts
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the element wait budget in milliseconds.
    ///
    /// # Panics
    /// Panics if `ms` is zero.
    #[must_use]
    pub const fn with_element_timeout(mut self, ms: u64) -> Self {
        assert!(ms > 0, "element timeout must be positive");
        self.element_timeout_ms = ms;
        self
    }

    /// Set the page-load wait budget in milliseconds.
    ///
    /// # Panics
    /// Panics if `ms` is zero.
    #[must_use]
    pub const fn with_page_load_timeout(mut self, ms: u64) -> Self {
        assert!(ms > 0, "page load timeout must be positive");
        self.page_load_timeout_ms = ms;
        self
    }

    /// Set the polling interval in milliseconds.
    ///
    /// # Panics
    /// Panics if `ms` is zero.
    #[must_use]
    pub const fn with_poll_interval(mut self, ms: u64) -> Self {
        assert!(ms > 0, "poll interval must be positive");
        self.poll_interval_ms = ms;
        self
    }

    /// Element wait budget as a Duration
    #[must_use]
    pub const fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    /// Page-load wait budget as a Duration
    #[must_use]
    pub const fn page_load_timeout(&self) -> Duration {
        Duration::from_millis(self.page_load_timeout_ms)
    }

    /// Polling interval as a Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Wait until `locator` resolves to exactly one element satisfying
    /// `predicate`, within the element budget.
    pub fn wait_for<S: BrowserSession + ?Sized>(
        &self,
        session: &S,
        locator: &Locator,
        predicate: ReadyPredicate,
    ) -> CotejarResult<ElementHandle> {
        self.wait_with_budget(session, locator, predicate, self.element_timeout_ms)
    }

    /// Wait for a page-ready locator to be present, within the page-load
    /// budget. Used after navigation.
    pub fn wait_for_page_ready<S: BrowserSession + ?Sized>(
        &self,
        session: &S,
        ready: &Locator,
    ) -> CotejarResult<ElementHandle> {
        self.wait_with_budget(session, ready, ReadyPredicate::Present, self.page_load_timeout_ms)
    }

    fn wait_with_budget<S: BrowserSession + ?Sized>(
        &self,
        session: &S,
        locator: &Locator,
        predicate: ReadyPredicate,
        budget_ms: u64,
    ) -> CotejarResult<ElementHandle> {
        let start = Instant::now();
        let budget = Duration::from_millis(budget_ms);
        let mut last_blocker = WaitBlocker::Absent;

        loop {
            match probe(session, locator, predicate)? {
                Probe::Ready(handle) => {
                    debug!(
                        locator = %locator,
                        predicate = %predicate,
                        elapsed = ?start.elapsed(),
                        "wait satisfied"
                    );
                    return Ok(handle);
                }
                Probe::Blocked(blocker) => last_blocker = blocker,
            }

            if start.elapsed() >= budget {
                debug!(locator = %locator, predicate = %predicate, blocker = %last_blocker, "wait timed out");
                return Err(CotejarError::Timeout {
                    predicate: format!("{predicate} {locator}"),
                    blocker: last_blocker,
                    ms: budget_ms,
                });
            }
            std::thread::sleep(self.poll_interval());
        }
    }
}

/// Outcome of one poll iteration
enum Probe {
    Ready(ElementHandle),
    Blocked(WaitBlocker),
}

/// Resolve `locator` once and test `predicate` against the result.
///
/// Alternatives are tried in order; the first one matching anything decides
/// the outcome. More than one match is ambiguity and escalates immediately:
/// for a fixed DOM it is deterministic, so waiting cannot fix it.
fn probe<S: BrowserSession + ?Sized>(
    session: &S,
    locator: &Locator,
    predicate: ReadyPredicate,
) -> CotejarResult<Probe> {
    for selector in locator.alternatives() {
        let matches = session.find_elements(selector)?;
        match matches.as_slice() {
            [] => continue,
            [element] => return check_predicate(session, element.clone(), selector, predicate),
            many => {
                return Err(CotejarError::LocatorAmbiguity {
                    selector: selector.to_string(),
                    matched: many.len(),
                })
            }
        }
    }
    Ok(Probe::Blocked(WaitBlocker::Absent))
}

fn check_predicate<S: BrowserSession + ?Sized>(
    session: &S,
    element: ElementRef,
    selector: &Selector,
    predicate: ReadyPredicate,
) -> CotejarResult<Probe> {
    if matches!(predicate, ReadyPredicate::Visible | ReadyPredicate::Clickable)
        && !session.is_displayed(&element)?
    {
        return Ok(Probe::Blocked(WaitBlocker::NotVisible));
    }
    if matches!(predicate, ReadyPredicate::Clickable) && !session.is_enabled(&element)? {
        return Ok(Probe::Blocked(WaitBlocker::Disabled));
    }
    Ok(Probe::Ready(ElementHandle {
        element,
        resolved_by: selector.clone(),
    }))
}
