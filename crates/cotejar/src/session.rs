//! Abstract browser-session provider trait.
//!
//! Cotejar drives a browser it does not own: launching a binary, provisioning
//! a driver, and tearing the session down are the caller's business. This
//! module defines the narrow surface the harness needs from whatever backend
//! provides the session, so implementations can be swapped (WebDriver bridge,
//! CDP client, or the scripted [`crate::mock::MockBrowserSession`]).

use crate::locator::Selector;
use crate::result::CotejarResult;

/// Opaque reference to a DOM node, minted by the provider.
///
/// Valid only until the underlying node is destroyed or re-rendered; the
/// harness never holds one across operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef(String);

impl ElementRef {
    /// Create an element reference from a provider-assigned id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The provider-assigned id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// The browser-session surface consumed by the harness.
///
/// All calls are synchronous and blocking. One session is a single-writer
/// resource: callers must not invoke two mutating operations concurrently on
/// the same session.
pub trait BrowserSession {
    /// Issue a navigation to `url`. Returns once the navigation is dispatched;
    /// page readiness is the harness's job to verify.
    fn navigate_to(&self, url: &str) -> CotejarResult<()>;

    /// All live elements matching `selector`, in document order. Empty vec
    /// means no match (not an error).
    fn find_elements(&self, selector: &Selector) -> CotejarResult<Vec<ElementRef>>;

    /// Current value of attribute `name` on `element`, `None` if unset.
    fn attribute(&self, element: &ElementRef, name: &str) -> CotejarResult<Option<String>>;

    /// Type `text` into `element` (appends to existing content).
    fn send_input(&self, element: &ElementRef, text: &str) -> CotejarResult<()>;

    /// Clear the editable content of `element`.
    fn clear_input(&self, element: &ElementRef) -> CotejarResult<()>;

    /// Whether `element` is rendered and visible.
    fn is_displayed(&self, element: &ElementRef) -> CotejarResult<bool>;

    /// Whether `element` accepts interaction.
    fn is_enabled(&self, element: &ElementRef) -> CotejarResult<bool>;

    /// URL the session is currently on.
    fn current_url(&self) -> String;

    /// Title of the current document.
    fn current_title(&self) -> String;
}
