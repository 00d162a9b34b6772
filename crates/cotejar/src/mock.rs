//! Scripted in-memory browser session for exercising the harness without a
//! browser.
//!
//! The point is to test the *actual* harness code paths (waits, readback
//! verification, bounded retries) in a controlled environment, so the mock
//! can be scripted with the failure modes a real page exhibits: elements that
//! render late, fields that silently drop writes (debounced or masked
//! inputs), clears that need a second attempt, selectors that over-match,
//! and navigations that redirect elsewhere.
//!
//! Elements are keyed by the raw selector text; any strategy whose raw text
//! matches an installed element resolves to it.

use crate::locator::Selector;
use crate::result::{CotejarError, CotejarResult};
use crate::session::{BrowserSession, ElementRef};
use std::collections::HashMap;
use std::sync::Mutex;

/// Always-on sentinel for scripted misbehavior counters
const ALWAYS: u32 = u32::MAX;

#[derive(Debug, Clone)]
struct MockElement {
    /// Current `value` attribute; `None` models an element without one
    value: Option<String>,
    /// Declared `type` attribute
    field_type: Option<String>,
    displayed: bool,
    enabled: bool,
    /// Number of find calls to swallow before the element "renders"
    appears_after: u32,
    find_calls: u32,
    /// How many refs a find resolves to (>=2 scripts ambiguity)
    match_count: usize,
    /// Remaining writes to silently drop
    drop_writes_remaining: u32,
    /// Remaining clears to silently ignore
    refuse_clear_remaining: u32,
    write_attempts: usize,
    clear_attempts: usize,
    /// If set, any find against this selector fails with a driver error
    driver_fault: Option<String>,
}

impl MockElement {
    fn new(value: Option<String>) -> Self {
        Self {
            value,
            field_type: None,
            displayed: true,
            enabled: true,
            appears_after: 0,
            find_calls: 0,
            match_count: 1,
            drop_writes_remaining: 0,
            refuse_clear_remaining: 0,
            write_attempts: 0,
            clear_attempts: 0,
            driver_fault: None,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    elements: HashMap<String, MockElement>,
    url: String,
    title: String,
    redirects: HashMap<String, String>,
    navigations: Vec<String>,
}

/// Scripted [`BrowserSession`] implementation.
///
/// Interior-mutable so it satisfies the `&self` provider surface while the
/// scenario mutates scripted state between steps.
#[derive(Debug, Default)]
pub struct MockBrowserSession {
    inner: Mutex<Inner>,
}

impl MockBrowserSession {
    /// Create an empty session (no elements, blank page)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a form field with a `value` attribute under `selector`
    pub fn install_field(&self, selector: &str, value: &str) {
        self.lock()
            .elements
            .insert(selector.to_string(), MockElement::new(Some(value.to_string())));
    }

    /// Install an element that has no `value` attribute at all
    pub fn install_element(&self, selector: &str) {
        self.lock()
            .elements
            .insert(selector.to_string(), MockElement::new(None));
    }

    /// Set the declared `type` attribute of an installed element
    pub fn set_field_type(&self, selector: &str, field_type: &str) {
        self.with_element(selector, |el| el.field_type = Some(field_type.to_string()));
    }

    /// Script visibility of an installed element
    pub fn set_displayed(&self, selector: &str, displayed: bool) {
        self.with_element(selector, |el| el.displayed = displayed);
    }

    /// Script enabledness of an installed element
    pub fn set_enabled(&self, selector: &str, enabled: bool) {
        self.with_element(selector, |el| el.enabled = enabled);
    }

    /// Element only resolves after `n` find calls against its selector
    pub fn set_appears_after(&self, selector: &str, n: u32) {
        self.with_element(selector, |el| el.appears_after = n);
    }

    /// Script the selector to over-match `n` elements
    pub fn set_match_count(&self, selector: &str, n: usize) {
        self.with_element(selector, |el| el.match_count = n);
    }

    /// Every write to this field is silently dropped
    pub fn drop_writes(&self, selector: &str) {
        self.with_element(selector, |el| el.drop_writes_remaining = ALWAYS);
    }

    /// The next `n` writes to this field are silently dropped
    pub fn drop_writes_times(&self, selector: &str, n: u32) {
        self.with_element(selector, |el| el.drop_writes_remaining = n);
    }

    /// Every clear of this field is silently ignored
    pub fn refuse_clear(&self, selector: &str) {
        self.with_element(selector, |el| el.refuse_clear_remaining = ALWAYS);
    }

    /// The next `n` clears of this field are silently ignored
    pub fn refuse_clear_times(&self, selector: &str, n: u32) {
        self.with_element(selector, |el| el.refuse_clear_remaining = n);
    }

    /// Any find against this selector fails with a driver fault
    pub fn set_driver_fault(&self, selector: &str, message: &str) {
        self.with_element(selector, |el| el.driver_fault = Some(message.to_string()));
    }

    /// Script a redirect: navigating to `from` lands on `to`
    pub fn set_redirect(&self, from: &str, to: &str) {
        self.lock().redirects.insert(from.to_string(), to.to_string());
    }

    /// Set the current document title
    pub fn set_title(&self, title: &str) {
        self.lock().title = title.to_string();
    }

    /// Number of `send_input` calls the field has received
    #[must_use]
    pub fn write_attempts(&self, selector: &str) -> usize {
        self.lock().elements.get(selector).map_or(0, |el| el.write_attempts)
    }

    /// Number of `clear_input` calls the field has received
    #[must_use]
    pub fn clear_attempts(&self, selector: &str) -> usize {
        self.lock().elements.get(selector).map_or(0, |el| el.clear_attempts)
    }

    /// Every URL navigated to, in order
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.lock().navigations.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("mock session state poisoned")
    }

    fn with_element(&self, selector: &str, f: impl FnOnce(&mut MockElement)) {
        let mut inner = self.lock();
        let el = inner
            .elements
            .get_mut(selector)
            .unwrap_or_else(|| panic!("mock element '{selector}' not installed"));
        f(el);
    }
}

impl BrowserSession for MockBrowserSession {
    fn navigate_to(&self, url: &str) -> CotejarResult<()> {
        let mut inner = self.lock();
        inner.navigations.push(url.to_string());
        inner.url = inner.redirects.get(url).cloned().unwrap_or_else(|| url.to_string());
        Ok(())
    }

    fn find_elements(&self, selector: &Selector) -> CotejarResult<Vec<ElementRef>> {
        let mut inner = self.lock();
        let key = selector.raw().to_string();
        let Some(el) = inner.elements.get_mut(&key) else {
            return Ok(Vec::new());
        };
        if let Some(message) = &el.driver_fault {
            return Err(CotejarError::Driver {
                message: message.clone(),
            });
        }
        el.find_calls += 1;
        if el.find_calls <= el.appears_after {
            return Ok(Vec::new());
        }
        Ok((0..el.match_count).map(|_| ElementRef::new(&key)).collect())
    }

    fn attribute(&self, element: &ElementRef, name: &str) -> CotejarResult<Option<String>> {
        let inner = self.lock();
        let el = inner.elements.get(element.id());
        Ok(el.and_then(|el| match name {
            "value" => el.value.clone(),
            "type" => el.field_type.clone(),
            _ => None,
        }))
    }

    fn send_input(&self, element: &ElementRef, text: &str) -> CotejarResult<()> {
        let mut inner = self.lock();
        if let Some(el) = inner.elements.get_mut(element.id()) {
            el.write_attempts += 1;
            if el.drop_writes_remaining > 0 {
                if el.drop_writes_remaining != ALWAYS {
                    el.drop_writes_remaining -= 1;
                }
                return Ok(());
            }
            match &mut el.value {
                Some(value) => value.push_str(text),
                None => el.value = Some(text.to_string()),
            }
        }
        Ok(())
    }

    fn clear_input(&self, element: &ElementRef) -> CotejarResult<()> {
        let mut inner = self.lock();
        if let Some(el) = inner.elements.get_mut(element.id()) {
            el.clear_attempts += 1;
            if el.refuse_clear_remaining > 0 {
                if el.refuse_clear_remaining != ALWAYS {
                    el.refuse_clear_remaining -= 1;
                }
                return Ok(());
            }
            if let Some(value) = &mut el.value {
                value.clear();
            }
        }
        Ok(())
    }

    fn is_displayed(&self, element: &ElementRef) -> CotejarResult<bool> {
        Ok(self.lock().elements.get(element.id()).is_some_and(|el| el.displayed))
    }

    fn is_enabled(&self, element: &ElementRef) -> CotejarResult<bool> {
        Ok(self.lock().elements.get(element.id()).is_some_and(|el| el.enabled))
    }

    fn current_url(&self) -> String {
        self.lock().url.clone()
    }

    fn current_title(&self) -> String {
        self.lock().title.clone()
    }
}
