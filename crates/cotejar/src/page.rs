//! Page session: logical field names over one page of the application.
//!
//! A [`PageSession`] composes a fixed `field name → Locator` map, a
//! page-ready locator, and the expected URL path segment for one logical
//! page, and forwards each operation to the [`InteractionEngine`]. It is
//! created once per scenario and discarded at scenario end; the browser
//! session it wraps is owned and provisioned externally.
//!
//! Operations return `Result<&Self>` so scenarios read as chains:
//!
//! ```ignore
//! page.open(&config.base_url)?
//!     .set_value("number", "123")?
//!     .assert_equals("number", "123")?
//!     .clear("number")?
//!     .assert_empty("number")?;
//! ```
//!
//! The chaining is for readability only (each call's result feeds the next
//! call's preconditions, not its return value) and the first error
//! propagates unmodified.

use crate::engine::InteractionEngine;
use crate::locator::Locator;
use crate::result::{CotejarError, CotejarResult};
use crate::session::BrowserSession;
use crate::sync::SyncPolicy;
use std::collections::HashMap;

/// Builder for [`PageSession`], fixing the locator map before use.
#[derive(Debug, Clone)]
pub struct PageSessionBuilder {
    ready: Locator,
    url_path: String,
    fields: HashMap<String, Locator>,
}

impl PageSessionBuilder {
    /// Start a builder from the page-ready locator (the element whose
    /// presence marks the page as loaded) and the path segment the landing
    /// URL must contain after navigation.
    ///
    /// The path is required up front so the post-navigation URL check is
    /// never vacuously true.
    #[must_use]
    pub fn new(ready: Locator, url_path: impl Into<String>) -> Self {
        Self {
            ready,
            url_path: url_path.into(),
            fields: HashMap::new(),
        }
    }

    /// Register a logical field name
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, locator: Locator) -> Self {
        let _ = self.fields.insert(name.into(), locator);
        self
    }

    /// Bind the page to an externally owned session
    #[must_use]
    pub fn build<S: BrowserSession + ?Sized>(
        self,
        session: &S,
        policy: SyncPolicy,
    ) -> PageSession<'_, S> {
        PageSession {
            engine: InteractionEngine::new(session, policy),
            ready: self.ready,
            url_path: self.url_path,
            fields: self.fields,
        }
    }
}

/// One logical page bound to one browser session for one scenario.
#[derive(Debug)]
pub struct PageSession<'a, S: BrowserSession + ?Sized> {
    engine: InteractionEngine<'a, S>,
    ready: Locator,
    url_path: String,
    fields: HashMap<String, Locator>,
}

impl<'a, S: BrowserSession + ?Sized> PageSession<'a, S> {
    /// Navigate to this page under `base_url` and confirm it loaded
    pub fn open(&self, base_url: &str) -> CotejarResult<&Self> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), self.url_path);
        self.navigate(&url)
    }

    /// Navigate to an explicit URL and confirm this page loaded
    pub fn navigate(&self, url: &str) -> CotejarResult<&Self> {
        self.engine.navigate(url, &self.ready, &self.url_path)?;
        Ok(self)
    }

    /// Type `text` into the named field, verified by readback
    pub fn set_value(&self, field: &str, text: &str) -> CotejarResult<&Self> {
        self.engine.set_value(self.locator(field)?, text)?;
        Ok(self)
    }

    /// Clear the named field, verified by readback
    pub fn clear(&self, field: &str) -> CotejarResult<&Self> {
        self.engine.clear(self.locator(field)?)?;
        Ok(self)
    }

    /// Read the named field's current value (missing attribute reads as "")
    pub fn read_value(&self, field: &str) -> CotejarResult<String> {
        self.engine.read_value(self.locator(field)?)
    }

    /// Assert the named field is empty
    pub fn assert_empty(&self, field: &str) -> CotejarResult<&Self> {
        self.engine.assert_empty(self.locator(field)?)?;
        Ok(self)
    }

    /// Assert the named field reads exactly `expected`
    pub fn assert_equals(&self, field: &str, expected: &str) -> CotejarResult<&Self> {
        self.engine.assert_equals(self.locator(field)?, expected)?;
        Ok(self)
    }

    /// Assert the named field's declared type attribute
    pub fn assert_field_type(&self, field: &str, expected_type: &str) -> CotejarResult<&Self> {
        self.engine.assert_field_type(self.locator(field)?, expected_type)?;
        Ok(self)
    }

    /// Registered field names
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// The engine driving this page
    #[must_use]
    pub fn engine(&self) -> &InteractionEngine<'a, S> {
        &self.engine
    }

    fn locator(&self, field: &str) -> CotejarResult<&Locator> {
        self.fields.get(field).ok_or_else(|| CotejarError::UnknownField {
            field: field.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::locator::Selector;
    use crate::mock::MockBrowserSession;
    use std::sync::Once;

    const NUMBER_FIELD: &str = "input[type='number']";

    static LOG_INIT: Once = Once::new();

    fn init_test_logging() {
        LOG_INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
                )
                .with_test_writer()
                .try_init();
        });
    }

    /// The inputs page scripted on the mock: a header plus one number field.
    fn inputs_page_session() -> MockBrowserSession {
        let session = MockBrowserSession::new();
        session.install_element("h3");
        session.install_field(NUMBER_FIELD, "");
        session.set_field_type(NUMBER_FIELD, "number");
        session.set_title("The Internet");
        session
    }

    fn inputs_page<'a>(session: &'a MockBrowserSession) -> PageSession<'a, MockBrowserSession> {
        let policy = SyncPolicy::new()
            .with_element_timeout(200)
            .with_page_load_timeout(200)
            .with_poll_interval(10);
        PageSessionBuilder::new(
            Locator::new(Selector::xpath("//h3[contains(text(),'Inputs')]"))
                .or(Selector::css("h3")),
            "/inputs",
        )
        .with_field(
            "number",
            Locator::new(Selector::xpath("//input[@type='number']"))
                .or(Selector::css(NUMBER_FIELD)),
        )
        .build(session, policy)
    }

    mod builder_tests {
        use super::*;

        #[test]
        fn test_builder_registers_fields() {
            let session = inputs_page_session();
            let page = inputs_page(&session);
            assert_eq!(page.field_names(), vec!["number"]);
        }

        #[test]
        fn test_unknown_field_is_distinct_error() {
            let session = inputs_page_session();
            let page = inputs_page(&session);
            let err = page.read_value("password").unwrap_err();
            match err {
                CotejarError::UnknownField { field } => assert_eq!(field, "password"),
                other => panic!("expected UnknownField, got {other:?}"),
            }
        }
    }

    mod scenario_tests {
        use super::*;

        /// The canonical inputs-page scenario: navigate, type, verify,
        /// clear, verify empty, type again, verify.
        #[test]
        fn test_basic_form_field_interaction() {
            init_test_logging();
            let session = inputs_page_session();
            let config = HarnessConfig::default();
            let page = inputs_page(&session);

            page.open(&config.base_url).unwrap();
            page.set_value("number", "123").unwrap();
            assert_eq!(page.read_value("number").unwrap(), "123");
            page.clear("number").unwrap();
            assert_eq!(page.read_value("number").unwrap(), "");
            page.set_value("number", "456")
                .unwrap()
                .assert_equals("number", "456")
                .unwrap();
        }

        #[test]
        fn test_chained_form_interaction() {
            let session = inputs_page_session();
            let page = inputs_page(&session);

            page.navigate("https://the-internet.herokuapp.com/inputs")
                .unwrap()
                .assert_field_type("number", "number")
                .unwrap()
                .set_value("number", "789")
                .unwrap()
                .clear("number")
                .unwrap()
                .assert_empty("number")
                .unwrap();
        }

        #[test]
        fn test_boundary_zero_is_not_coerced() {
            let session = inputs_page_session();
            let page = inputs_page(&session);
            page.navigate("https://the-internet.herokuapp.com/inputs").unwrap();

            page.set_value("number", "0").unwrap();
            assert_eq!(page.read_value("number").unwrap(), "0");
        }

        #[test]
        fn test_silently_dropped_write_fails_loudly() {
            let session = inputs_page_session();
            session.drop_writes(NUMBER_FIELD);
            let page = inputs_page(&session);
            page.navigate("https://the-internet.herokuapp.com/inputs").unwrap();

            let err = page.set_value("number", "123").unwrap_err();
            match err {
                CotejarError::InputMismatch { expected, actual } => {
                    assert_eq!(expected, "123");
                    assert_eq!(actual, "");
                }
                other => panic!("expected InputMismatch, got {other:?}"),
            }
            assert_eq!(session.write_attempts(NUMBER_FIELD), 2);
        }

        #[test]
        fn test_redirected_navigation_fails() {
            let session = inputs_page_session();
            session.set_redirect(
                "https://the-internet.herokuapp.com/inputs",
                "https://the-internet.herokuapp.com/login",
            );
            let page = inputs_page(&session);

            let err = page.open("https://the-internet.herokuapp.com").unwrap_err();
            assert!(matches!(err, CotejarError::Navigation { .. }));
        }

        #[test]
        fn test_open_joins_base_url_and_path() {
            let session = inputs_page_session();
            let page = inputs_page(&session);

            page.open("https://the-internet.herokuapp.com/").unwrap();
            assert_eq!(
                session.navigations(),
                vec!["https://the-internet.herokuapp.com/inputs".to_string()]
            );
        }

        #[test]
        fn test_first_error_propagates_unmodified() {
            let session = inputs_page_session();
            session.set_driver_fault(NUMBER_FIELD, "session dropped");
            let page = inputs_page(&session);
            page.navigate("https://the-internet.herokuapp.com/inputs").unwrap();

            // xpath alternative matches nothing; the css fallback hits the fault
            let err = page.read_value("number").unwrap_err();
            match err {
                CotejarError::Driver { message } => assert_eq!(message, "session dropped"),
                other => panic!("expected Driver, got {other:?}"),
            }
        }
    }
}
