//! Locator abstraction for element selection.
//!
//! A [`Locator`] is an immutable description of how to find exactly one
//! element: an ordered, non-empty list of [`Selector`] alternatives. During
//! resolution the alternatives are tried in order until one matches exactly
//! one live element.
//!
//! # Design Philosophy
//!
//! - **Strict Selection**: a selector matching more than one element is a
//!   failure, never "first wins" (prevents flaky tests)
//! - **Ordered Fallback**: brittle-but-precise selectors can be backed by a
//!   coarser alternative without losing strictness
//! - **No Caching**: locators describe elements; resolution happens fresh on
//!   every interaction

use serde::{Deserialize, Serialize};

/// Selector strategy for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g., "input[type='number']")
    Css(String),
    /// XPath selector
    XPath(String),
    /// Element id attribute
    Id(String),
    /// Element name attribute
    Name(String),
    /// Test ID selector (data-testid attribute)
    TestId(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::XPath(selector.into())
    }

    /// Create an id selector
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Create a name-attribute selector
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Create a test ID selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Strategy name for diagnostics
    #[must_use]
    pub const fn strategy(&self) -> &'static str {
        match self {
            Self::Css(_) => "css",
            Self::XPath(_) => "xpath",
            Self::Id(_) => "id",
            Self::Name(_) => "name",
            Self::TestId(_) => "test-id",
        }
    }

    /// The raw selector text
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Css(s) | Self::XPath(s) | Self::Id(s) | Self::Name(s) | Self::TestId(s) => s,
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.strategy(), self.raw())
    }
}

/// An ordered, non-empty list of selector alternatives identifying one element.
///
/// Construction requires a primary selector; [`Locator::or`] appends
/// fallbacks. The list is fixed after construction. Deserialization goes
/// through the same validation, so the non-empty invariant holds on every
/// construction path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LocatorRepr")]
pub struct Locator {
    alternatives: Vec<Selector>,
}

/// Unvalidated wire shape for [`Locator`]
#[derive(Debug, Deserialize)]
struct LocatorRepr {
    alternatives: Vec<Selector>,
}

impl TryFrom<LocatorRepr> for Locator {
    type Error = String;

    fn try_from(repr: LocatorRepr) -> Result<Self, Self::Error> {
        if repr.alternatives.is_empty() {
            return Err("locator requires at least one selector".to_string());
        }
        Ok(Self {
            alternatives: repr.alternatives,
        })
    }
}

impl Locator {
    /// Create a locator from its primary selector
    #[must_use]
    pub fn new(primary: Selector) -> Self {
        Self {
            alternatives: vec![primary],
        }
    }

    /// Append a fallback selector, tried only if earlier ones match nothing
    #[must_use]
    pub fn or(mut self, fallback: Selector) -> Self {
        self.alternatives.push(fallback);
        self
    }

    /// Selectors in resolution order
    #[must_use]
    pub fn alternatives(&self) -> &[Selector] {
        &self.alternatives
    }

    /// The primary (first) selector
    #[must_use]
    pub fn primary(&self) -> &Selector {
        // Invariant: alternatives is non-empty by construction
        &self.alternatives[0]
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for sel in &self.alternatives {
            if !first {
                write!(f, " | ")?;
            }
            write!(f, "{sel}")?;
            first = false;
        }
        Ok(())
    }
}

impl From<Selector> for Locator {
    fn from(selector: Selector) -> Self {
        Self::new(selector)
    }
}
