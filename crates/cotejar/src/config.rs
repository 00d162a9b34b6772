//! Harness configuration.
//!
//! Configuration is an explicit value passed into construction; there is no
//! process-wide singleton. Defaults are documented constants; callers
//! override through the builder or by deserializing a plain key-value
//! structure (JSON) supplied by whatever runs the scenarios.

use crate::sync::SyncPolicy;
use serde::{Deserialize, Serialize};

/// Default application base URL
pub const DEFAULT_BASE_URL: &str = "https://the-internet.herokuapp.com";

/// Browser the external provider should provision.
///
/// Carried as configuration only. Launching the browser is out of scope for
/// this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    /// Chrome / Chromium
    #[default]
    Chrome,
    /// Firefox
    Firefox,
}

impl Browser {
    /// Lowercase name as used in provider capabilities
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
        }
    }
}

impl std::fmt::Display for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for one scenario's harness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Application base URL page paths are joined onto
    pub base_url: String,
    /// Browser the external provider should provision
    pub browser: Browser,
    /// Whether the provider should run headless
    pub headless: bool,
    /// Wait timeouts and polling interval
    pub sync: SyncPolicy,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            browser: Browser::default(),
            headless: false,
            sync: SyncPolicy::default(),
        }
    }
}

impl HarnessConfig {
    /// Create a config with documented defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the browser choice
    #[must_use]
    pub fn with_browser(mut self, browser: Browser) -> Self {
        self.browser = browser;
        self
    }

    /// Enable or disable headless mode
    #[must_use]
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the synchronization policy
    #[must_use]
    pub fn with_sync(mut self, sync: SyncPolicy) -> Self {
        self.sync = sync;
        self
    }

    /// Deserialize from a JSON document; absent keys take defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
