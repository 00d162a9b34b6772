//! Cotejar: synchronized form-interaction harness for browser UI testing.
//!
//! Cotejar (Spanish: "to collate / to check against") drives a remote
//! browser session through form-field operations (navigate, type, clear,
//! read back, assert) while tolerating the latency and non-determinism of a
//! rendered page. Its core discipline: a mutation is not done until a
//! readback confirms it. Writes and clears each get exactly one silent retry
//! before failing with the expected/actual delta; nothing is swallowed into
//! best-effort success.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                       COTEJAR Architecture                        │
//! ├───────────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌──────────────────┐   ┌────────────────────┐  │
//! │  │ Scenario   │   │ PageSession      │   │ InteractionEngine  │  │
//! │  │ (external) │──►│ field → Locator  │──►│ wait / act /       │  │
//! │  │            │   │                  │   │ read back / retry  │  │
//! │  └────────────┘   └──────────────────┘   └─────────┬──────────┘  │
//! │                                                    │             │
//! │                    ┌──────────────┐      ┌─────────▼──────────┐  │
//! │                    │ SyncPolicy   │◄─────┤ BrowserSession     │  │
//! │                    │ poll + wait  │      │ (external provider)│  │
//! │                    └──────────────┘      └────────────────────┘  │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The browser session itself, meaning process launch, driver provisioning,
//! and teardown, is an external collaborator behind the [`BrowserSession`]
//! trait. A scripted [`mock::MockBrowserSession`] ships for exercising the
//! harness without a browser.

#![warn(missing_docs)]

mod config;
mod engine;
mod locator;
/// Scripted in-memory browser session for tests
pub mod mock;
mod page;
mod report;
mod result;
mod session;
mod sync;

pub use config::{Browser, HarnessConfig, DEFAULT_BASE_URL};
pub use engine::{InteractionEngine, InteractionResult};
pub use locator::{Locator, Selector};
pub use page::{PageSession, PageSessionBuilder};
pub use report::VerificationReporter;
pub use result::{CotejarError, CotejarResult, VerificationReport, WaitBlocker};
pub use session::{BrowserSession, ElementRef};
pub use sync::{
    ElementHandle, ReadyPredicate, SyncPolicy, DEFAULT_ELEMENT_TIMEOUT_MS,
    DEFAULT_PAGE_LOAD_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS,
};

/// Commonly used types, for glob import in scenario code
pub mod prelude {
    pub use crate::config::{Browser, HarnessConfig};
    pub use crate::engine::InteractionEngine;
    pub use crate::locator::{Locator, Selector};
    pub use crate::page::{PageSession, PageSessionBuilder};
    pub use crate::result::{CotejarError, CotejarResult};
    pub use crate::session::{BrowserSession, ElementRef};
    pub use crate::sync::{ReadyPredicate, SyncPolicy};
}
