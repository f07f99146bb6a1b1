//! Document capability ports
//!
//! The engine never talks to a browser driver directly. Everything it needs
//! from a live page goes through [`DocumentPort`], and everything it needs
//! from a matched element goes through [`ElementHandle`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use stepwright_core_types::{CandidateDescriptor, WaitKind};

use crate::errors::ActionError;

/// Live element matched by a query.
#[async_trait]
pub trait ElementHandle: Send + Sync + fmt::Debug {
    /// Short human-readable identity used in logs
    fn describe(&self) -> String;

    async fn is_visible(&self) -> Result<bool, ActionError>;

    async fn click(&self) -> Result<(), ActionError>;

    /// Type `text` one key at a time with `delay` between keys
    async fn press_sequentially(&self, text: &str, delay: Duration) -> Result<(), ActionError>;

    async fn press(&self, key: &str) -> Result<(), ActionError>;

    async fn select_option(&self, value: &str) -> Result<(), ActionError>;

    async fn set_checked(&self, checked: bool) -> Result<(), ActionError>;

    async fn hover(&self) -> Result<(), ActionError>;

    /// Scroll the element into the middle of the viewport
    async fn scroll_into_view(&self) -> Result<(), ActionError>;

    async fn text_content(&self) -> Result<String, ActionError>;
}

pub type SharedElement = Arc<dyn ElementHandle>;

/// Driver-side capability for the page under automation.
#[async_trait]
pub trait DocumentPort: Send + Sync {
    async fn navigate(&self, url: &str, wait: WaitKind, timeout: Duration)
        -> Result<(), ActionError>;

    async fn wait_for_load_state(&self, state: WaitKind, timeout: Duration)
        -> Result<(), ActionError>;

    /// All elements currently matching the candidate, in document order.
    ///
    /// The candidate's disambiguation index is not applied here.
    async fn query(&self, candidate: &CandidateDescriptor)
        -> Result<Vec<SharedElement>, ActionError>;

    /// Serialized document structure (HTML)
    async fn capture_structure(&self) -> Result<String, ActionError>;

    /// Encoded image of the viewport, or of the whole page when `full_page`
    async fn capture_visual(&self, full_page: bool) -> Result<Vec<u8>, ActionError>;

    async fn current_url(&self) -> Result<String, ActionError>;

    async fn title(&self) -> Result<String, ActionError>;
}
