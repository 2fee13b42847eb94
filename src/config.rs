//! Runtime settings shared by the binary and the library.

use url::Url;

/// Base of the messaging deep-link used to relay orders.
pub const DEFAULT_LINK_BASE: &str = "https://wa.me";

/// Settings for the checkout coordinator.
#[derive(Debug, Clone, Default)]
pub struct CheckoutConfig {
    /// Where order summaries are sent. No notification is attempted when unset.
    pub notify_to: Option<String>,
}

impl CheckoutConfig {
    pub fn with_notify_to(destination: impl Into<String>) -> Self {
        Self {
            notify_to: Some(destination.into()).filter(|d| !d.trim().is_empty()),
        }
    }
}

/// Settings for the deep-link notifier.
#[derive(Debug, Clone)]
pub struct HandoffConfig {
    pub link_base: Url,
    /// Command that opens the link, e.g. `xdg-open`. When unset the link is only logged.
    pub opener: Option<String>,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            link_base: Url::parse(DEFAULT_LINK_BASE).expect("default link base is a valid URL"),
            opener: None,
        }
    }
}
