use crate::config::HandoffConfig;
use crate::domain::ports::Notifier;
use crate::error::{Result, StoreError};
use async_trait::async_trait;
use tokio::process::Command;
use url::Url;

/// Relays order summaries through a messaging deep-link such as
/// `https://wa.me/<phone>?text=<message>`.
///
/// With an opener configured the link is launched through it (for example
/// `xdg-open`); otherwise the link is only logged for the operator to follow.
#[derive(Debug, Clone, Default)]
pub struct DeepLinkNotifier {
    config: HandoffConfig,
}

impl DeepLinkNotifier {
    pub fn new(config: HandoffConfig) -> Self {
        Self { config }
    }

    /// Builds the link for `destination`, keeping only its digits.
    pub fn link_for(&self, destination: &str, message: &str) -> Result<Url> {
        let digits: String = destination.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(StoreError::HandoffError(format!(
                "destination '{destination}' has no phone digits"
            )));
        }

        let mut link = self.config.link_base.clone();
        link.path_segments_mut()
            .map_err(|()| {
                StoreError::HandoffError(format!(
                    "link base '{}' cannot carry a path",
                    self.config.link_base
                ))
            })?
            .pop_if_empty()
            .push(&digits);
        link.query_pairs_mut().clear().append_pair("text", message);
        Ok(link)
    }
}

#[async_trait]
impl Notifier for DeepLinkNotifier {
    async fn notify(&self, destination: &str, message: &str) -> Result<()> {
        let link = self.link_for(destination, message)?;

        let Some(opener) = &self.config.opener else {
            tracing::info!(%link, "order notification link ready");
            return Ok(());
        };

        let status = Command::new(opener)
            .arg(link.as_str())
            .status()
            .await
            .map_err(|e| StoreError::HandoffError(format!("could not run '{opener}': {e}")))?;
        if status.success() {
            tracing::debug!(%opener, "notification link opened");
            Ok(())
        } else {
            Err(StoreError::HandoffError(format!(
                "'{opener}' exited with {status}"
            )))
        }
    }
}
