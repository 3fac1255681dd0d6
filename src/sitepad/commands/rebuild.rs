use crate::commands::OpMessage;
use crate::error::{Result, SitepadError};
use std::time::Duration;

/// External rebuild signal. The data change has already been persisted by
/// the time this runs; implementations may be slow or fail without
/// affecting the caller's perceived success of the change.
pub trait RebuildNotifier {
    /// Trigger a rebuild, returning a human-readable note on success.
    fn notify(&self) -> Result<String>;
}

/// Development default: acknowledge without doing anything.
#[derive(Debug, Default)]
pub struct AckNotifier;

impl RebuildNotifier for AckNotifier {
    fn notify(&self) -> Result<String> {
        Ok("Rebuild triggered (simulated)".to_string())
    }
}

/// Forwards the signal to a deployment webhook.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::blocking::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("default reqwest client"),
        }
    }
}

impl RebuildNotifier for WebhookNotifier {
    fn notify(&self) -> Result<String> {
        let response = self
            .client
            .post(&self.url)
            .send()
            .map_err(|e| SitepadError::Api(format!("Failed to trigger rebuild: {}", e)))?;

        if !response.status().is_success() {
            return Err(SitepadError::Api(format!(
                "Failed to trigger rebuild: webhook returned {}",
                response.status()
            )));
        }

        Ok("Rebuild triggered successfully".to_string())
    }
}

/// Pipeline step 6: invoke the notifier, degrading failure to a warning.
/// The document change stands either way.
pub fn notify_soft(notifier: &dyn RebuildNotifier) -> OpMessage {
    match notifier.notify() {
        Ok(note) => OpMessage::info(note),
        Err(e) => OpMessage::warning(format!(
            "Changes saved locally, manual rebuild may be needed: {}",
            e
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;

    struct FailingNotifier;

    impl RebuildNotifier for FailingNotifier {
        fn notify(&self) -> Result<String> {
            Err(SitepadError::Api("hook down".into()))
        }
    }

    #[test]
    fn ack_notifier_acknowledges() {
        let note = AckNotifier.notify().unwrap();
        assert!(note.contains("simulated"));
    }

    #[test]
    fn notify_failure_becomes_a_warning() {
        let message = notify_soft(&FailingNotifier);
        assert_eq!(message.level, MessageLevel::Warning);
        assert!(message.content.contains("manual rebuild"));
    }

    #[test]
    fn notify_success_is_informational() {
        let message = notify_soft(&AckNotifier);
        assert_eq!(message.level, MessageLevel::Info);
    }
}
