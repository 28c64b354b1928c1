use crate::core::clipboard::Clipboard;
use crate::core::constants::COPY_ACK_WINDOW;
use crate::types::RewardRecord;
use crate::utils::share_link;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardView {
    pub code: String,
    /// A copy succeeded within the acknowledgement window
    pub copied: bool,
    /// Prefilled post for sharing the survey
    pub share_link: String,
}

/// Shows the reward code and handles copying it.
#[derive(Debug, Clone)]
pub struct RewardPresenter {
    record: Option<RewardRecord>,
    copied_at: Option<Instant>,
    ack_window: Duration,
}

impl Default for RewardPresenter {
    fn default() -> Self {
        Self::new(COPY_ACK_WINDOW)
    }
}

impl RewardPresenter {
    pub fn new(ack_window: Duration) -> Self {
        Self {
            record: None,
            copied_at: None,
            ack_window,
        }
    }

    pub fn present(&mut self, record: RewardRecord) -> RewardView {
        self.record = Some(record);
        self.copied_at = None;
        RewardView {
            code: self.record.as_ref().map(|r| r.code.clone()).unwrap_or_default(),
            copied: false,
            share_link: share_link(),
        }
    }

    pub fn record(&self) -> Option<&RewardRecord> {
        self.record.as_ref()
    }

    pub fn view(&self) -> Option<RewardView> {
        self.record.as_ref().map(|record| RewardView {
            code: record.code.clone(),
            copied: self.is_copied(),
            share_link: share_link(),
        })
    }

    pub fn is_copied(&self) -> bool {
        self.copied_at
            .map(|at| at.elapsed() < self.ack_window)
            .unwrap_or(false)
    }

    /// Writes the code to the clipboard. Failures are logged and reported as
    /// `false`; they never change what is displayed.
    pub async fn copy_to_clipboard(&mut self, clipboard: &dyn Clipboard) -> bool {
        let Some(record) = &self.record else {
            debug!("nothing to copy, no reward presented");
            return false;
        };
        match clipboard.write_text(&record.code).await {
            Ok(()) => {
                self.copied_at = Some(Instant::now());
                true
            },
            Err(e) => {
                warn!(error = %e, "failed to copy reward code");
                false
            },
        }
    }

    /// Drops the cached record.
    pub fn restart(&mut self) {
        self.record = None;
        self.copied_at = None;
    }
}
