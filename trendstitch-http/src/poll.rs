use std::future::Future;

use tokio::sync::watch;
use trendstitch_core::StitchError;

use crate::config::PollConfig;

/// Status a report vendor reports for a requested report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportStatus {
    /// Still being built.
    InProcess,
    /// Building failed on the vendor side.
    Fail(Option<String>),
    /// Ready for download at the given URL.
    Ready(String),
}

/// Lifecycle of one asynchronous report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportState {
    /// Submitted, no status seen yet.
    Requested,
    /// Status checked `polls` times without a terminal answer.
    InProgress {
        /// Status checks so far.
        polls: u32,
    },
    /// Terminal: download URL known.
    Ready {
        /// Where to download the report.
        url: String,
    },
    /// Terminal: the vendor gave up on the report.
    Failed {
        /// Vendor-supplied reason, if any.
        reason: String,
    },
}

impl ReportState {
    /// Apply one observed status.
    #[must_use]
    pub fn on_status(self, status: ReportStatus) -> Self {
        match (self, status) {
            (s @ (Self::Ready { .. } | Self::Failed { .. }), _) => s,
            (_, ReportStatus::Ready(url)) => Self::Ready { url },
            (_, ReportStatus::Fail(reason)) => Self::Failed {
                reason: reason.unwrap_or_else(|| "report failed".to_string()),
            },
            (Self::Requested, ReportStatus::InProcess) => Self::InProgress { polls: 1 },
            (Self::InProgress { polls }, ReportStatus::InProcess) => Self::InProgress {
                polls: polls.saturating_add(1),
            },
        }
    }

    /// Whether no further status checks are needed.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready { .. } | Self::Failed { .. })
    }
}

async fn cancelled(cancel: &mut Option<watch::Receiver<bool>>) {
    let Some(rx) = cancel else {
        return std::future::pending().await;
    };
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            // sender dropped without cancelling
            return std::future::pending().await;
        }
    }
}

/// Drive a report from `Requested` to `Ready`, checking its status every `cfg.interval`.
///
/// The first check happens immediately. Returns the download URL.
///
/// # Errors
/// - `Connector` when the vendor reports the build as failed.
/// - `RequestTimeout { capability: "report" }` when `cfg.max_wait` elapses first.
/// - `Cancelled { capability: "report" }` when `cancel` flips to `true`.
/// - Any error returned by `check`.
pub async fn poll_report<F, Fut>(
    connector: &str,
    cfg: &PollConfig,
    mut cancel: Option<watch::Receiver<bool>>,
    mut check: F,
) -> Result<String, StitchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<ReportStatus, StitchError>>,
{
    let deadline = tokio::time::sleep(cfg.max_wait);
    tokio::pin!(deadline);
    let mut state = ReportState::Requested;

    loop {
        let status = tokio::select! {
            biased;
            () = cancelled(&mut cancel) => return Err(StitchError::cancelled("report")),
            () = &mut deadline => return Err(StitchError::request_timeout("report")),
            status = check() => status?,
        };
        state = state.on_status(status);
        #[cfg(feature = "tracing")]
        tracing::debug!(connector, state = ?state, "report status");
        match &state {
            ReportState::Ready { url } => return Ok(url.clone()),
            ReportState::Failed { reason } => {
                return Err(StitchError::connector(connector, format!("report failed: {reason}")));
            }
            ReportState::Requested | ReportState::InProgress { .. } => {}
        }

        tokio::select! {
            biased;
            () = cancelled(&mut cancel) => return Err(StitchError::cancelled("report")),
            () = &mut deadline => return Err(StitchError::request_timeout("report")),
            () = tokio::time::sleep(cfg.interval) => {}
        }
    }
}
