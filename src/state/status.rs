use std::sync::{PoisonError, RwLock};

/// What the operator-facing date line shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DisplayStatus {
    /// Latest date string from the provider, parsed or not.
    Date(String),
    /// The metadata request itself failed.
    FetchError,
    /// Polling is stopped.
    #[default]
    Idle,
}

impl std::fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayStatus::Date(raw) => write!(f, "Date: {raw}"),
            DisplayStatus::FetchError => f.write_str("Date: Error fetching"),
            DisplayStatus::Idle => f.write_str("Date: --"),
        }
    }
}

/// Display collaborator fed by the poll loop.
pub trait StatusReporter: Send + Sync {
    fn report(&self, status: DisplayStatus);
}

/// Keeps the most recent status for on-demand display.
#[derive(Debug, Default)]
pub struct StatusBoard {
    current: RwLock<DisplayStatus>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> DisplayStatus {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StatusReporter for StatusBoard {
    fn report(&self, status: DisplayStatus) {
        tracing::debug!(status = %status, "status updated");
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = status;
    }
}
