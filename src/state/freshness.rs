use std::sync::{PoisonError, RwLock};

use crate::foundation::core::Timestamp;

/// The last applied image: its parsed time plus the string it was published as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FreshnessState {
    pub timestamp: Timestamp,
    pub raw: String,
}

/// Staleness gate shared between the poll loop and status readers.
///
/// The lock is held only for a compare-and-store; no I/O happens under it.
#[derive(Debug, Default)]
pub struct StalenessTracker {
    state: RwLock<Option<FreshnessState>>,
}

impl StalenessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `candidate` iff nothing is recorded yet or it is strictly later than the recorded
    /// value. Equal and older candidates are rejected and leave the state untouched.
    pub fn try_claim(&self, candidate: Timestamp, raw: &str) -> bool {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = guard.as_ref()
            && candidate <= current.timestamp
        {
            return false;
        }
        *guard = Some(FreshnessState {
            timestamp: candidate,
            raw: raw.to_string(),
        });
        true
    }

    pub fn snapshot(&self) -> Option<FreshnessState> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn latest(&self) -> Option<Timestamp> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.timestamp)
    }

    /// The applied date exactly as the provider published it.
    pub fn display_date(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.raw.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/freshness.rs"]
mod tests;
