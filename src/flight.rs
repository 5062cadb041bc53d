// src/flight.rs
//! Single-flight guard for build and learn passes.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Result of a guarded operation. `Declined` means another pass was already
/// running; nothing was queued.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "report", rename_all = "snake_case")]
#[must_use]
pub enum Outcome<T> {
    Completed(T),
    Declined,
}

impl<T> Outcome<T> {
    #[must_use]
    pub fn is_declined(&self) -> bool {
        matches!(self, Self::Declined)
    }

    #[must_use]
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(v) => Some(v),
            Self::Declined => None,
        }
    }
}

/// Holds the in-progress flag until dropped.
pub(crate) struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlightGuard<'a> {
    /// Claims the flag, or returns `None` if it is already held.
    pub(crate) fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
