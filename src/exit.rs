// src/exit.rs
//! Process exit codes for `depwarden`.
//!
//! Provides a stable contract for scripts and CI.

use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum DepwardenExit {
    /// Analysis ran and found nothing to report.
    Success = 0,
    /// Generic error (I/O, config).
    Error = 1,
    /// Analysis ran and found violations.
    ViolationsFound = 6,
}

impl DepwardenExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl Termination for DepwardenExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

