use std::time::Duration;

use thiserror::Error;

use crate::blob::{PREFS_MAGIC, PREFS_VERSION};

/// Failure surfaced by a profile storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store error: {0}")]
    Store(String),
    #[error("profile '{0}' not found")]
    ProfileNotFound(String),
}

/// Failure of a fan-out group as a whole.
#[derive(Debug, Error)]
pub enum FanOutError {
    #[error("fan-out group missed its {}ms deadline", .0.as_millis())]
    DeadlineExceeded(Duration),
    #[error("fan-out members failed: {}", format_member_failures(.0))]
    MemberFailed(Vec<(String, String)>),
}

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("not a preferences blob: expected magic '{PREFS_MAGIC}', got '{0}'")]
    BadMagic(String),
    #[error("unsupported preferences blob version: expected {PREFS_VERSION}, got {0}")]
    BadVersion(u32),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    FanOut(#[from] FanOutError),
}

fn format_member_failures(failures: &[(String, String)]) -> String {
    failures
        .iter()
        .map(|(id, reason)| format!("{id}: {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}
