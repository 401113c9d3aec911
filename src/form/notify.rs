// src/form/notify.rs - User-facing messages raised by the form

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Receives messages meant for the person filling in the form. The page
/// shows them as toasts; headless callers log them.
pub trait Notifier {
    fn notify(&self, level: NoticeLevel, title: &str, message: &str);
}

/// Writes notices to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, title: &str, message: &str) {
        match level {
            NoticeLevel::Success => tracing::info!(title, message, "Notice"),
            NoticeLevel::Warning => tracing::warn!(title, message, "Notice"),
            NoticeLevel::Error => tracing::error!(title, message, "Notice"),
        }
    }
}
