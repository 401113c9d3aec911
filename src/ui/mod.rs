// src/ui/mod.rs - UI system coordinator

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::NoticeLevel;

// Re-export main app component
pub use app::App;

// Module declarations
pub mod app;
pub mod components;
pub mod pages;
pub mod router;
pub mod state;

// Re-exports for convenience
pub use components::*;
pub use pages::{NotFound, ProductFormPage};
pub use router::Route;
pub use state::*;

/// Notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl Notification {
    pub fn new(
        notification_type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            message: message.into(),
            notification_type,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Notification types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationType {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationType {
    /// Tailwind classes for the toast frame
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Info => "bg-blue-50 border-blue-400 text-blue-800",
            Self::Success => "bg-green-50 border-green-400 text-green-800",
            Self::Warning => "bg-yellow-50 border-yellow-400 text-yellow-800",
            Self::Error => "bg-red-50 border-red-400 text-red-800",
        }
    }
}

impl From<NoticeLevel> for NotificationType {
    fn from(level: NoticeLevel) -> Self {
        match level {
            NoticeLevel::Success => Self::Success,
            NoticeLevel::Warning => Self::Warning,
            NoticeLevel::Error => Self::Error,
        }
    }
}
