use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// ── Remote types ────────────────────────────────────────────────────────────

/// One item from the remote list. Only `title` is required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemotePost {
    #[serde(default)]
    pub id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(rename = "userId", default)]
    pub user_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPostRequest {
    pub title: String,
    pub body: String,
    #[serde(rename = "userId")]
    pub user_id: u64,
}

// ── Status types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncStatus {
    Idle,
    Syncing,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Synced,
    ConflictsResolved,
    Error,
}

/// Transient status message shown to the user.
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub at: DateTime<Local>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            at: Local::now(),
        }
    }
}
