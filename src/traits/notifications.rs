//! Local notification scheduling abstraction.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SchedulerError {
    #[error("Notification permission not granted")]
    PermissionDenied,
    #[error("Invalid trigger time {hour:02}:{minute:02}")]
    InvalidTrigger { hour: u32, minute: u32 },
    #[error("Failed to schedule notification: {0}")]
    Other(String),
}

/// OS-level notification permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub sound: bool,
}

/// Local wall-clock time at which a daily notification fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTrigger {
    pub hour: u32,
    pub minute: u32,
}

/// Schedules recurring local notifications identified by a string id.
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    async fn permission_status(&self) -> PermissionStatus;

    /// Ask the OS for permission. Returns the resulting status.
    async fn request_permission(&self) -> PermissionStatus;

    /// Schedule a daily notification, replacing any with the same id.
    async fn schedule_daily(
        &self,
        id: &str,
        content: NotificationContent,
        trigger: DailyTrigger,
    ) -> Result<(), SchedulerError>;

    /// Cancel a scheduled notification. Cancelling an unknown id is a no-op.
    async fn cancel(&self, id: &str) -> Result<(), SchedulerError>;
}
