//! Daily reminder to come back and grow the tree.
//!
//! The on/off choice lives in the preference store; the schedule itself
//! lives in the [`NotificationScheduler`]. Call [`DailyReminder::initialize`]
//! at start-up to put the schedule back after a restart.

use std::sync::Arc;

use crate::error::GifTreeResult;
use crate::traits::{DailyTrigger, KeyValueStore, NotificationContent, NotificationScheduler};

pub const NOTIFICATION_PREFERENCE_KEY: &str = "daily_notifications_enabled";
pub const DAILY_NOTIFICATION_ID: &str = "daily-reminder";

pub const REMINDER_TRIGGER: DailyTrigger = DailyTrigger {
    hour: 10,
    minute: 0,
};

pub fn reminder_content() -> NotificationContent {
    NotificationContent {
        title: "🌳 Time to grow your tree!".to_string(),
        body: "Don't forget to visit GifTree today and help your tree grow!".to_string(),
        sound: true,
    }
}

pub struct DailyReminder {
    store: Arc<dyn KeyValueStore>,
    scheduler: Arc<dyn NotificationScheduler>,
}

impl DailyReminder {
    pub fn new(store: Arc<dyn KeyValueStore>, scheduler: Arc<dyn NotificationScheduler>) -> Self {
        Self { store, scheduler }
    }

    /// Saved preference. Read errors count as disabled.
    pub async fn is_enabled(&self) -> bool {
        match self.store.get(NOTIFICATION_PREFERENCE_KEY).await {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                tracing::debug!("Failed to read reminder preference: {}", e);
                false
            }
        }
    }

    /// Save the preference and apply it.
    ///
    /// Returns whether a reminder is now scheduled. Enabling without
    /// notification permission saves the preference but schedules nothing.
    pub async fn set_enabled(&self, enabled: bool) -> GifTreeResult<bool> {
        self.store
            .set(
                NOTIFICATION_PREFERENCE_KEY,
                if enabled { "true" } else { "false" },
            )
            .await?;

        if !enabled {
            self.scheduler.cancel(DAILY_NOTIFICATION_ID).await?;
            tracing::info!("Daily reminder disabled");
            return Ok(false);
        }
        self.schedule_if_permitted().await
    }

    /// Restore the schedule if the saved preference is on.
    pub async fn initialize(&self) -> GifTreeResult<bool> {
        if !self.is_enabled().await {
            return Ok(false);
        }
        self.schedule_if_permitted().await
    }

    async fn has_permission(&self) -> bool {
        if self.scheduler.permission_status().await.is_granted() {
            return true;
        }
        self.scheduler.request_permission().await.is_granted()
    }

    async fn schedule_if_permitted(&self) -> GifTreeResult<bool> {
        if !self.has_permission().await {
            tracing::warn!("Notification permission not granted; reminder not scheduled");
            return Ok(false);
        }
        self.scheduler.cancel(DAILY_NOTIFICATION_ID).await?;
        self.scheduler
            .schedule_daily(DAILY_NOTIFICATION_ID, reminder_content(), REMINDER_TRIGGER)
            .await?;
        Ok(true)
    }
}
