//! Daily desktop notifications driven by tokio timers.
//!
//! Each scheduled id owns a background task that sleeps until the next local
//! occurrence of its trigger time and then posts a notification. On macOS
//! delivery goes through `osascript` (no bundle identifier or permission
//! prompt needed); elsewhere the notification is logged.

use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDateTime};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tokio::task::JoinHandle;

use crate::traits::{
    DailyTrigger, NotificationContent, NotificationScheduler, PermissionStatus, SchedulerError,
};

#[derive(Debug, Default)]
pub struct LocalNotificationScheduler {
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl LocalNotificationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids with a live schedule.
    pub fn scheduled_ids(&self) -> Vec<String> {
        let tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<String> = tasks
            .iter()
            .filter(|(_, task)| !task.is_finished())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }
}

impl Drop for LocalNotificationScheduler {
    fn drop(&mut self) {
        let tasks = self.tasks.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, task) in tasks.drain() {
            task.abort();
        }
    }
}

/// The first time strictly after `now` matching `trigger`.
pub fn next_fire_time(now: NaiveDateTime, trigger: DailyTrigger) -> Option<NaiveDateTime> {
    let today = now.date().and_hms_opt(trigger.hour, trigger.minute, 0)?;
    if today > now {
        Some(today)
    } else {
        Some(today + Duration::days(1))
    }
}

fn validate(trigger: DailyTrigger) -> Result<(), SchedulerError> {
    if trigger.hour < 24 && trigger.minute < 60 {
        Ok(())
    } else {
        Err(SchedulerError::InvalidTrigger {
            hour: trigger.hour,
            minute: trigger.minute,
        })
    }
}

async fn run_daily(id: String, content: NotificationContent, trigger: DailyTrigger) {
    loop {
        let now = Local::now().naive_local();
        let Some(next) = next_fire_time(now, trigger) else {
            return;
        };
        let wait = (next - now).to_std().unwrap_or_default();
        tracing::debug!(id = %id, at = %next, "next notification scheduled");
        tokio::time::sleep(wait).await;

        let content = content.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || send_notification(&content)).await {
            tracing::warn!("Notification task failed: {}", e);
        }
    }
}

#[async_trait]
impl NotificationScheduler for LocalNotificationScheduler {
    async fn permission_status(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn schedule_daily(
        &self,
        id: &str,
        content: NotificationContent,
        trigger: DailyTrigger,
    ) -> Result<(), SchedulerError> {
        validate(trigger)?;
        let task = tokio::spawn(run_daily(id.to_string(), content, trigger));
        let previous = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), task);
        if let Some(previous) = previous {
            previous.abort();
        }
        tracing::info!(
            "Scheduled daily notification {} at {:02}:{:02}",
            id,
            trigger.hour,
            trigger.minute
        );
        Ok(())
    }

    async fn cancel(&self, id: &str) -> Result<(), SchedulerError> {
        let task = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        if let Some(task) = task {
            task.abort();
            tracing::debug!("Cancelled notification {}", id);
        }
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn send_notification(content: &NotificationContent) {
    use std::process::Command;

    // AppleScript string literals
    let escape = |s: &str| s.replace('\\', "\\\\").replace('"', "\\\"");

    let mut script = format!(
        "display notification \"{}\" with title \"{}\"",
        escape(&content.body),
        escape(&content.title)
    );
    if content.sound {
        script.push_str(" sound name \"Glass\"");
    }

    match Command::new("osascript").arg("-e").arg(&script).output() {
        Ok(output) if !output.status.success() => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!("osascript notification failed: {}", stderr.trim());
        }
        Err(e) => {
            tracing::warn!("Failed to spawn osascript: {}", e);
        }
        _ => {
            tracing::debug!("OS notification sent");
        }
    }
}

#[cfg(not(target_os = "macos"))]
fn send_notification(content: &NotificationContent) {
    tracing::info!("{}: {}", content.title, content.body);
}
