//! Recording notification scheduler for testing.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::traits::{
    DailyTrigger, NotificationContent, NotificationScheduler, PermissionStatus, SchedulerError,
};

#[derive(Debug)]
struct Inner {
    permission: PermissionStatus,
    /// Status returned by `request_permission`.
    grant_on_request: PermissionStatus,
    permission_requests: usize,
    scheduled: BTreeMap<String, (NotificationContent, DailyTrigger)>,
    cancelled: Vec<String>,
    fail_schedule: bool,
}

#[derive(Debug, Clone)]
pub struct MockScheduler {
    inner: Arc<Mutex<Inner>>,
}

impl Default for MockScheduler {
    fn default() -> Self {
        Self::new(PermissionStatus::Granted)
    }
}

impl MockScheduler {
    pub fn new(permission: PermissionStatus) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                permission,
                grant_on_request: permission,
                permission_requests: 0,
                scheduled: BTreeMap::new(),
                cancelled: Vec::new(),
                fail_schedule: false,
            })),
        }
    }

    /// Status the user "chooses" when asked.
    pub fn set_grant_on_request(&self, status: PermissionStatus) {
        self.inner.lock().unwrap().grant_on_request = status;
    }

    pub fn set_fail_schedule(&self, fail: bool) {
        self.inner.lock().unwrap().fail_schedule = fail;
    }

    pub fn permission_requests(&self) -> usize {
        self.inner.lock().unwrap().permission_requests
    }

    pub fn scheduled(&self, id: &str) -> Option<(NotificationContent, DailyTrigger)> {
        self.inner.lock().unwrap().scheduled.get(id).cloned()
    }

    pub fn scheduled_ids(&self) -> Vec<String> {
        self.inner.lock().unwrap().scheduled.keys().cloned().collect()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.inner.lock().unwrap().cancelled.clone()
    }
}

#[async_trait]
impl NotificationScheduler for MockScheduler {
    async fn permission_status(&self) -> PermissionStatus {
        self.inner.lock().unwrap().permission
    }

    async fn request_permission(&self) -> PermissionStatus {
        let mut inner = self.inner.lock().unwrap();
        inner.permission_requests += 1;
        inner.permission = inner.grant_on_request;
        inner.permission
    }

    async fn schedule_daily(
        &self,
        id: &str,
        content: NotificationContent,
        trigger: DailyTrigger,
    ) -> Result<(), SchedulerError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_schedule {
            return Err(SchedulerError::Other("scheduler unavailable".to_string()));
        }
        if !inner.permission.is_granted() {
            return Err(SchedulerError::PermissionDenied);
        }
        inner.scheduled.insert(id.to_string(), (content, trigger));
        Ok(())
    }

    async fn cancel(&self, id: &str) -> Result<(), SchedulerError> {
        let mut inner = self.inner.lock().unwrap();
        inner.scheduled.remove(id);
        inner.cancelled.push(id.to_string());
        Ok(())
    }
}
