//! Notification feed.

use tracing::debug;
use uuid::Uuid;
use xssbook_types::error::ChatError;
use xssbook_types::notification::NotificationView;
use xssbook_types::user::UserId;

use crate::repository::notification::NotificationRepository;

/// Number of notifications returned by `list`.
pub const FEED_LIMIT: u32 = 10;

pub struct NotificationService<N: NotificationRepository> {
    notifications: N,
}

impl<N: NotificationRepository> NotificationService<N> {
    pub fn new(notifications: N) -> Self {
        Self { notifications }
    }

    /// The caller's latest notifications, newest first.
    pub async fn list(&self, caller: Option<UserId>) -> Result<Vec<NotificationView>, ChatError> {
        let user = caller.ok_or(ChatError::Unauthorized)?;
        Ok(self.notifications.recent_for(&user, FEED_LIMIT).await?)
    }

    /// Mark a notification as read. Notifications owned by someone else are
    /// left untouched; the return value says whether anything changed.
    pub async fn mark_read(&self, caller: Option<UserId>, id: &Uuid) -> Result<bool, ChatError> {
        let user = caller.ok_or(ChatError::Unauthorized)?;
        let updated = self.notifications.mark_notification_read(id, &user).await?;
        debug!(user = %user, notification = %id, updated, "Mark notification read");
        Ok(updated)
    }
}
