//! Notification repository trait definition.

use uuid::Uuid;
use xssbook_types::error::RepositoryError;
use xssbook_types::notification::{Notification, NotificationView};
use xssbook_types::user::UserId;

pub trait NotificationRepository: Send + Sync {
    fn create_notification(
        &self,
        notification: &Notification,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Latest notifications for `user`, newest first.
    fn recent_for(
        &self,
        user: &UserId,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<NotificationView>, RepositoryError>> + Send;

    /// Mark one of `user`'s notifications as read.
    /// Returns `false` when no notification with that id belongs to `user`.
    fn mark_notification_read(
        &self,
        id: &Uuid,
        user: &UserId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
