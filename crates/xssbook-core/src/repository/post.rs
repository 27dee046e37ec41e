//! Post, comment and like repository trait definition.

use uuid::Uuid;
use xssbook_types::error::RepositoryError;
use xssbook_types::post::{Comment, CommentView, LikeOutcome, Post, PostView};
use xssbook_types::user::UserId;

/// Repository trait for wall posts and their engagement.
pub trait PostRepository: Send + Sync {
    fn create_post(
        &self,
        post: &Post,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get_post(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<PostView>, RepositoryError>> + Send;

    /// Every post, newest first.
    fn feed(&self) -> impl std::future::Future<Output = Result<Vec<PostView>, RepositoryError>> + Send;

    /// Posts written by `user`, newest first.
    fn posts_by(
        &self,
        user: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<PostView>, RepositoryError>> + Send;

    /// Posts whose content or author name contains `query`, newest first.
    /// Matching is SQL `LIKE` semantics: ASCII case-insensitive.
    fn search_posts(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<Vec<PostView>, RepositoryError>> + Send;

    fn count_posts(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    fn add_comment(
        &self,
        comment: &Comment,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Comments on `post`, oldest first.
    fn comments_for(
        &self,
        post: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<CommentView>, RepositoryError>> + Send;

    /// Flip `user`'s like on `post` and return the new state with the
    /// resulting count. The flip and the count are atomic.
    fn toggle_like(
        &self,
        post: &Uuid,
        user: &UserId,
    ) -> impl std::future::Future<Output = Result<LikeOutcome, RepositoryError>> + Send;
}
