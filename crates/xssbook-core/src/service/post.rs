//! Wall posts, comments, likes and post search.
//!
//! Post and comment bodies pass through the configured sanitizer before
//! they are stored. Reads return content exactly as stored.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};
use uuid::Uuid;
use xssbook_types::config::PostsConfig;
use xssbook_types::error::PostError;
use xssbook_types::post::{
    AddCommentRequest, Comment, CommentView, CreatePostRequest, LikeOutcome, Post, PostView,
    SanitizerKind,
};
use xssbook_types::user::{User, UserId};

use crate::repository::post::PostRepository;
use crate::repository::user::UserRepository;
use crate::sanitize;

use super::seed::{MAX_SEED_COMMENTS, PERSONAS, SEED_COMMENTS, SEED_POSTS};

pub struct PostService<U, P>
where
    U: UserRepository,
    P: PostRepository,
{
    users: U,
    posts: P,
    post_sanitizer: SanitizerKind,
    comment_sanitizer: SanitizerKind,
}

impl<U, P> PostService<U, P>
where
    U: UserRepository,
    P: PostRepository,
{
    pub fn new(users: U, posts: P, config: &PostsConfig) -> Self {
        Self {
            users,
            posts,
            post_sanitizer: config.post_sanitizer,
            comment_sanitizer: config.comment_sanitizer,
        }
    }

    /// Publish a post on the caller's wall.
    ///
    /// Content is required; image and video URLs are stored unchecked.
    pub async fn create_post(
        &self,
        caller: Option<UserId>,
        request: CreatePostRequest,
    ) -> Result<PostView, PostError> {
        let author = caller.ok_or(PostError::Unauthorized)?;
        let content = request
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| PostError::InvalidRequest("content required".to_string()))?;

        let post = Post::new(
            author,
            sanitize::apply(self.post_sanitizer, &content),
            request.image_url.unwrap_or_default(),
            request.video_url.unwrap_or_default(),
        );
        self.posts.create_post(&post).await?;
        info!(post = %post.id, author = %author, sanitizer = %self.post_sanitizer, "Post created");

        self.require_post(&post.id).await
    }

    /// Every post, newest first.
    pub async fn feed(&self) -> Result<Vec<PostView>, PostError> {
        Ok(self.posts.feed().await?)
    }

    /// Posts on `user`'s wall, newest first.
    pub async fn user_posts(&self, user: &UserId) -> Result<Vec<PostView>, PostError> {
        if self.users.get_user(user).await?.is_none() {
            return Err(PostError::UserNotFound);
        }
        Ok(self.posts.posts_by(user).await?)
    }

    /// Posts whose content or author name contains `query`.
    /// A blank query returns nothing.
    pub async fn search(&self, query: &str) -> Result<Vec<PostView>, PostError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.posts.search_posts(query).await?)
    }

    pub async fn add_comment(
        &self,
        caller: Option<UserId>,
        post_id: &Uuid,
        request: AddCommentRequest,
    ) -> Result<CommentView, PostError> {
        let author = caller.ok_or(PostError::Unauthorized)?;
        let content = request
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| PostError::InvalidRequest("content required".to_string()))?;
        self.require_post(post_id).await?;
        let user = self
            .users
            .get_user(&author)
            .await?
            .ok_or(PostError::UserNotFound)?;

        let comment = Comment::new(
            *post_id,
            author,
            sanitize::apply(self.comment_sanitizer, &content),
        );
        self.posts.add_comment(&comment).await?;
        info!(post = %post_id, comment = %comment.id, author = %author, "Comment added");

        Ok(CommentView {
            id: comment.id,
            content: comment.content,
            name: user.name,
            username: user.username,
            avatar: user.avatar,
            created_at: comment.created_at,
        })
    }

    /// Comments on a post, oldest first.
    pub async fn comments(&self, post_id: &Uuid) -> Result<Vec<CommentView>, PostError> {
        self.require_post(post_id).await?;
        Ok(self.posts.comments_for(post_id).await?)
    }

    /// Like the post if the caller hasn't yet, otherwise take the like back.
    pub async fn toggle_like(
        &self,
        caller: Option<UserId>,
        post_id: &Uuid,
    ) -> Result<LikeOutcome, PostError> {
        let user = caller.ok_or(PostError::Unauthorized)?;
        self.require_post(post_id).await?;
        let outcome = self.posts.toggle_like(post_id, &user).await?;
        debug!(post = %post_id, user = %user, liked = outcome.liked, count = outcome.like_count, "Like toggled");
        Ok(outcome)
    }

    /// Give each seeded persona one post, then drop one to three persona
    /// comments under every post. Does nothing once any post exists.
    pub async fn seed_posts(&self) -> Result<usize, PostError> {
        if self.posts.count_posts().await? > 0 {
            info!("Posts already present, skipping post seed");
            return Ok(0);
        }

        let mut authors: Vec<User> = Vec::with_capacity(PERSONAS.len());
        for profile in PERSONAS {
            match self.users.get_user_by_username(profile.username).await? {
                Some(user) => authors.push(user),
                None => debug!(username = profile.username, "Persona missing, no seed post"),
            }
        }

        let mut posts = Vec::with_capacity(authors.len());
        for (author, seed) in authors.iter().zip(SEED_POSTS) {
            let post = Post {
                is_cached: true,
                ..Post::new(author.id, seed.content, seed.image_url, "")
            };
            self.posts.create_post(&post).await?;
            posts.push(post.id);
        }

        for comment in seed_comments(&posts, &authors) {
            self.posts.add_comment(&comment).await?;
        }

        info!(count = posts.len(), "Seeded persona posts");
        Ok(posts.len())
    }

    async fn require_post(&self, id: &Uuid) -> Result<PostView, PostError> {
        self.posts.get_post(id).await?.ok_or(PostError::PostNotFound)
    }
}

/// Random persona comments for each post. The thread rng stays inside this
/// synchronous function so callers' futures remain `Send`.
fn seed_comments(posts: &[Uuid], authors: &[User]) -> Vec<Comment> {
    let mut rng = rand::thread_rng();
    let mut comments = Vec::new();
    for post in posts {
        for _ in 0..rng.gen_range(1..=MAX_SEED_COMMENTS) {
            let (Some(author), Some(text)) = (authors.choose(&mut rng), SEED_COMMENTS.choose(&mut rng))
            else {
                continue;
            };
            comments.push(Comment::new(*post, author.id, *text));
        }
    }
    comments
}
