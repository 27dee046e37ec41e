//! Friendship repository trait definition.
//!
//! Covers two entity families:
//! - **Friend requests:** one row per ordered (sender, receiver) pair.
//! - **Friendships:** one row per unordered pair, stored in canonical order.
//!
//! The workflow methods (`open_request`, `accept_request`) also write the
//! notification that goes with each transition, in the same transaction.

use uuid::Uuid;
use xssbook_types::error::RepositoryError;
use xssbook_types::friendship::{FriendRequest, FriendRequestStatus, FriendshipState, IncomingRequest};
use xssbook_types::notification::Notification;
use xssbook_types::user::{UserId, UserSummary};

pub trait FriendshipRepository: Send + Sync {
    /// Relationship of `user` towards `other`.
    ///
    /// `Friends` wins over any pending request; otherwise a pending request
    /// from `user` is `RequestSent`, one from `other` is `RequestReceived`.
    fn friendship_state(
        &self,
        user: &UserId,
        other: &UserId,
    ) -> impl std::future::Future<Output = Result<FriendshipState, RepositoryError>> + Send;

    // -----------------------------------------------------------------------
    // Requests
    // -----------------------------------------------------------------------

    /// Insert a request, or reopen the existing row for the same ordered pair
    /// (status back to pending, timestamp refreshed). Returns the stored id.
    fn upsert_request(
        &self,
        request: &FriendRequest,
    ) -> impl std::future::Future<Output = Result<Uuid, RepositoryError>> + Send;

    /// Store `request` as pending (reopening any earlier row for the pair)
    /// and record `notice` atomically. Returns the stored request id.
    fn open_request(
        &self,
        request: &FriendRequest,
        notice: &Notification,
    ) -> impl std::future::Future<Output = Result<Uuid, RepositoryError>> + Send;

    /// Store `request` as accepted, create the friendship and record
    /// `notice`, all or nothing. Returns the stored request id.
    fn accept_request(
        &self,
        request: &FriendRequest,
        notice: &Notification,
    ) -> impl std::future::Future<Output = Result<Uuid, RepositoryError>> + Send;

    /// Find the request row for an ordered pair, whatever its status.
    fn find_request(
        &self,
        sender: &UserId,
        receiver: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<FriendRequest>, RepositoryError>> + Send;

    /// Update a request's status. Returns `NotFound` if the id is unknown.
    fn set_request_status(
        &self,
        id: &Uuid,
        status: FriendRequestStatus,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Pending requests addressed to `receiver`, newest first.
    fn pending_requests_for(
        &self,
        receiver: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<IncomingRequest>, RepositoryError>> + Send;

    // -----------------------------------------------------------------------
    // Friendships
    // -----------------------------------------------------------------------

    /// Record a friendship (idempotent).
    fn add_friendship(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Friends of `user`, ordered by display name.
    fn friends_of(
        &self,
        user: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<UserSummary>, RepositoryError>> + Send;

    /// Users who are neither friends of `user` nor targets of a pending
    /// request from `user`, ordered by display name.
    fn suggestions_for(
        &self,
        user: &UserId,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<UserSummary>, RepositoryError>> + Send;
}
