//! Friend-request workflow.
//!
//! Persona receivers accept immediately; human receivers get a
//! notification and answer later through `respond`. Every entry point takes
//! the resolved caller (`None` when the request carried no valid session).

use rand::seq::SliceRandom;
use tracing::{debug, info};
use xssbook_types::error::FriendError;
use xssbook_types::friendship::{
    FriendRequest, FriendRequestStatus, FriendshipState, IncomingRequest, RespondAction,
    RespondFriendRequest, SendFriendRequest, SendRequestOutcome,
};
use xssbook_types::notification::{Notification, NotificationKind};
use xssbook_types::user::{User, UserId, UserSummary};

use crate::repository::friendship::FriendshipRepository;
use crate::repository::user::UserRepository;

use super::credential::CredentialHasher;
use super::persona::PersonaDetector;

/// Maximum number of suggestions returned by `suggestions`.
pub const SUGGESTION_LIMIT: u32 = 10;

/// Shortest search query that is actually executed.
pub const MIN_SEARCH_CHARS: usize = 2;

/// Friend-request workflow over the user and friendship ports.
///
/// Notifications for each transition are written by the friendship
/// repository together with the state change.
pub struct FriendshipService<U, F, H>
where
    U: UserRepository,
    F: FriendshipRepository,
    H: CredentialHasher,
{
    users: U,
    friendships: F,
    personas: PersonaDetector<H>,
    max_generated_requests: usize,
}

impl<U, F, H> FriendshipService<U, F, H>
where
    U: UserRepository,
    F: FriendshipRepository,
    H: CredentialHasher,
{
    pub fn new(
        users: U,
        friendships: F,
        personas: PersonaDetector<H>,
        max_generated_requests: usize,
    ) -> Self {
        Self {
            users,
            friendships,
            personas,
            max_generated_requests,
        }
    }

    /// Send a friend request from the caller.
    ///
    /// A request to a persona is accepted on the spot and the caller is
    /// notified; otherwise the receiver is notified. A previously declined
    /// request for the same pair is reopened.
    pub async fn send_request(
        &self,
        caller: Option<UserId>,
        request: SendFriendRequest,
    ) -> Result<SendRequestOutcome, FriendError> {
        let sender_id = caller.ok_or(FriendError::Unauthorized)?;
        let receiver_id = request
            .receiver_id
            .ok_or_else(|| FriendError::InvalidRequest("receiver ID required".to_string()))?;

        if sender_id == receiver_id {
            return Err(FriendError::SelfRequest);
        }

        match self.friendships.friendship_state(&sender_id, &receiver_id).await? {
            FriendshipState::Friends => return Err(FriendError::AlreadyFriends),
            FriendshipState::RequestSent => return Err(FriendError::RequestAlreadySent),
            FriendshipState::RequestReceived => return Err(FriendError::RequestAlreadyReceived),
            FriendshipState::None => {}
        }

        let receiver = self.require_user(&receiver_id).await?;
        let sender = self.require_user(&sender_id).await?;

        let request = FriendRequest::pending(sender_id, receiver_id);

        if self.personas.is_persona(&receiver).await {
            let accepted = FriendRequest {
                status: FriendRequestStatus::Accepted,
                ..request
            };
            self.friendships
                .accept_request(&accepted, &accepted_notice(&sender, &receiver))
                .await?;
            info!(sender = %sender_id, receiver = %receiver_id, "Friend request auto-accepted by persona");
            return Ok(SendRequestOutcome::AutoAccepted);
        }

        self.friendships
            .open_request(&request, &request_notice(&sender, receiver_id))
            .await?;
        info!(sender = %sender_id, receiver = %receiver_id, "Friend request sent");
        Ok(SendRequestOutcome::Sent)
    }

    /// Accept or decline a pending request addressed to the caller.
    pub async fn respond(
        &self,
        caller: Option<UserId>,
        request: RespondFriendRequest,
    ) -> Result<RespondAction, FriendError> {
        let receiver_id = caller.ok_or(FriendError::Unauthorized)?;
        let action: RespondAction = request
            .action
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_| FriendError::InvalidRequest("invalid action".to_string()))?;
        let sender_id = request
            .sender_id
            .ok_or_else(|| FriendError::InvalidRequest("sender ID required".to_string()))?;

        let pending = self
            .friendships
            .find_request(&sender_id, &receiver_id)
            .await?
            .filter(|r| r.status == FriendRequestStatus::Pending)
            .ok_or(FriendError::RequestNotFound)?;

        match action {
            RespondAction::Accept => {
                let sender = self.require_user(&sender_id).await?;
                let receiver = self.require_user(&receiver_id).await?;
                let accepted = FriendRequest {
                    status: FriendRequestStatus::Accepted,
                    ..pending
                };
                self.friendships
                    .accept_request(&accepted, &accepted_notice(&sender, &receiver))
                    .await?;
                info!(sender = %sender_id, receiver = %receiver_id, "Friend request accepted");
            }
            RespondAction::Decline => {
                self.friendships
                    .set_request_status(&pending.id, FriendRequestStatus::Declined)
                    .await?;
                info!(sender = %sender_id, receiver = %receiver_id, "Friend request declined");
            }
        }
        Ok(action)
    }

    /// Pending requests addressed to the caller, newest first.
    pub async fn pending_requests(
        &self,
        caller: Option<UserId>,
    ) -> Result<Vec<IncomingRequest>, FriendError> {
        let user = caller.ok_or(FriendError::Unauthorized)?;
        Ok(self.friendships.pending_requests_for(&user).await?)
    }

    /// The caller's friends, ordered by name.
    pub async fn friends(&self, caller: Option<UserId>) -> Result<Vec<UserSummary>, FriendError> {
        let user = caller.ok_or(FriendError::Unauthorized)?;
        Ok(self.friendships.friends_of(&user).await?)
    }

    /// Friends whose name or username contains `query` (case-insensitive).
    /// Queries shorter than two characters return nothing.
    pub async fn search_friends(
        &self,
        caller: Option<UserId>,
        query: &str,
    ) -> Result<Vec<UserSummary>, FriendError> {
        let user = caller.ok_or(FriendError::Unauthorized)?;
        let query = query.trim().to_lowercase();
        if query.chars().count() < MIN_SEARCH_CHARS {
            return Ok(Vec::new());
        }
        let friends = self.friendships.friends_of(&user).await?;
        Ok(friends
            .into_iter()
            .filter(|f| {
                f.name.to_lowercase().contains(&query) || f.username.to_lowercase().contains(&query)
            })
            .collect())
    }

    /// People the caller could befriend: not already friends, no pending
    /// outgoing request.
    pub async fn suggestions(&self, caller: Option<UserId>) -> Result<Vec<UserSummary>, FriendError> {
        let user = caller.ok_or(FriendError::Unauthorized)?;
        Ok(self.friendships.suggestions_for(&user, SUGGESTION_LIMIT).await?)
    }

    /// Have a handful of random personas send the caller a friend request.
    ///
    /// Personas that already have a request row towards the caller (any
    /// status) are skipped. Returns the number of requests created.
    pub async fn generate_persona_requests(&self, caller: Option<UserId>) -> Result<usize, FriendError> {
        let user = caller.ok_or(FriendError::Unauthorized)?;

        let mut candidates: Vec<User> = self
            .users
            .list_users()
            .await?
            .into_iter()
            .filter(|u| u.id != user)
            .collect();
        candidates.shuffle(&mut rand::thread_rng());

        let mut personas = Vec::with_capacity(self.max_generated_requests);
        for candidate in candidates {
            if personas.len() >= self.max_generated_requests {
                break;
            }
            if self.personas.is_persona(&candidate).await {
                personas.push(candidate);
            }
        }

        let mut created = 0;
        for persona in personas {
            if self.friendships.find_request(&persona.id, &user).await?.is_some() {
                debug!(persona = %persona.id, "Request from persona already exists");
                continue;
            }
            self.friendships
                .open_request(
                    &FriendRequest::pending(persona.id, user),
                    &request_notice(&persona, user),
                )
                .await?;
            created += 1;
        }

        info!(user = %user, created, "Generated persona friend requests");
        Ok(created)
    }

    async fn require_user(&self, id: &UserId) -> Result<User, FriendError> {
        self.users.get_user(id).await?.ok_or(FriendError::UserNotFound)
    }

}

fn request_notice(sender: &User, receiver: UserId) -> Notification {
    Notification::new(
        receiver,
        NotificationKind::FriendRequest,
        format!("{} sent you a friend request!", sender.name),
        Some(sender.id),
    )
}

fn accepted_notice(sender: &User, receiver: &User) -> Notification {
    Notification::new(
        sender.id,
        NotificationKind::FriendAccepted,
        format!("{} accepted your friend request!", receiver.name),
        Some(receiver.id),
    )
}
