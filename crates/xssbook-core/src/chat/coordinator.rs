//! Conversation coordinator.
//!
//! Gates every message flow on friendship, persists human messages, and
//! answers on behalf of persona receivers. Reply synthesis can never fail a
//! send: a generator error is logged and replaced with a fixed reply.

use tracing::{debug, info, warn};
use xssbook_types::error::ChatError;
use xssbook_types::friendship::FriendshipState;
use xssbook_types::message::{
    ConversationSummary, DirectMessage, MessageView, SendMessageRequest, SendReceipt,
    StartConversationRequest, StarterOutcome,
};
use xssbook_types::user::{User, UserId, UserSummary};

use crate::repository::friendship::FriendshipRepository;
use crate::repository::message::MessageRepository;
use crate::repository::user::UserRepository;
use crate::responder::{FALLBACK_REPLY, FALLBACK_STARTER, ReplyGenerator};
use crate::service::credential::CredentialHasher;
use crate::service::persona::PersonaDetector;

const MESSAGE_FRIENDS_ONLY: &str = "You can only message friends";
const VIEW_FRIENDS_ONLY: &str = "You can only view messages from friends";

/// Orchestrates direct messages and persona replies.
///
/// Generic over the repositories, the reply generator, and the credential
/// hasher used for persona detection, so xssbook-core never depends on
/// xssbook-infra.
pub struct ConversationCoordinator<U, F, M, G, H>
where
    U: UserRepository,
    F: FriendshipRepository,
    M: MessageRepository,
    G: ReplyGenerator,
    H: CredentialHasher,
{
    users: U,
    friendships: F,
    messages: M,
    generator: G,
    personas: PersonaDetector<H>,
}

impl<U, F, M, G, H> ConversationCoordinator<U, F, M, G, H>
where
    U: UserRepository,
    F: FriendshipRepository,
    M: MessageRepository,
    G: ReplyGenerator,
    H: CredentialHasher,
{
    pub fn new(users: U, friendships: F, messages: M, generator: G, personas: PersonaDetector<H>) -> Self {
        Self {
            users,
            friendships,
            messages,
            generator,
            personas,
        }
    }

    /// Send a message from the caller to a friend.
    ///
    /// When the receiver is a persona, its reply is synthesized first and
    /// stored together with the caller's message, so a failed send leaves
    /// nothing behind.
    pub async fn send_message(
        &self,
        caller: Option<UserId>,
        request: SendMessageRequest,
    ) -> Result<SendReceipt, ChatError> {
        let sender = caller.ok_or(ChatError::Unauthorized)?;
        let (Some(receiver_id), Some(content)) =
            (request.receiver_id, request.content.filter(|c| !c.is_empty()))
        else {
            return Err(ChatError::InvalidRequest("Missing content or receiver".to_string()));
        };

        self.require_friends(&sender, &receiver_id, MESSAGE_FRIENDS_ONLY).await?;

        let message = DirectMessage::new(sender, receiver_id, content);
        let reply = match self.persona(&receiver_id).await? {
            Some(persona) => {
                let text = self.synthesize_reply(&message.content, &persona);
                Some(DirectMessage::new(receiver_id, sender, text))
            }
            None => None,
        };

        self.messages.insert_exchange(&message, reply.as_ref()).await?;
        info!(sender = %sender, receiver = %receiver_id, message_id = %message.id, "Message sent");
        if let Some(reply) = &reply {
            info!(persona = %receiver_id, receiver = %sender, message_id = %reply.id, "Persona replied");
        }

        Ok(SendReceipt {
            message_id: message.id,
            reply_id: reply.map(|r| r.id),
        })
    }

    /// Open a conversation with a friend.
    ///
    /// Only a persona with no prior messages in the pair speaks first; every
    /// other case succeeds without writing anything. The emptiness check is
    /// repeated inside the insert, so concurrent starts store one opener.
    pub async fn start_conversation(
        &self,
        caller: Option<UserId>,
        request: StartConversationRequest,
    ) -> Result<StarterOutcome, ChatError> {
        let initiator = caller.ok_or(ChatError::Unauthorized)?;
        let other_id = request
            .user_id
            .ok_or_else(|| ChatError::InvalidRequest("Missing user ID".to_string()))?;

        self.require_friends(&initiator, &other_id, MESSAGE_FRIENDS_ONLY).await?;

        if self.messages.count_messages_between(&initiator, &other_id).await? > 0 {
            debug!(initiator = %initiator, other = %other_id, "Conversation already started");
            return Ok(StarterOutcome::AlreadyStarted);
        }

        if self.persona(&other_id).await?.is_none() {
            return Ok(StarterOutcome::NotPersona);
        }

        let text = self.generator.starter().unwrap_or_else(|e| {
            warn!(persona = %other_id, error = %e, "Starter synthesis failed, using fallback");
            FALLBACK_STARTER.to_string()
        });
        let starter = DirectMessage::new(other_id, initiator, text);
        if !self.messages.insert_opening(&starter).await? {
            debug!(initiator = %initiator, other = %other_id, "Lost race to open conversation");
            return Ok(StarterOutcome::AlreadyStarted);
        }
        info!(persona = %other_id, receiver = %initiator, "Persona opened conversation");

        Ok(StarterOutcome::Sent)
    }

    /// Messages exchanged with `other`, oldest first.
    ///
    /// Messages from `other` to the caller are marked read after they are
    /// fetched, so the returned views still carry their previous read flag.
    pub async fn get_messages(
        &self,
        caller: Option<UserId>,
        other: &UserId,
    ) -> Result<Vec<MessageView>, ChatError> {
        let user = caller.ok_or(ChatError::Unauthorized)?;
        self.require_friends(&user, other, VIEW_FRIENDS_ONLY).await?;

        let messages = self.messages.conversation(&user, other).await?;
        let marked = self.messages.mark_read(other, &user).await?;
        debug!(user = %user, other = %other, count = messages.len(), marked, "Loaded conversation");
        Ok(messages)
    }

    /// One summary per counterpart, most recent exchange first.
    pub async fn list_conversations(
        &self,
        caller: Option<UserId>,
    ) -> Result<Vec<ConversationSummary>, ChatError> {
        let user = caller.ok_or(ChatError::Unauthorized)?;
        Ok(self.messages.conversations_for(&user).await?)
    }

    /// Public profile of any user.
    pub async fn user_info(&self, caller: Option<UserId>, id: &UserId) -> Result<UserSummary, ChatError> {
        caller.ok_or(ChatError::Unauthorized)?;
        self.users
            .get_user(id)
            .await?
            .map(|u| u.summary())
            .ok_or_else(|| ChatError::NotFound("User not found".to_string()))
    }

    /// The user behind `id` when it is a persona.
    async fn persona(&self, id: &UserId) -> Result<Option<User>, ChatError> {
        let Some(user) = self.users.get_user(id).await? else {
            return Ok(None);
        };
        Ok(self.personas.is_persona(&user).await.then_some(user))
    }

    fn synthesize_reply(&self, message: &str, persona: &User) -> String {
        match self.generator.reply(message, &persona.name) {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                warn!(persona = %persona.id, "Generator returned an empty reply, using fallback");
                FALLBACK_REPLY.to_string()
            }
            Err(e) => {
                warn!(persona = %persona.id, error = %e, "Reply synthesis failed, using fallback");
                FALLBACK_REPLY.to_string()
            }
        }
    }

    async fn require_friends(&self, a: &UserId, b: &UserId, reason: &str) -> Result<(), ChatError> {
        let state = self.friendships.friendship_state(a, b).await?;
        if state != FriendshipState::Friends {
            debug!(user = %a, other = %b, state = %state, "Friendship precondition unmet");
            return Err(ChatError::Forbidden(reason.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responder::ResponseEngine;
    use crate::responder::rules;
    use crate::testing::{
        FailingGenerator, FixedGenerator, MemoryStore, PERSONA_PASSWORD, PlainHasher,
        UnreachableUsers,
    };
    use xssbook_types::error::RepositoryError;

    type Coordinator<G> = ConversationCoordinator<MemoryStore, MemoryStore, MemoryStore, G, PlainHasher>;

    fn coordinator<G: ReplyGenerator>(store: &MemoryStore, generator: G) -> Coordinator<G> {
        ConversationCoordinator::new(
            store.clone(),
            store.clone(),
            store.clone(),
            generator,
            PersonaDetector::new(PlainHasher, PERSONA_PASSWORD),
        )
    }

    fn send(to: &User, content: &str) -> SendMessageRequest {
        SendMessageRequest {
            receiver_id: Some(to.id),
            content: Some(content.to_string()),
        }
    }

    fn start(with: &User) -> StartConversationRequest {
        StartConversationRequest {
            user_id: Some(with.id),
        }
    }

    #[tokio::test]
    async fn test_send_requires_caller_and_fields() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", false);
        let bob = store.add_user("bob", false);
        store.befriend(&alice, &bob);
        let chat = coordinator(&store, FixedGenerator("ok"));

        assert!(matches!(
            chat.send_message(None, send(&bob, "hi")).await,
            Err(ChatError::Unauthorized)
        ));
        assert!(matches!(
            chat.send_message(Some(alice.id), send(&bob, "")).await,
            Err(ChatError::InvalidRequest(_))
        ));
        assert!(matches!(
            chat.send_message(
                Some(alice.id),
                SendMessageRequest {
                    receiver_id: None,
                    content: Some("hi".to_string())
                }
            )
            .await,
            Err(ChatError::InvalidRequest(_))
        ));
        assert!(store.messages().is_empty());
    }

    #[tokio::test]
    async fn test_send_to_non_friend_is_forbidden_and_persists_nothing() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", false);
        let bob = store.add_user("bob", false);
        let persona = store.add_user("penny", true);
        let chat = coordinator(&store, FixedGenerator("ok"));

        for target in [&bob, &persona] {
            let err = chat.send_message(Some(alice.id), send(target, "hello")).await.unwrap_err();
            assert!(matches!(err, ChatError::Forbidden(_)));
        }
        assert!(store.messages().is_empty());
    }

    #[tokio::test]
    async fn test_send_to_human_persists_one_message() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", false);
        let bob = store.add_user("bob", false);
        store.befriend(&alice, &bob);
        let chat = coordinator(&store, FixedGenerator("should not appear"));

        let receipt = chat.send_message(Some(alice.id), send(&bob, "hello")).await.unwrap();
        assert!(receipt.reply_id.is_none());

        let messages = store.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender_id, alice.id);
        assert_eq!(messages[0].content, "hello");
        assert!(!messages[0].is_read);
    }

    #[tokio::test]
    async fn test_send_to_persona_persists_reply() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", false);
        let persona = store.add_user("penny", true);
        store.befriend(&alice, &persona);
        let chat = coordinator(&store, ResponseEngine::with_seed(7));

        let receipt = chat.send_message(Some(alice.id), send(&persona, "hello!")).await.unwrap();
        let messages = store.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(receipt.reply_id, Some(messages[1].id));

        let reply = &messages[1];
        assert_eq!(reply.sender_id, persona.id);
        assert_eq!(reply.receiver_id, alice.id);
        assert!(!reply.is_read);
        let greetings = rules::candidates(rules::RuleCategory::Greeting);
        assert!(greetings.contains(&reply.content.as_str()));
    }

    #[tokio::test]
    async fn test_send_to_persona_falls_back_when_synthesis_fails() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", false);
        let persona = store.add_user("penny", true);
        store.befriend(&alice, &persona);
        let chat = coordinator(&store, FailingGenerator);

        chat.send_message(Some(alice.id), send(&persona, "anything")).await.unwrap();
        let messages = store.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, FALLBACK_REPLY);
        assert_eq!(messages[1].sender_id, persona.id);
    }

    #[tokio::test]
    async fn test_failed_reply_write_drops_the_whole_exchange() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", false);
        let persona = store.add_user("penny", true);
        store.befriend(&alice, &persona);
        store.reject_replies();
        let chat = coordinator(&store, FixedGenerator("hey"));

        let err = chat.send_message(Some(alice.id), send(&persona, "hello")).await.unwrap_err();
        assert!(matches!(err, ChatError::Storage(_)));
        assert!(store.messages().is_empty());
    }

    #[tokio::test]
    async fn test_failed_receiver_lookup_persists_nothing() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", false);
        let persona = store.add_user("penny", true);
        store.befriend(&alice, &persona);
        let chat = ConversationCoordinator::new(
            UnreachableUsers,
            store.clone(),
            store.clone(),
            FixedGenerator("hey"),
            PersonaDetector::new(PlainHasher, PERSONA_PASSWORD),
        );

        let err = chat.send_message(Some(alice.id), send(&persona, "hello")).await.unwrap_err();
        assert!(matches!(err, ChatError::Storage(RepositoryError::Connection)));
        assert!(store.messages().is_empty());
    }

    #[tokio::test]
    async fn test_empty_generator_output_is_replaced() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", false);
        let persona = store.add_user("penny", true);
        store.befriend(&alice, &persona);
        let chat = coordinator(&store, FixedGenerator(""));

        chat.send_message(Some(alice.id), send(&persona, "hi")).await.unwrap();
        assert_eq!(store.messages()[1].content, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_start_with_human_is_idempotent_noop() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", false);
        let bob = store.add_user("bob", false);
        store.befriend(&alice, &bob);
        let chat = coordinator(&store, FixedGenerator("Hi!"));

        for _ in 0..2 {
            let outcome = chat.start_conversation(Some(alice.id), start(&bob)).await.unwrap();
            assert_eq!(outcome, StarterOutcome::NotPersona);
        }
        assert!(store.messages().is_empty());
    }

    #[tokio::test]
    async fn test_start_with_persona_sends_once() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", false);
        let persona = store.add_user("penny", true);
        store.befriend(&alice, &persona);
        let chat = coordinator(&store, ResponseEngine::with_seed(3));

        let first = chat.start_conversation(Some(alice.id), start(&persona)).await.unwrap();
        assert_eq!(first, StarterOutcome::Sent);
        let second = chat.start_conversation(Some(alice.id), start(&persona)).await.unwrap();
        assert_eq!(second, StarterOutcome::AlreadyStarted);

        let messages = store.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender_id, persona.id);
        assert_eq!(messages[0].receiver_id, alice.id);
        assert!(rules::CONVERSATION_STARTERS.contains(&messages[0].content.as_str()));
    }

    #[tokio::test]
    async fn test_start_falls_back_when_synthesis_fails() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", false);
        let persona = store.add_user("penny", true);
        store.befriend(&alice, &persona);
        let chat = coordinator(&store, FailingGenerator);

        chat.start_conversation(Some(alice.id), start(&persona)).await.unwrap();
        assert_eq!(store.messages()[0].content, FALLBACK_STARTER);
    }

    #[tokio::test]
    async fn test_start_preconditions() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", false);
        let persona = store.add_user("penny", true);
        let chat = coordinator(&store, FixedGenerator("Hi!"));

        assert!(matches!(
            chat.start_conversation(None, start(&persona)).await,
            Err(ChatError::Unauthorized)
        ));
        assert!(matches!(
            chat.start_conversation(Some(alice.id), StartConversationRequest::default()).await,
            Err(ChatError::InvalidRequest(_))
        ));
        assert!(matches!(
            chat.start_conversation(Some(alice.id), start(&persona)).await,
            Err(ChatError::Forbidden(_))
        ));
        assert!(store.messages().is_empty());
    }

    #[tokio::test]
    async fn test_get_messages_marks_incoming_read() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", false);
        let persona = store.add_user("penny", true);
        store.befriend(&alice, &persona);
        let chat = coordinator(&store, FixedGenerator("Sure!"));
        chat.send_message(Some(alice.id), send(&persona, "ping")).await.unwrap();

        let views = chat.get_messages(Some(alice.id), &persona.id).await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].content, "ping");
        assert_eq!(views[0].sender_name, "Alice");
        assert_eq!(views[1].content, "Sure!");
        assert_eq!(views[1].sender_name, "Penny");
        assert!(!views[1].is_read);

        let messages = store.messages();
        let reply = messages.iter().find(|m| m.sender_id == persona.id).unwrap();
        let sent = messages.iter().find(|m| m.sender_id == alice.id).unwrap();
        assert!(reply.is_read);
        assert!(!sent.is_read);
    }

    #[tokio::test]
    async fn test_get_messages_requires_friendship() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", false);
        let bob = store.add_user("bob", false);
        let chat = coordinator(&store, FixedGenerator("x"));

        assert!(matches!(
            chat.get_messages(Some(alice.id), &bob.id).await,
            Err(ChatError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_list_conversations_tracks_unread() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", false);
        let persona = store.add_user("penny", true);
        let bob = store.add_user("bob", false);
        store.befriend(&alice, &persona);
        store.befriend(&alice, &bob);
        let chat = coordinator(&store, FixedGenerator("Tell me more"));

        chat.send_message(Some(alice.id), send(&bob, "hey bob")).await.unwrap();
        chat.send_message(Some(alice.id), send(&persona, "hey penny")).await.unwrap();

        let conversations = chat.list_conversations(Some(alice.id)).await.unwrap();
        assert_eq!(conversations.len(), 2);
        let penny = conversations.iter().find(|c| c.other_user.id == persona.id).unwrap();
        assert_eq!(penny.last_message, "Tell me more");
        assert_eq!(penny.unread_count, 1);
        let with_bob = conversations.iter().find(|c| c.other_user.id == bob.id).unwrap();
        assert_eq!(with_bob.unread_count, 0);

        chat.get_messages(Some(alice.id), &persona.id).await.unwrap();
        let conversations = chat.list_conversations(Some(alice.id)).await.unwrap();
        assert!(conversations.iter().all(|c| c.unread_count == 0));
    }

    #[tokio::test]
    async fn test_user_info() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice", false);
        let bob = store.add_user("bob", false);
        let chat = coordinator(&store, FixedGenerator("x"));

        let info = chat.user_info(Some(alice.id), &bob.id).await.unwrap();
        assert_eq!(info.username, "bob");
        assert!(info.avatar.ends_with("text=B"));
        assert!(matches!(
            chat.user_info(Some(alice.id), &UserId::new()).await,
            Err(ChatError::NotFound(_))
        ));
    }
}
