//! Span field names and operation labels shared by the HTTP handlers.

/// Id of the authenticated caller, or `anonymous`.
pub const CALLER_ID: &str = "xssbook.caller_id";

/// Name of the service operation (e.g. "send_message").
pub const OPERATION: &str = "xssbook.operation";

pub const OP_SEND_MESSAGE: &str = "send_message";
pub const OP_START_CONVERSATION: &str = "start_conversation";
pub const OP_GET_MESSAGES: &str = "get_messages";
pub const OP_LIST_CONVERSATIONS: &str = "list_conversations";
pub const OP_SEND_FRIEND_REQUEST: &str = "send_friend_request";
pub const OP_RESPOND_FRIEND_REQUEST: &str = "respond_friend_request";
pub const OP_GENERATE_REQUESTS: &str = "generate_requests";
pub const OP_MARK_NOTIFICATION_READ: &str = "mark_notification_read";
pub const OP_CREATE_POST: &str = "create_post";
pub const OP_ADD_COMMENT: &str = "add_comment";
pub const OP_LIKE_POST: &str = "like_post";
