//! 记忆层：面试对话历史与聊天消息

pub mod conversation;

pub use conversation::{ConversationEntry, ConversationHistory, Message, Role, DEFAULT_TOPIC};
