// src/message.rs

use crate::api::FeedbackEntry;
use crate::attachments::AttachmentHandle;
use chrono::{DateTime, Local};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// Rendering key of a message, unique within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// Locally numbered message.
    Seq(u64),
    /// Server-supplied key of a structured reply, scoped to the request
    /// that produced it.
    Key { request: u64, key: String },
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Seq(n) => write!(f, "#{}", n),
            MessageId::Key { key, .. } => f.write_str(key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    Attachment {
        handle: AttachmentHandle,
        filename: String,
        label: String,
    },
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub content: MessageContent,
    pub timestamp: DateTime<Local>,
}

impl Message {
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(text) => Some(text),
            MessageContent::Attachment { .. } => None,
        }
    }

    pub fn attachment(&self) -> Option<AttachmentHandle> {
        match &self.content {
            MessageContent::Attachment { handle, .. } => Some(*handle),
            MessageContent::Text(_) => None,
        }
    }
}

/// Append-only conversation history. Insertion order is display order.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
    next_seq: u64,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> MessageId {
        self.next_seq += 1;
        MessageId::Seq(self.next_seq)
    }

    fn push(&mut self, id: MessageId, sender: Sender, content: MessageContent) {
        self.messages.push(Message {
            id,
            sender,
            content,
            timestamp: Local::now(),
        });
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        let id = self.next_id();
        self.push(id, Sender::User, MessageContent::Text(text.into()));
    }

    pub fn push_attachment(&mut self, handle: AttachmentHandle, filename: &str, label: &str) {
        let id = self.next_id();
        self.push(
            id,
            Sender::Bot,
            MessageContent::Attachment {
                handle,
                filename: filename.to_string(),
                label: label.to_string(),
            },
        );
    }

    /// Appends one bot message per entry, in entry order.
    pub fn extend_entries(&mut self, request: u64, entries: Vec<FeedbackEntry>) {
        for entry in entries {
            self.push(
                MessageId::Key {
                    request,
                    key: entry.key,
                },
                Sender::Bot,
                MessageContent::Text(entry.content),
            );
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Newest attachment in the log, if any.
    pub fn latest_attachment(&self) -> Option<AttachmentHandle> {
        self.messages.iter().rev().find_map(Message::attachment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, content: &str) -> FeedbackEntry {
        FeedbackEntry {
            key: key.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_user_messages_get_sequential_ids() {
        let mut log = MessageLog::new();
        log.push_user("one");
        log.push_user("two");

        let ids: Vec<String> = log.iter().map(|m| m.id.to_string()).collect();
        assert_eq!(ids, vec!["#1", "#2"]);
        assert!(log.iter().all(|m| m.sender == Sender::User));
    }

    #[test]
    fn test_entries_keep_server_keys_and_order() {
        let mut log = MessageLog::new();
        log.extend_entries(7, vec![entry("a", "x"), entry("b", "y")]);

        let texts: Vec<&str> = log.iter().filter_map(Message::text).collect();
        assert_eq!(texts, vec!["x", "y"]);
        assert_eq!(
            log.last().map(|m| m.id.clone()),
            Some(MessageId::Key {
                request: 7,
                key: "b".to_string()
            })
        );
    }

    #[test]
    fn test_same_key_in_two_replies_stays_distinct() {
        let mut log = MessageLog::new();
        log.extend_entries(1, vec![entry("0", "first")]);
        log.extend_entries(2, vec![entry("0", "second")]);

        let ids: Vec<&MessageId> = log.iter().map(|m| &m.id).collect();
        assert_ne!(ids[0], ids[1]);
    }
}
