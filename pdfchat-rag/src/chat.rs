//! Chat completion provider trait and role-tagged messages.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The author of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A standing instruction to the model.
    System,
    /// A user turn.
    User,
    /// A model turn.
    Assistant,
}

/// A single role-tagged unit of a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who authored this message.
    pub role: Role,
    /// The message text.
    pub content: String,
}

impl Message {
    /// Create a message with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

/// A text-generation model taking an assembled prompt and returning a
/// completion.
///
/// The completion is returned verbatim; the core applies no
/// post-processing.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Generate a completion for the given message sequence.
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}
