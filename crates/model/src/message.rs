use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of a message, stable for the message's lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Generates a fresh unique id.
    #[inline]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for MessageId {
    #[inline]
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Who produced a message.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person using the app.
    User,
    /// The model.
    Assistant,
    /// System instructions.
    System,
}

/// An image attached to a message.
///
/// The `url` is either a provider-assigned public URL (once uploaded)
/// or a local path while the upload is pending.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attachment {
    /// URL or local path of the image.
    pub url: String,
    /// Original file name, if known.
    pub file_name: Option<String>,
}

/// One turn in a conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier of this message.
    pub id: MessageId,
    /// Who produced this message.
    pub role: Role,
    /// The full text of the message.
    ///
    /// Immutable once generation completes; mutated only through an
    /// explicit edit, which starts a fresh reveal cycle.
    pub content: String,
    /// Attached images, in order. May be empty.
    #[serde(default)]
    pub images: Vec<Attachment>,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// True once the reveal animation for this message has run to
    /// completion.
    ///
    /// Monotonic for a given id: once set, it is never reset. Edits
    /// and regenerations produce a new reveal cycle under a fresh id.
    #[serde(default)]
    pub has_animated: bool,
}

impl Message {
    fn new(role: Role, content: String, has_animated: bool) -> Self {
        Self {
            id: MessageId::generate(),
            role,
            content,
            images: Vec::new(),
            timestamp: Utc::now(),
            has_animated,
        }
    }

    /// Creates a user message.
    ///
    /// User messages have nothing to reveal, so they are born with
    /// `has_animated` already set.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::new(Role::User, content.into(), true)
    }

    /// Creates a freshly generated assistant message, eligible for a
    /// reveal session.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self::new(Role::Assistant, content.into(), false)
    }

    /// Creates a system message.
    #[inline]
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::new(Role::System, content.into(), true)
    }

    /// Attaches images to this message.
    #[inline]
    pub fn with_images(mut self, images: Vec<Attachment>) -> Self {
        self.images = images;
        self
    }
}
