//! Typed trust contexts — the message lists the two loops build.
//!
//! The trusted loop and the delegated sub-agent each hold a `Context`
//! parameterized by a trust level. The two levels are distinct types with
//! no conversion between them, so accidentally appending an untrusted
//! message to the trusted context (or unioning the lists) is a compile
//! error, not a runtime bug. Only a plain `String` — the sub-agent's final
//! answer — ever crosses the boundary.

use std::marker::PhantomData;
use steward_core::chat::ChatMessage;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Trusted {}
    impl Sealed for super::Untrusted {}
}

/// Marker trait for trust levels. Sealed: exactly two levels exist.
pub trait TrustLevel: sealed::Sealed {}

/// The primary conversation, carrying the user's private context.
pub struct Trusted;
impl TrustLevel for Trusted {}

/// The delegated sub-agent's isolated conversation.
pub struct Untrusted;
impl TrustLevel for Untrusted {}

/// A message list tagged with the trust level of the loop that owns it.
pub struct Context<L: TrustLevel> {
    messages: Vec<ChatMessage>,
    _level: PhantomData<L>,
}

impl<L: TrustLevel> Context<L> {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            _level: PhantomData,
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
