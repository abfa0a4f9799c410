//! Conversation persistence and animation-state tracking.
//!
//! The store is deliberately a black box behind the
//! [`ConversationStore`] trait: the rest of the client only needs the
//! CRUD surface plus the `set_animated` flag update. An in-memory
//! implementation backs tests and the demo binary.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod memory;
mod store;
mod tracker;

pub use memory::MemoryStore;
pub use store::{ConversationStore, StoreError};
pub use tracker::AnimationTracker;
