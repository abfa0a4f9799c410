//! Shared data model for the chat client.
//!
//! This crate defines the conversation/message types that the rest of
//! the workspace operates on, plus the contract that completion
//! providers implement. Types here don't define any behavior beyond
//! trivial constructors and accessors; the interesting logic lives in
//! the other crates.

#![deny(missing_docs)]

mod conversation;
mod error;
mod message;
mod provider;

pub use conversation::*;
pub use error::*;
pub use message::*;
pub use provider::*;
