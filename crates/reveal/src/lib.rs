//! Simulated token-by-token reveal of completed messages.
//!
//! Completion responses arrive whole, but the client shows them with
//! a typewriter effect to mimic incremental generation. This crate
//! splits a finished message into reveal tokens ([`tokenize`]) and
//! drives a timed, pausable reveal of them ([`RevealSession`]) with
//! content-aware per-token delays.
//!
//! The reveal is purely presentational: it never mutates the message,
//! and losing a session mid-flight just leaves the text partially
//! shown until the next full render.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod delay;
mod session;
mod tokenizer;

pub use delay::reveal_delay;
pub use session::{CURSOR_GLYPH, RevealFrame, RevealSession, SessionStatus};
pub use tokenizer::{RevealToken, tokenize};
