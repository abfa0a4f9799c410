//! Structure detection and rendering for AI message text.
//!
//! Free-form model output tends to contain recognizable shapes: code
//! blocks, tables, checklists, Q&A exchanges, step lists and so on.
//! This crate partitions a message into typed sections with a
//! line-level heuristic scan ([`classify`]) and maps each section to a
//! presentation tree ([`render`]) for the UI layer to style.
//!
//! Everything here is pure and synchronous. Classification is re-run
//! on every revealed prefix while a message animates, so the scan is a
//! single left-to-right pass with no backtracking.
//!
//! The heuristics are best-effort by design: ambiguous input never
//! fails, it falls back to plain prose.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod classify;
mod cleanup;
mod predicates;
mod render;
mod section;

pub use classify::classify;
pub use cleanup::cleanup;
pub use render::*;
pub use section::*;
