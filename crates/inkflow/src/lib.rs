//! An out-of-the-box chat client core that assembles conversation
//! state, persistence, content rendering and the typewriter reveal.
//!
//! The crate includes a CLI tool for chatting in the terminal. And you
//! can also use it as a library to bring the chat pipeline into your
//! own host apps.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod client;
mod session;

pub use client::CompletionClient;
pub use session::{ChatError, ChatSession, ChatSessionBuilder};

/// Re-exports of the [`inkflow_model`] crate.
pub mod model {
    pub use inkflow_model::*;
}

/// Re-exports of the [`inkflow_content`] crate.
pub mod content {
    pub use inkflow_content::*;
}

/// Re-exports of the [`inkflow_reveal`] crate.
pub mod reveal {
    pub use inkflow_reveal::*;
}

/// Re-exports of the [`inkflow_store`] crate.
pub mod store {
    pub use inkflow_store::*;
}

/// Runs the full presentation pipeline over a message text.
///
/// Partitions the text into sections (cleaning up malformed markup on
/// the way) and maps each section to a render node. This is what a UI
/// calls on every revealed prefix while a message animates, and once
/// more on the final text.
pub fn render_content(text: &str) -> Vec<inkflow_content::RenderNode> {
    inkflow_content::classify(text)
        .iter()
        .map(inkflow_content::render)
        .collect()
}

#[cfg(test)]
mod tests {
    use inkflow_content::RenderNode;

    use super::*;

    #[test]
    fn test_render_content_pipeline() {
        let nodes = render_content(
            "Here is the fix:\n```rust\nlet x = 1;\n```\nDone.",
        );
        assert_eq!(nodes.len(), 3);
        assert!(matches!(&nodes[1], RenderNode::CodeBlock { .. }));
    }

    #[test]
    fn test_render_content_survives_partial_prefixes() {
        // A mid-reveal prefix can end inside a fence.
        let nodes = render_content("Look:\n```rust\nlet x =");
        assert!(!nodes.is_empty());
    }
}
