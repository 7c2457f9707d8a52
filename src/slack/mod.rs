//! All Slack-specific functionality

pub mod api;
pub mod client;

// Re-export main types for convenience
pub use api::WorkspaceApi;
pub use client::{SlackClient, build_post_message_payload, parse_history_response};
