//! Wire types for the live (bidirectional) and one-shot completion endpoints.

pub mod client_messages;
pub mod models;
pub mod server_messages;
