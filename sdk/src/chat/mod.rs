pub mod api;
mod model;

pub use model::{ChatClient, ChatClientOptions, ChatMessage, ChatRole, FALLBACK_REPLY};
