//! Chat with the compliance assistant, available once onboarding is done.

pub mod model;
pub mod prompts;
pub mod routes;

pub use model::ChatSession;
pub use routes::chat_routes;
