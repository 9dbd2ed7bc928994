//! Public types for the chat API
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct ChatRequest {
    /// Omitted on the first message; the response echoes the id to
    /// use for follow-ups (e.g. answering a "which one?" question).
    pub conversation_id: Option<String>,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub conversation_id: String,
    pub text: String,
}
