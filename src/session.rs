//! Conversation state and the events that change it.
//!
//! Every session mutation flows through [`reduce`]. A submit clears the
//! input, appends the user turn and raises `waiting`; a resolution clears
//! `waiting` and appends exactly one assistant turn (the reply on success,
//! [`FALLBACK_REPLY`] on failure). The transcript is append-only.

/// A single turn in the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// Shown in place of a reply when a request fails after dispatch.
pub const FALLBACK_REPLY: &str = "Sorry, an error occurred. Please try again.";

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub transcript: Vec<ChatMessage>,
    pub input: String,
    pub waiting: bool,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The input field changed to this text. Ignored while waiting.
    InputChanged(String),
    /// A trimmed, non-empty message was submitted. Ignored while waiting.
    SubmitRequested(String),
    /// The in-flight request produced a reply.
    ResponseReceived(String),
    /// The in-flight request failed; the error itself is surfaced separately.
    ResponseFailed,
}

pub fn reduce(mut state: SessionState, event: SessionEvent) -> SessionState {
    match event {
        SessionEvent::InputChanged(text) => {
            if !state.waiting {
                state.input = text;
            }
        }
        SessionEvent::SubmitRequested(text) => {
            if !state.waiting {
                state.input.clear();
                state.transcript.push(ChatMessage::user(text));
                state.waiting = true;
            }
        }
        SessionEvent::ResponseReceived(reply) => {
            state.transcript.push(ChatMessage::assistant(reply));
            state.waiting = false;
        }
        SessionEvent::ResponseFailed => {
            state.transcript.push(ChatMessage::assistant(FALLBACK_REPLY));
            state.waiting = false;
        }
    }
    state
}
