use tokio::task::JoinHandle;

use crate::error::ChatError;
use crate::openai::OpenAIClient;
use crate::session::{reduce, SessionEvent, SessionState};

/// How many ticks a toast stays visible (ticks fire every 300ms).
const TOAST_TICKS: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Transient status message rendered in the footer.
#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
    ticks_left: u8,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct App {
    pub should_quit: bool,
    pub session: SessionState,

    // Input state
    pub cursor: usize, // cursor position in session.input, in chars

    // Chat view state
    pub chat_scroll: u16,
    pub chat_height: u16, // inner chat area size, updated during render
    pub chat_width: u16,
    pub animation_frame: u8, // 0-2 for the thinking ellipsis

    pub toast: Option<Toast>,

    client: Option<OpenAIClient>,
    chat_task: Option<JoinHandle<Result<String, ChatError>>>,
}

impl App {
    /// The client is injected at construction; `None` means no credential
    /// was configured and every submit fails before dispatch.
    pub fn new(client: Option<OpenAIClient>) -> Self {
        Self {
            should_quit: false,
            session: SessionState::default(),
            cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
            toast: None,
            client,
            chat_task: None,
        }
    }

    pub fn waiting(&self) -> bool {
        self.session.waiting
    }

    fn apply(&mut self, event: SessionEvent) {
        self.session = reduce(std::mem::take(&mut self.session), event);
    }

    pub fn notify(&mut self, kind: ToastKind, text: impl Into<String>) {
        self.toast = Some(Toast {
            kind,
            text: text.into(),
            ticks_left: TOAST_TICKS,
        });
    }

    /// Validates the pending input and dispatches it as the next user turn.
    ///
    /// Check order matters: empty input fails first, then a missing
    /// credential, both without touching the transcript. Only then is the
    /// user turn appended and the request spawned.
    pub fn submit(&mut self) {
        if self.session.waiting {
            return;
        }

        let text = self.session.input.trim().to_string();
        if text.is_empty() {
            self.notify(ToastKind::Error, ChatError::EmptyMessage.to_string());
            return;
        }

        let Some(client) = self.client.clone() else {
            self.notify(ToastKind::Error, ChatError::MissingApiKey.to_string());
            return;
        };

        self.apply(SessionEvent::SubmitRequested(text));
        self.cursor = 0;

        // The just-appended user turn rides along as the last message.
        let transcript = self.session.transcript.clone();
        self.chat_task = Some(tokio::spawn(async move {
            client.complete(&transcript).await
        }));

        self.scroll_to_bottom();
    }

    /// Resolves a finished request, if any. Called once per loop iteration;
    /// the 300ms tick guarantees we get here shortly after completion.
    pub async fn poll_response(&mut self) {
        if !self.chat_task.as_ref().is_some_and(|task| task.is_finished()) {
            return;
        }
        let Some(task) = self.chat_task.take() else {
            return;
        };

        match task.await {
            Ok(Ok(reply)) => {
                self.apply(SessionEvent::ResponseReceived(reply));
                self.notify(ToastKind::Success, "Response received");
            }
            Ok(Err(err)) => {
                tracing::error!(error = %err, "chat request failed");
                self.apply(SessionEvent::ResponseFailed);
                self.notify(ToastKind::Error, err.to_string());
            }
            Err(err) => {
                tracing::error!(error = %err, "chat task aborted");
                self.apply(SessionEvent::ResponseFailed);
                self.notify(ToastKind::Error, "Chat request aborted");
            }
        }

        self.scroll_to_bottom();
    }

    // Input editing. All of these are no-ops while a request is in flight,
    // matching the disabled input field.

    pub fn insert_char(&mut self, c: char) {
        if self.session.waiting {
            return;
        }
        let mut input = self.session.input.clone();
        let byte_pos = char_to_byte_index(&input, self.cursor);
        input.insert(byte_pos, c);
        self.cursor += 1;
        self.apply(SessionEvent::InputChanged(input));
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.session.waiting || self.cursor == 0 {
            return;
        }
        let mut input = self.session.input.clone();
        self.cursor -= 1;
        let byte_pos = char_to_byte_index(&input, self.cursor);
        input.remove(byte_pos);
        self.apply(SessionEvent::InputChanged(input));
    }

    pub fn delete(&mut self) {
        if self.session.waiting {
            return;
        }
        let char_count = self.session.input.chars().count();
        if self.cursor >= char_count {
            return;
        }
        let mut input = self.session.input.clone();
        let byte_pos = char_to_byte_index(&input, self.cursor);
        input.remove(byte_pos);
        self.apply(SessionEvent::InputChanged(input));
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        let char_count = self.session.input.chars().count();
        self.cursor = (self.cursor + 1).min(char_count);
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.session.input.chars().count();
    }

    /// Cursor position as (line, column) within the input, for rendering.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let mut line = 0;
        let mut col = 0;
        for c in self.session.input.chars().take(self.cursor) {
            if c == '\n' {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (line, col)
    }

    // Chat view scrolling

    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines);
    }

    /// Scroll the chat view so the newest message (or the thinking
    /// indicator) is visible. Wrap math mirrors the render layout.
    pub fn scroll_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;
        for msg in &self.session.transcript {
            total_lines += 1; // Role label line
            for line in msg.content.lines() {
                // Character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // Blank line after message
        }

        if self.session.waiting {
            total_lines += 2; // Label + thinking indicator
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }

    /// Advance the thinking animation and expire the toast. Driven by the
    /// tick event.
    pub fn tick(&mut self) {
        if self.session.waiting {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        if let Some(toast) = &mut self.toast {
            toast.ticks_left = toast.ticks_left.saturating_sub(1);
            if toast.ticks_left == 0 {
                self.toast = None;
            }
        }
    }
}
