//! Terminal rendering of a [`ChatSession`].
//!
//! The view remembers how much of the transcript it has already printed, so every
//! call to [`TranscriptView::render`] appends only new messages and the newest one
//! always ends up at the bottom of the terminal.

use std::io::{self, Write};

use crate::messages::{Message, Role};
use crate::session::ChatSession;

/// Transient indicator shown after the last message while a request is in flight.
pub const LOADING_TEXT: &str = "Consulting the Archives...";

const ASSISTANT_LABEL: &str = "Samvidhan AI";
const USER_LABEL: &str = "You";
const CLEAR_LINE: &str = "\r\x1b[2K";

#[derive(Debug)]
pub struct TranscriptView {
    shown: usize,
    indicator: bool,
    ansi: bool,
    echo_user: bool,
}

impl TranscriptView {
    /// `ansi` enables the loading indicator (it is erased with an escape sequence,
    /// so it is skipped on plain pipes). `echo_user` prints user messages too; turn it
    /// off when the user typed them into the same terminal.
    pub fn new(ansi: bool, echo_user: bool) -> Self {
        Self {
            shown: 0,
            indicator: false,
            ansi,
            echo_user,
        }
    }

    /// Number of transcript entries already written.
    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn render<W: Write>(&mut self, session: &ChatSession, out: &mut W) -> io::Result<()> {
        if self.indicator && !session.is_busy() {
            write!(out, "{CLEAR_LINE}")?;
            self.indicator = false;
        }

        let transcript = session.transcript();
        for message in transcript.iter().skip(self.shown) {
            self.write_message(message, out)?;
        }
        self.shown = transcript.len();

        if self.ansi && session.is_busy() && !self.indicator {
            write!(out, "{LOADING_TEXT}")?;
            self.indicator = true;
        }
        out.flush()
    }

    fn write_message<W: Write>(&self, message: &Message, out: &mut W) -> io::Result<()> {
        match message.role {
            Role::Assistant => writeln!(out, "{ASSISTANT_LABEL}: {}\n", message.content),
            Role::User if self.echo_user => writeln!(out, "{USER_LABEL}: {}\n", message.content),
            Role::User => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::GREETING;

    fn rendered(buf: &[u8]) -> String {
        String::from_utf8(buf.to_vec()).unwrap()
    }

    #[test]
    fn first_render_shows_greeting_once() {
        let session = ChatSession::new();
        let mut view = TranscriptView::new(false, true);
        let mut out = Vec::new();

        view.render(&session, &mut out).unwrap();
        view.render(&session, &mut out).unwrap();

        let text = rendered(&out);
        assert_eq!(text.matches(GREETING).count(), 1);
        assert_eq!(view.shown(), 1);
    }

    #[test]
    fn indicator_shown_while_busy_and_erased_after() {
        let mut session = ChatSession::new();
        let mut view = TranscriptView::new(true, true);
        let mut out = Vec::new();
        view.render(&session, &mut out).unwrap();

        session.update_draft("What is Article 21?");
        let turn = session.begin_submit().unwrap();
        view.render(&session, &mut out).unwrap();
        let busy_text = rendered(&out);
        assert!(busy_text.contains("You: What is Article 21?"));
        assert!(busy_text.ends_with(LOADING_TEXT));

        session
            .complete(turn, Ok("Article 21 protects life and liberty.".into()))
            .unwrap();
        view.render(&session, &mut out).unwrap();
        let text = rendered(&out);
        assert_eq!(text.matches(LOADING_TEXT).count(), 1);
        assert!(text.contains(&format!("{LOADING_TEXT}{CLEAR_LINE}Samvidhan AI: Article 21")));
    }

    #[test]
    fn plain_output_skips_indicator_and_user_echo() {
        let mut session = ChatSession::new();
        let mut view = TranscriptView::new(false, false);
        let mut out = Vec::new();

        session.update_draft("hello");
        let _turn = session.begin_submit().unwrap();
        view.render(&session, &mut out).unwrap();

        let text = rendered(&out);
        assert!(!text.contains(LOADING_TEXT));
        assert!(!text.contains("hello"));
        assert_eq!(view.shown(), 2);
    }
}
