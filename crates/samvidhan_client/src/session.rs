//! Chat session: transcript, draft and busy flag, plus the single request/response
//! cycle with the answer service.
//!
//! A turn is either driven in one call with [`ChatSession::submit`], or split into
//! [`ChatSession::begin_submit`] and [`ChatSession::complete`] when the caller has to
//! redraw while the request is in flight.

use crate::client::{AnswerService, ClientError};
use crate::messages::Message;

/// Seeded assistant message present before any interaction.
pub const GREETING: &str =
    "Namaste! I am your Indian Constitution assistant. Ask me anything about rights, duties, or articles.";

/// Assistant reply appended for every failed answer request, whatever the cause.
pub const FALLBACK_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Why a mutator left the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejected {
    #[error("draft is empty")]
    EmptyDraft,
    #[error("a request is already in flight")]
    Busy,
    #[error("turn does not belong to the in-flight request")]
    StaleTurn,
}

/// How a completed turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Answered,
    Fallback,
}

/// The single in-flight submission. Not `Clone`: a turn is completed at most once.
/// Dropping it without calling [`ChatSession::complete`] leaves the session busy.
#[derive(Debug)]
#[must_use = "a pending turn keeps the session busy until it is completed"]
pub struct PendingTurn {
    id: u64,
    query: String,
}

impl PendingTurn {
    /// Text to send to the answer service.
    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Debug)]
pub struct ChatSession {
    transcript: Vec<Message>,
    draft: String,
    in_flight: Option<u64>,
    next_turn: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            transcript: vec![Message::assistant(GREETING)],
            draft: String::new(),
            in_flight: None,
            next_turn: 0,
        }
    }

    /// Messages in display order, oldest first.
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.transcript.last()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the submit affordance is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_busy() && !self.draft.trim().is_empty()
    }

    /// Replaces the draft unconditionally.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Appends the draft as a user message, clears it and marks the session busy.
    /// The draft is sent verbatim; trimming only decides whether it is empty.
    pub fn begin_submit(&mut self) -> Result<PendingTurn, Rejected> {
        if self.is_busy() {
            return Err(Rejected::Busy);
        }
        if self.draft.trim().is_empty() {
            return Err(Rejected::EmptyDraft);
        }

        let query = std::mem::take(&mut self.draft);
        self.transcript.push(Message::user(query.clone()));

        let id = self.next_turn;
        self.next_turn += 1;
        self.in_flight = Some(id);
        Ok(PendingTurn { id, query })
    }

    /// Appends exactly one assistant message for `turn` and clears busy.
    /// Any error becomes [`FALLBACK_MESSAGE`]; the cause only goes to the log.
    pub fn complete(
        &mut self,
        turn: PendingTurn,
        result: Result<String, ClientError>,
    ) -> Result<TurnOutcome, Rejected> {
        if self.in_flight != Some(turn.id) {
            return Err(Rejected::StaleTurn);
        }

        let outcome = match result {
            Ok(answer) => {
                self.transcript.push(Message::assistant(answer));
                TurnOutcome::Answered
            }
            Err(err) => {
                tracing::debug!(kind = err.kind(), error = %err, "answer request failed");
                self.transcript.push(Message::assistant(FALLBACK_MESSAGE));
                TurnOutcome::Fallback
            }
        };
        self.in_flight = None;
        Ok(outcome)
    }

    /// Runs a whole turn against `service`. Rejected submissions send nothing.
    pub async fn submit<S>(&mut self, service: &S) -> Result<TurnOutcome, Rejected>
    where
        S: AnswerService + ?Sized,
    {
        let turn = self.begin_submit()?;
        let result = service.answer(turn.query()).await;
        self.complete(turn, result)
    }
}
