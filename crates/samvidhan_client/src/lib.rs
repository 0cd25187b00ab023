//! Samvidhan chat client library (config, answer service client, chat session, terminal view).
//! Used by the `samvidhan` terminal binary.

pub mod client;
pub mod config;
pub mod messages;
pub mod session;
pub mod view;

pub use client::{AnswerService, ClientError, HttpAnswerService};
pub use config::{default_config_path, Config, ConfigError, LogSection, ServiceSection};
pub use messages::{Message, Role};
pub use session::{ChatSession, PendingTurn, Rejected, TurnOutcome, FALLBACK_MESSAGE, GREETING};
pub use view::TranscriptView;
