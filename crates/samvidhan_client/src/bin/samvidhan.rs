//! samvidhan: terminal chat client for the constitution Q&A service.
//! Reads config, then either runs the interactive chat loop on stdin, asks a single
//! question given on the command line, or checks that the service is up.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use samvidhan_client::{
    config, ChatSession, Config, HttpAnswerService, Rejected, TranscriptView, TurnOutcome,
};
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::EnvFilter;

const BANNER: &str = "Samvidhan AI · Guardian of the Constitution";
const FOOTER: &str = "AI can make mistakes. Verify with official text.";
const PROMPT: &str = "> ";

#[derive(Debug, Parser)]
#[command(name = "samvidhan", version, about = "Ask about your Fundamental Rights")]
struct Cli {
    /// Config file [default: ~/.samvidhan/config.yaml]
    #[arg(long, env = "SAMVIDHAN_CONFIG")]
    config: Option<PathBuf>,

    /// Answer service base URL, overrides `service.base_url`
    #[arg(long)]
    url: Option<String>,

    /// Check that the answer service is reachable, then exit
    #[arg(long, conflicts_with = "question")]
    check: bool,

    /// Ask a single question and exit
    question: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let cfg = load_config(&cli)?;
    let logs = init_tracing(&cfg)?;

    let base_url = cli.url.as_deref().unwrap_or(cfg.service.base_url());
    let service = HttpAnswerService::new(base_url, cfg.service.chat_path())
        .with_context(|| format!("invalid answer service url {base_url}"))?;
    tracing::debug!(url = %service.chat_url(), "answer service configured");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create runtime")?;

    if cli.check {
        return rt.block_on(check(&service));
    }
    match cli.question {
        Some(question) => rt.block_on(ask_once(&service, question)),
        None => rt.block_on(chat_loop(&service, logs)),
    }
}

/// An explicit path must exist; the default path may be missing.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(path) = &cli.config {
        return config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()));
    }
    match config::default_config_path() {
        Some(path) => config::load_or_default(&path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Where diagnostics end up. Failure causes must never reach the user's terminal
/// unless a developer asked for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogTarget {
    Off,
    File,
    Stderr { terminal: bool },
}

impl LogTarget {
    fn shares_terminal(self) -> bool {
        matches!(self, LogTarget::Stderr { terminal: true })
    }
}

/// `RUST_LOG` wins over `log.filter`; `log.file` wins over stderr.
fn init_tracing(cfg: &Config) -> anyhow::Result<LogTarget> {
    let directives = std::env::var("RUST_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| cfg.log.filter().to_string());
    if directives.trim().eq_ignore_ascii_case("off") {
        return Ok(LogTarget::Off);
    }
    let filter = EnvFilter::new(directives);

    if let Some(path) = &cfg.log.file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false)
            .init();
        return Ok(LogTarget::File);
    }

    let terminal = io::stderr().is_terminal();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(terminal)
        .with_target(false)
        .init();
    Ok(LogTarget::Stderr { terminal })
}

/// The indicator is erased in place, so it is only drawn on a terminal nothing else
/// writes to while a request is in flight.
fn indicator_enabled(stdout_terminal: bool, logs: LogTarget) -> bool {
    stdout_terminal && !logs.shares_terminal()
}

async fn check(service: &HttpAnswerService) -> anyhow::Result<ExitCode> {
    match service.health().await {
        Ok(message) => {
            println!("{message}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: answer service unreachable: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn ask_once(service: &HttpAnswerService, question: String) -> anyhow::Result<ExitCode> {
    let mut session = ChatSession::new();
    session.update_draft(question);
    let outcome = session.submit(service).await.context("nothing to ask")?;

    if let Some(reply) = session.last_message() {
        println!("{}", reply.content);
    }
    Ok(match outcome {
        TurnOutcome::Answered => ExitCode::SUCCESS,
        TurnOutcome::Fallback => ExitCode::FAILURE,
    })
}

async fn chat_loop(service: &HttpAnswerService, logs: LogTarget) -> anyhow::Result<ExitCode> {
    let interactive = io::stdin().is_terminal();
    let mut stdout = io::stdout();
    let mut session = ChatSession::new();
    let mut view = TranscriptView::new(indicator_enabled(stdout.is_terminal(), logs), !interactive);

    writeln!(stdout, "{BANNER}\n{FOOTER}\n")?;
    view.render(&session, &mut stdout)?;

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        if interactive {
            write!(stdout, "{PROMPT}")?;
            stdout.flush()?;
        }
        // Input is read only between turns, so at most one request is in flight.
        let Some(line) = lines.next_line().await? else {
            break;
        };

        session.update_draft(line);
        let turn = match session.begin_submit() {
            Ok(turn) => turn,
            Err(Rejected::EmptyDraft) => continue,
            Err(rejected) => return Err(rejected.into()),
        };
        view.render(&session, &mut stdout)?;

        let result = service.ask(turn.query()).await;
        session.complete(turn, result)?;
        view.render(&session, &mut stdout)?;
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_needs_a_terminal_free_of_log_output() {
        assert!(indicator_enabled(true, LogTarget::Off));
        assert!(indicator_enabled(true, LogTarget::File));
        assert!(indicator_enabled(true, LogTarget::Stderr { terminal: false }));
        assert!(!indicator_enabled(true, LogTarget::Stderr { terminal: true }));
        assert!(!indicator_enabled(false, LogTarget::Off));
    }
}
