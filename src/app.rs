use colored::*;
use log::{ debug, info };
use std::error::Error;
use std::sync::Arc;
use tokio::io::AsyncBufRead;
use crate::session::ChatSession;
use crate::view::TerminalView;

pub const NEW_COMMAND: &str = "/new";
pub const LIST_COMMAND: &str = "/list";
pub const OPEN_COMMAND: &str = "/open";
pub const DELETE_COMMAND: &str = "/delete";
pub const VOICE_COMMAND: &str = "/voice";
pub const HELP_COMMAND: &str = "/help";
pub const QUIT_COMMAND: &str = "/quit";
pub const EXIT_COMMAND: &str = "/exit";

/// A conversation picked either by its 1-based list position or by id.
/// A number that is also a known conversation id picks that conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target(String);

impl Target {
    fn parse(arg: &str) -> Self {
        Target(arg.to_string())
    }

    fn position(&self) -> Option<usize> {
        match self.0.parse::<usize>() {
            Ok(n) if n > 0 => Some(n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    /// Empty line: send whatever the input field holds.
    SendDraft,
    New,
    List,
    Open(Target),
    Delete(Target),
    Voice,
    Help,
    Quit,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::SendDraft;
        }
        if !trimmed.starts_with('/') {
            return Command::Send(trimmed.to_string());
        }

        let mut parts = trimmed.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

        match (name, arg) {
            (NEW_COMMAND, None) => Command::New,
            (LIST_COMMAND, None) => Command::List,
            (VOICE_COMMAND, None) => Command::Voice,
            (HELP_COMMAND, None) => Command::Help,
            (QUIT_COMMAND, None) | (EXIT_COMMAND, None) => Command::Quit,
            (OPEN_COMMAND, Some(arg)) => Command::Open(Target::parse(arg)),
            (DELETE_COMMAND, Some(arg)) => Command::Delete(Target::parse(arg)),
            (OPEN_COMMAND, None) | (DELETE_COMMAND, None) => {
                Command::Invalid(format!("{} needs a list number or conversation id", name))
            }
            _ => Command::Invalid(format!("Unknown command: {}", trimmed)),
        }
    }
}

pub fn print_help() {
    println!("{}", "───────────── Commands ─────────────".bright_cyan());
    println!("{}  {}", NEW_COMMAND.bright_green(), "start a new conversation");
    println!("{}  {}", LIST_COMMAND.bright_green(), "reload the conversation list");
    println!(
        "{}  {}",
        format!("{} <n|id>", OPEN_COMMAND).bright_green(),
        "open a conversation (a matching id wins over a list number)"
    );
    println!("{}  {}", format!("{} <n|id>", DELETE_COMMAND).bright_green(), "delete a conversation");
    println!("{}  {}", VOICE_COMMAND.bright_green(), "dictate a message");
    println!("{}  {}", QUIT_COMMAND.bright_green(), "leave");
    println!("{}", "Anything else is sent as a message.".dimmed());
}

/// Reads input lines and turns them into session actions, one at a time.
pub struct App<R> {
    session: ChatSession,
    view: Arc<TerminalView<R>>,
}

impl<R> App<R> where R: AsyncBufRead + Unpin + Send + 'static {
    pub fn new(session: ChatSession, view: Arc<TerminalView<R>>) -> Self {
        Self { session, view }
    }

    fn resolve(&self, target: &Target) -> Option<String> {
        let store = self.session.store();
        if store.find_by_id(&target.0).is_some() {
            return Some(target.0.clone());
        }
        match target.position() {
            Some(n) => store.entries().get(n - 1).map(|e| e.id.clone()),
            None => Some(target.0.clone()),
        }
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if let Err(e) = self.session.start().await {
            debug!("Initial load failed: {}", e);
        }

        loop {
            self.view.prompt();
            let line = match self.view.next_line().await? {
                Some(line) => line,
                None => break,
            };

            match Command::parse(&line) {
                Command::Quit => break,
                Command::Help => print_help(),
                Command::Invalid(msg) => println!("{}", msg.bright_red()),
                Command::Send(text) => {
                    self.session.send_message(&text).await;
                }
                Command::SendDraft => {
                    if let Some(draft) = self.view.take_draft() {
                        self.session.send_message(&draft).await;
                    }
                }
                Command::New => {
                    if let Err(e) = self.session.create_conversation().await {
                        debug!("Create failed: {}", e);
                    }
                }
                Command::List => {
                    if let Err(e) = self.session.refresh().await {
                        debug!("Refresh failed: {}", e);
                    }
                }
                Command::Open(target) => {
                    match self.resolve(&target) {
                        Some(id) => {
                            if let Err(e) = self.session.select(&id).await {
                                debug!("Opening {} failed: {}", id, e);
                            }
                        }
                        None => println!("{}", "No conversation at that position".bright_red()),
                    }
                }
                Command::Delete(target) => {
                    match self.resolve(&target) {
                        Some(id) => {
                            if let Err(e) = self.session.delete_conversation(&id).await {
                                debug!("Deleting {} failed: {}", id, e);
                            }
                        }
                        None => println!("{}", "No conversation at that position".bright_red()),
                    }
                }
                Command::Voice => {
                    if self.view.voice_enabled() {
                        self.session.start_voice_input().await;
                    } else {
                        println!("{}", "Voice input is disabled.".dimmed());
                    }
                }
            }
        }

        info!("Input closed, leaving chat");
        Ok(())
    }
}
