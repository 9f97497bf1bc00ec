use async_trait::async_trait;
use colored::*;
use log::warn;
use std::io::{ self, Write };
use std::sync::Mutex;
use std::sync::atomic::{ AtomicBool, Ordering };
use tokio::io::{ AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin };
use tokio::sync::Mutex as TokioMutex;
use super::{ ChatView, ListEntry, ListPlaceholder, PanelPlaceholder };
use crate::models::chat::Role;

const TYPING_TEXT: &str = "bot is typing ...";

/// Terminal rendering of the chat page. Reads commands and confirmation
/// answers from the same line source so a pending delete prompt consumes the
/// next line typed.
pub struct TerminalView<R> {
    input: TokioMutex<Lines<R>>,
    draft: Mutex<Option<String>>,
    typing: AtomicBool,
    voice_enabled: AtomicBool,
}

impl TerminalView<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> TerminalView<R> where R: AsyncBufRead + Unpin + Send {
    pub fn new(reader: R) -> Self {
        Self {
            input: TokioMutex::new(reader.lines()),
            draft: Mutex::new(None),
            typing: AtomicBool::new(false),
            voice_enabled: AtomicBool::new(true),
        }
    }

    /// Next input line, or `None` once input is closed.
    pub async fn next_line(&self) -> io::Result<Option<String>> {
        self.input.lock().await.next_line().await
    }

    /// Takes whatever the input field currently holds.
    pub fn take_draft(&self) -> Option<String> {
        self.draft.lock().ok().and_then(|mut d| d.take())
    }

    pub fn voice_enabled(&self) -> bool {
        self.voice_enabled.load(Ordering::SeqCst)
    }

    pub fn prompt(&self) {
        print!("{} ", ">".bright_green());
        let _ = io::stdout().flush();
    }

    fn clear_typing_line(&self) {
        if self.typing.swap(false, Ordering::SeqCst) {
            print!("\r\x1b[2K");
            let _ = io::stdout().flush();
        }
    }
}

#[async_trait]
impl<R> ChatView for TerminalView<R> where R: AsyncBufRead + Unpin + Send {
    fn render_conversation_list(&self, entries: &[ListEntry]) {
        println!("{}", "───────────── Conversations ─────────────".bright_cyan());
        for (idx, entry) in entries.iter().enumerate() {
            let marker = if entry.active { "*".bright_green() } else { " ".normal() };
            println!(
                "{} {:>2}. {}  {}",
                marker,
                idx + 1,
                entry.display_name.bright_white(),
                format!("[/delete {}]", idx + 1).dimmed()
            );
        }
    }

    fn show_list_placeholder(&self, placeholder: ListPlaceholder) {
        match placeholder {
            ListPlaceholder::Empty => println!("{}", placeholder.text().dimmed()),
            ListPlaceholder::LoadError => println!("{}", placeholder.text().bright_red()),
        }
    }

    fn remove_conversation_entry(&self, id: &str) {
        println!("{} {}", "Removed conversation".yellow(), id.dimmed());
    }

    fn update_active_markers(&self, entries: &[ListEntry]) {
        if let Some(active) = entries.iter().find(|e| e.active) {
            println!("{} {}", "Active:".yellow(), active.display_name.bright_white());
        }
    }

    fn clear_messages(&self) {
        self.clear_typing_line();
        println!("{}", "─────────────────────────────────────────".bright_cyan());
    }

    fn show_panel_placeholder(&self, placeholder: PanelPlaceholder) {
        self.clear_messages();
        match placeholder {
            PanelPlaceholder::LoadError => println!("{}", placeholder.text().bright_red()),
            _ => println!("{}", placeholder.text().dimmed()),
        }
    }

    fn append_message(&self, role: Role, content: &str) {
        self.clear_typing_line();
        match role {
            Role::User => println!("{} {}", "you:".bright_blue().bold(), content),
            Role::Bot => println!("{} {}", "bot:".bright_magenta().bold(), content),
        }
    }

    fn show_typing_indicator(&self) {
        self.typing.store(true, Ordering::SeqCst);
        print!("{}", TYPING_TEXT.dimmed());
        let _ = io::stdout().flush();
    }

    fn remove_typing_indicator(&self) {
        self.clear_typing_line();
    }

    fn scroll_to_end(&self) {
        let _ = io::stdout().flush();
    }

    async fn confirm_delete(&self, display_name: &str) -> bool {
        print!(
            "{} {} {} ",
            "Are you sure you want to delete".yellow(),
            display_name.bright_white(),
            "[y/N]?".yellow()
        );
        let _ = io::stdout().flush();
        match self.next_line().await {
            Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(e) => {
                warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }

    fn dismiss_confirmation(&self) {
        // The y/N prompt is already closed once its answer line is read.
    }

    fn set_input(&self, text: &str) {
        if let Ok(mut draft) = self.draft.lock() {
            *draft = Some(text.to_string());
        }
        println!("{} {} {}", "input:".yellow(), text, "(press Enter to send)".dimmed());
    }

    fn clear_input(&self) {
        if let Ok(mut draft) = self.draft.lock() {
            *draft = None;
        }
    }

    fn disable_voice_input(&self, tooltip: &str) {
        self.voice_enabled.store(false, Ordering::SeqCst);
        println!("{}", tooltip.dimmed());
    }
}
