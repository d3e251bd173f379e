//! Console prompts for naming and confirming destructive actions.

use std::io::{self, BufRead, Write};

use any_macro_core::{Confirmation, ConfirmPrompt, NamePrompt, TextResponse};
use tracing::warn;

/// Stdin-backed dialog implementation.
///
/// An empty line or closed stdin counts as a cancel, matching what a dialog
/// reports when dismissed without input.
pub struct ConsoleDialogs;

impl ConsoleDialogs {
    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(error) => {
                warn!(%error, "Failed to read dialog input");
                None
            }
        }
    }
}

impl NamePrompt for ConsoleDialogs {
    fn prompt_for_text(&mut self, title: &str, prompt: &str) -> TextResponse {
        println!("[{title}] {prompt}");
        print!("name> ");
        let _ = io::stdout().flush();

        match self.read_line() {
            Some(text) if !text.is_empty() => TextResponse::Entered(text),
            _ => TextResponse::Cancelled,
        }
    }
}

impl ConfirmPrompt for ConsoleDialogs {
    fn prompt_yes_no_cancel(&mut self, message: &str, title: &str) -> Confirmation {
        println!("[{title}] {message}");
        print!("(y/n)> ");
        let _ = io::stdout().flush();

        match self.read_line().as_deref() {
            Some("y" | "yes" | "Y") => Confirmation::Yes,
            Some("n" | "no" | "N") => Confirmation::No,
            _ => Confirmation::Cancelled,
        }
    }
}
