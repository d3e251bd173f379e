//! Dialog collaborator contracts.
//!
//! Only the request/response shape matters here; rendering is the host's
//! problem.

/// Outcome of a text-input request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextResponse {
    /// The user entered text (possibly needing further validation).
    Entered(String),
    /// The user dismissed the prompt.
    Cancelled,
}

/// Outcome of a yes/no/cancel confirmation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The user confirmed.
    Yes,
    /// The user declined.
    No,
    /// The user dismissed the prompt.
    Cancelled,
}

/// Collaborator that asks the user for a line of text.
pub trait NamePrompt {
    /// Shows a text prompt and blocks for the response.
    fn prompt_for_text(&mut self, title: &str, prompt: &str) -> TextResponse;
}

/// Collaborator that asks the user a yes/no/cancel question.
pub trait ConfirmPrompt {
    /// Shows a confirmation prompt and blocks for the response.
    fn prompt_yes_no_cancel(&mut self, message: &str, title: &str) -> Confirmation;
}
