//! Canned collaborators for session tests.

use any_macro_core::{Confirmation, ConfirmPrompt, NamePrompt, TextResponse};

/// Naming prompt that always answers the same thing.
pub struct CannedName(pub TextResponse);

impl NamePrompt for CannedName {
    fn prompt_for_text(&mut self, _title: &str, _prompt: &str) -> TextResponse {
        self.0.clone()
    }
}

/// Confirmation prompt that always answers the same thing.
pub struct CannedConfirm(pub Confirmation);

impl ConfirmPrompt for CannedConfirm {
    fn prompt_yes_no_cancel(&mut self, _message: &str, _title: &str) -> Confirmation {
        self.0
    }
}
