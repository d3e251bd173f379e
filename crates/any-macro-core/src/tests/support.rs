//! Shared test doubles: a recording command bus and canned dialog
//! collaborators.

use crate::{
    CommandBus, CommandId, Confirmation, ConfirmPrompt, CoreResult, MacroError, NamePrompt,
    StreamKind, SubscriptionHandle, TextResponse, TriggerHandle,
};

use std::panic::Location;

use error_location::ErrorLocation;

/// CommandBus double that records every call and can reject requests.
#[derive(Default)]
pub struct MockBus {
    next_handle: u64,
    /// Commands requested for execution, in order.
    pub executed: Vec<CommandId>,
    /// Streams subscribed to, in order.
    pub subscribed: Vec<StreamKind>,
    /// Raw handles released, in order.
    pub unsubscribed: Vec<u64>,
    /// Trigger identifiers defined, in order.
    pub defined_triggers: Vec<CommandId>,
    /// Trigger identifiers removed, in order.
    pub removed_triggers: Vec<CommandId>,
    /// When set, `execute_command` is rejected.
    pub fail_execute: bool,
    /// When set, `subscribe` is rejected.
    pub fail_subscribe: bool,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscriptions taken and not yet released.
    pub fn active_subscriptions(&self) -> usize {
        self.subscribed.len() - self.unsubscribed.len()
    }
}

impl CommandBus for MockBus {
    fn execute_command(&mut self, id: &CommandId) -> CoreResult<()> {
        if self.fail_execute {
            return Err(MacroError::HostCall {
                reason: "execute rejected".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.executed.push(id.clone());
        Ok(())
    }

    fn subscribe(&mut self, stream: StreamKind) -> CoreResult<SubscriptionHandle> {
        if self.fail_subscribe {
            return Err(MacroError::HostCall {
                reason: "subscribe rejected".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.next_handle += 1;
        self.subscribed.push(stream);
        Ok(SubscriptionHandle::new(self.next_handle))
    }

    fn unsubscribe(&mut self, handle: SubscriptionHandle) {
        self.unsubscribed.push(handle.raw());
    }

    fn define_trigger(&mut self, id: &CommandId, _label: &str) -> CoreResult<TriggerHandle> {
        self.defined_triggers.push(id.clone());
        Ok(TriggerHandle::new(id.clone()))
    }

    fn remove_trigger(&mut self, handle: TriggerHandle) {
        self.removed_triggers.push(handle.id().clone());
    }
}

/// NamePrompt double returning a canned response.
pub struct CannedName(pub TextResponse);

impl NamePrompt for CannedName {
    fn prompt_for_text(&mut self, _title: &str, _prompt: &str) -> TextResponse {
        self.0.clone()
    }
}

/// ConfirmPrompt double returning a canned response.
pub struct CannedConfirm(pub Confirmation);

impl ConfirmPrompt for CannedConfirm {
    fn prompt_yes_no_cancel(&mut self, _message: &str, _title: &str) -> Confirmation {
        self.0
    }
}

/// Shorthand for building a CommandId.
pub fn cmd(id: &str) -> CommandId {
    CommandId::new(id)
}
