//! Host command bus contract.
//!
//! The host application owns command execution and the two lifecycle event
//! streams. The engine only ever talks to it through this trait, so tests
//! drive the state machines with a recording mock instead of a live host.

use crate::{command::CommandId, error::Result};

/// The two command-lifecycle event streams a host exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Fired when a command begins executing.
    Starting,
    /// Fired when a command finishes executing.
    Terminated,
}

/// Proof of one active event-stream subscription.
///
/// Deliberately neither `Clone` nor `Copy`: unsubscribing consumes the
/// handle, so a subscription cannot be released twice.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    /// Wraps a host-assigned subscription id.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The host-assigned subscription id.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Handle to a host UI trigger bound to a newly defined invokable identifier.
///
/// Consumed on removal, like [`SubscriptionHandle`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct TriggerHandle {
    id: CommandId,
}

impl TriggerHandle {
    /// Wraps the identifier the trigger was bound to.
    pub fn new(id: CommandId) -> Self {
        Self { id }
    }

    /// The identifier this trigger invokes.
    pub fn id(&self) -> &CommandId {
        &self.id
    }
}

/// Host-owned source of command execution and lifecycle events.
pub trait CommandBus {
    /// Requests execution of a command by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MacroError::HostCall`] if the host rejects the request.
    fn execute_command(&mut self, id: &CommandId) -> Result<()>;

    /// Subscribes the caller to one lifecycle event stream.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MacroError::HostCall`] if the host rejects the
    /// subscription; the caller must not assume any events will be delivered.
    fn subscribe(&mut self, stream: StreamKind) -> Result<SubscriptionHandle>;

    /// Releases one subscription. Infallible by contract: a host may ignore
    /// an already-released handle but must not fail.
    fn unsubscribe(&mut self, handle: SubscriptionHandle);

    /// Defines a new invokable identifier bound to a UI trigger.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MacroError::HostCall`] if the host cannot create
    /// the trigger.
    fn define_trigger(&mut self, id: &CommandId, label: &str) -> Result<TriggerHandle>;

    /// Removes a previously defined trigger.
    fn remove_trigger(&mut self, handle: TriggerHandle);
}
