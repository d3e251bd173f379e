//! Console stand-in for the host application's command bus.
//!
//! An executed command is echoed and loops back onto the event queue as a
//! starting event immediately and a terminated event after the configured
//! latency, so recorded macros replay end to end without a real host.

use crate::{run_later, HostEvent};

use std::{collections::HashSet, panic::Location, sync::mpsc, time::Duration};

use any_macro_core::{
    CommandBus, CommandId, CoreResult, MacroError, StreamKind, SubscriptionHandle, TriggerHandle,
};
use error_location::ErrorLocation;
use tracing::debug;

/// CommandBus implementation backed by the session's event queue.
pub struct ConsoleBus {
    events: mpsc::Sender<HostEvent>,
    command_latency: Duration,
    next_handle: u64,
    active_subscriptions: HashSet<u64>,
}

impl ConsoleBus {
    /// Creates a bus that loops lifecycle events back through `events`.
    pub fn new(events: mpsc::Sender<HostEvent>, command_latency: Duration) -> Self {
        Self {
            events,
            command_latency,
            next_handle: 0,
            active_subscriptions: HashSet::new(),
        }
    }

    /// Subscriptions taken and not yet released.
    pub fn active_subscriptions(&self) -> usize {
        self.active_subscriptions.len()
    }
}

impl CommandBus for ConsoleBus {
    fn execute_command(&mut self, id: &CommandId) -> CoreResult<()> {
        println!("> executing {id}");

        self.events
            .send(HostEvent::CommandStarting(id.clone()))
            .map_err(|_| MacroError::HostCall {
                reason: "event queue closed".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        // Terminated arrives later, like a real command taking time to run.
        run_later(
            self.events.clone(),
            HostEvent::CommandTerminated(id.clone()),
            self.command_latency,
        );

        Ok(())
    }

    fn subscribe(&mut self, stream: StreamKind) -> CoreResult<SubscriptionHandle> {
        self.next_handle += 1;
        self.active_subscriptions.insert(self.next_handle);
        debug!(?stream, handle = self.next_handle, "Stream subscribed");
        Ok(SubscriptionHandle::new(self.next_handle))
    }

    fn unsubscribe(&mut self, handle: SubscriptionHandle) {
        self.active_subscriptions.remove(&handle.raw());
        debug!(handle = handle.raw(), "Stream unsubscribed");
    }

    fn define_trigger(&mut self, id: &CommandId, label: &str) -> CoreResult<TriggerHandle> {
        debug!(trigger = %id, label, "Trigger defined");
        Ok(TriggerHandle::new(id.clone()))
    }

    fn remove_trigger(&mut self, handle: TriggerHandle) {
        debug!(trigger = %handle.id(), "Trigger removed");
    }
}
