//! Sequential playback with strict lockstep synchronization.
//!
//! A sequencer replays one ordered command list against the host's
//! starting/terminated event streams. Execution requests are strictly
//! serialized: the next command is never requested before the current one's
//! terminate event has been observed, or a halt signal arrived.

use crate::{
    command::{CommandId, HALT_COMMAND_ID},
    error::Result,
    host::{CommandBus, StreamKind, SubscriptionHandle},
};

use std::collections::VecDeque;

use tracing::{debug, info, instrument};

/// Playback state machine states.
///
/// `Idle`, `Completed` and `Halted` are the only states holding no
/// subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// Created, not yet started.
    Idle,
    /// Head command requested; waiting for its starting event.
    Advancing,
    /// Head command started; waiting for its terminated event.
    Executing,
    /// Every queued command started and terminated in order.
    Completed,
    /// Playback cancelled; remaining queue abandoned.
    Halted,
}

/// Replays an ordered command-identifier list one command at a time.
#[derive(Debug)]
pub struct Sequencer {
    queue: VecDeque<CommandId>,
    executing: Option<CommandId>,
    state: SequencerState,
    subscriptions: Option<(SubscriptionHandle, SubscriptionHandle)>,
}

impl Sequencer {
    /// Creates an idle sequencer over the given command list.
    pub fn new(queue: impl IntoIterator<Item = CommandId>) -> Self {
        Self {
            queue: queue.into_iter().collect(),
            executing: None,
            state: SequencerState::Idle,
            subscriptions: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Whether the sequencer still holds subscriptions and expects events.
    pub fn is_live(&self) -> bool {
        matches!(
            self.state,
            SequencerState::Advancing | SequencerState::Executing
        )
    }

    /// Commands not yet started, in replay order.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// The command whose terminate event is currently awaited.
    pub fn executing(&self) -> Option<&CommandId> {
        self.executing.as_ref()
    }

    /// Subscribes to both lifecycle streams and requests the first command.
    ///
    /// On failure any subscription already taken is released and the
    /// sequencer stays `Idle`; the caller may drop it or retry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MacroError::HostCall`] if a subscribe or the first
    /// execute request is rejected.
    #[instrument(skip_all)]
    pub fn start(&mut self, bus: &mut dyn CommandBus) -> Result<()> {
        if self.state != SequencerState::Idle {
            return Ok(());
        }
        if self.queue.is_empty() {
            self.state = SequencerState::Completed;
            return Ok(());
        }

        let starting = bus.subscribe(StreamKind::Starting)?;
        let terminated = match bus.subscribe(StreamKind::Terminated) {
            Ok(handle) => handle,
            Err(e) => {
                bus.unsubscribe(starting);
                return Err(e);
            }
        };
        self.subscriptions = Some((starting, terminated));

        if let Err(e) = self.request_head(bus) {
            self.release_subscriptions(bus);
            return Err(e);
        }
        self.state = SequencerState::Advancing;

        info!(commands = self.queue.len(), "Playback started");

        Ok(())
    }

    /// Feeds one starting event to the state machine.
    ///
    /// Halt-signal checking takes priority over head matching. Starting
    /// events for any id other than the queue head are ignored; the host may
    /// legitimately fire unrelated commands between macro steps.
    ///
    /// # Errors
    ///
    /// Currently infallible; `Result` keeps the callback contract uniform
    /// with [`Sequencer::on_terminated`].
    pub fn on_starting(&mut self, id: &CommandId, bus: &mut dyn CommandBus) -> Result<()> {
        if !self.is_live() {
            return Ok(());
        }

        if id.as_str() == HALT_COMMAND_ID {
            self.halt(bus);
            return Ok(());
        }

        if self.state == SequencerState::Advancing && self.queue.front() == Some(id) {
            self.executing = self.queue.pop_front();
            self.state = SequencerState::Executing;
            debug!(command = %id, remaining = self.queue.len(), "Step started");
        }

        Ok(())
    }

    /// Feeds one terminated event to the state machine.
    ///
    /// A terminate matching the executing command either completes playback
    /// (empty queue) or requests the next head.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MacroError::HostCall`] if the next execute request is
    /// rejected; the sequencer unsubscribes and moves to `Halted` first, so
    /// no subscription dangles.
    pub fn on_terminated(&mut self, id: &CommandId, bus: &mut dyn CommandBus) -> Result<()> {
        if self.state != SequencerState::Executing || self.executing.as_ref() != Some(id) {
            return Ok(());
        }

        self.executing = None;

        if self.queue.is_empty() {
            self.release_subscriptions(bus);
            self.state = SequencerState::Completed;
            info!("Playback completed");
            return Ok(());
        }

        if let Err(e) = self.request_head(bus) {
            self.release_subscriptions(bus);
            self.state = SequencerState::Halted;
            return Err(e);
        }
        self.state = SequencerState::Advancing;

        Ok(())
    }

    /// Cancels playback: releases both subscriptions, abandons the remaining
    /// queue, and issues no further execution requests.
    #[instrument(skip_all)]
    pub fn halt(&mut self, bus: &mut dyn CommandBus) {
        if matches!(self.state, SequencerState::Completed | SequencerState::Halted) {
            return;
        }

        self.release_subscriptions(bus);
        let abandoned = self.queue.len();
        self.queue.clear();
        self.executing = None;
        self.state = SequencerState::Halted;

        info!(abandoned, "Playback halted");
    }

    fn request_head(&mut self, bus: &mut dyn CommandBus) -> Result<()> {
        if let Some(head) = self.queue.front() {
            bus.execute_command(head)?;
        }
        Ok(())
    }

    fn release_subscriptions(&mut self, bus: &mut dyn CommandBus) {
        if let Some((starting, terminated)) = self.subscriptions.take() {
            bus.unsubscribe(starting);
            bus.unsubscribe(terminated);
        }
    }
}
