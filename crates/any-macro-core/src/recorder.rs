//! Command tracking: turns a live stream of command-starting signals into an
//! ordered, deduplicated, capped fragment list.

use crate::{
    command::{CommandId, SELECT_COMMAND_ID},
    error::Result,
    host::{CommandBus, MacroStore, NamePrompt, StreamKind, SubscriptionHandle, TriggerHandle},
    macros::Macro,
    registry::Registry,
};

use tracing::{debug, info, instrument, warn};

/// Maximum number of fragments one recording session may hold.
///
/// Enforced before appending: observing a qualifying command while already
/// holding `MAX_TRACK` fragments stops the recording instead of logging it.
pub const MAX_TRACK: usize = 10;

/// Synthetic fragment identifier, unique within a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FragmentId(u64);

impl FragmentId {
    /// The raw counter value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// One recorded use of a command during tracking.
#[derive(Debug)]
pub struct Fragment {
    id: FragmentId,
    command: CommandId,
    trigger: TriggerHandle,
}

impl Fragment {
    /// Session-unique fragment id.
    pub fn id(&self) -> FragmentId {
        self.id
    }

    /// The recorded command identifier.
    pub fn command(&self) -> &CommandId {
        &self.command
    }

    /// Identifier of the removable UI trigger bound to this fragment.
    pub fn trigger_id(&self) -> &CommandId {
        self.trigger.id()
    }
}

/// What [`Recorder::observe`] did with one starting event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// A new fragment was appended.
    Recorded,
    /// The event was host noise, a blocked repeat, or the recorder inactive.
    Skipped,
    /// The fragment cap was reached; recording stopped without appending.
    AutoStopped,
}

/// Consumes command-starting events while active and accumulates fragments.
#[derive(Debug)]
pub struct Recorder {
    trigger_id: CommandId,
    active: bool,
    fragments: Vec<Fragment>,
    last_seen: Option<CommandId>,
    consecutive_block: bool,
    next_fragment_id: u64,
    subscription: Option<SubscriptionHandle>,
    draft: Option<Macro>,
}

impl Recorder {
    /// Creates an inactive recorder.
    ///
    /// `trigger_id` is the recorder's own toggle command; the host fires a
    /// starting event for it like for any other command, so it must never be
    /// recorded.
    pub fn new(trigger_id: CommandId, consecutive_block: bool) -> Self {
        Self {
            trigger_id,
            active: false,
            fragments: Vec::new(),
            last_seen: None,
            consecutive_block,
            next_fragment_id: 0,
            subscription: None,
            draft: None,
        }
    }

    /// Whether a recording session is in progress.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Recorded fragments in observation order.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Number of recorded fragments.
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// The draft macro produced by the last stop, if any.
    pub fn draft(&self) -> Option<&Macro> {
        self.draft.as_ref()
    }

    /// Whether consecutive re-fires of the same command are suppressed.
    pub fn consecutive_block(&self) -> bool {
        self.consecutive_block
    }

    /// Enables or disables consecutive-fire suppression.
    pub fn set_consecutive_block(&mut self, enabled: bool) {
        self.consecutive_block = enabled;
    }

    /// The recorded commands in execution order.
    pub fn execute_list(&self) -> Vec<CommandId> {
        self.fragments
            .iter()
            .map(|fragment| fragment.command.clone())
            .collect()
    }

    /// Starts tracking: subscribes to the starting-event stream and resets
    /// the deduplication state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MacroError::HostCall`] if the subscription is
    /// rejected; the recorder stays inactive.
    #[instrument(skip_all)]
    pub fn start(&mut self, bus: &mut dyn CommandBus) -> Result<()> {
        if self.active {
            return Ok(());
        }

        let subscription = bus.subscribe(StreamKind::Starting)?;
        self.subscription = Some(subscription);
        self.last_seen = None;
        self.active = true;

        info!("Recording started");

        Ok(())
    }

    /// Feeds one starting event to the recorder.
    ///
    /// The recorder's own trigger and the host's selection command are
    /// ignored as UI noise. With consecutive blocking enabled, a starting
    /// event equal to the last recorded id is suppressed without resetting
    /// `last_seen`, so any run of equal ids collapses to one fragment until a
    /// different id intervenes.
    ///
    /// # Errors
    ///
    /// Returns a host error if the fragment's removable trigger cannot be
    /// created.
    pub fn observe(&mut self, id: &CommandId, bus: &mut dyn CommandBus) -> Result<Observation> {
        if !self.active {
            return Ok(Observation::Skipped);
        }
        if *id == self.trigger_id || id.as_str() == SELECT_COMMAND_ID {
            return Ok(Observation::Skipped);
        }
        if self.consecutive_block && self.last_seen.as_ref() == Some(id) {
            debug!(command = %id, "Consecutive fire blocked");
            return Ok(Observation::Skipped);
        }

        // Cap enforced before appending, so the fragment list never exceeds
        // MAX_TRACK even transiently.
        if self.fragments.len() >= MAX_TRACK {
            warn!(limit = MAX_TRACK, "Fragment cap reached, stopping recording");
            self.stop(bus)?;
            return Ok(Observation::AutoStopped);
        }

        let fragment_id = FragmentId(self.next_fragment_id);
        self.next_fragment_id += 1;

        let trigger_id = CommandId::new(format!("{id}_Macro_Fragment_{}", fragment_id.raw()));
        let trigger = bus.define_trigger(&trigger_id, "Click to remove from Macro")?;

        self.fragments.push(Fragment {
            id: fragment_id,
            command: id.clone(),
            trigger,
        });
        self.last_seen = Some(id.clone());

        debug!(command = %id, count = self.fragments.len(), "Command recorded");

        Ok(Observation::Recorded)
    }

    /// Stops tracking: unsubscribes from the starting-event stream and, when
    /// at least one fragment was recorded, produces or refreshes the draft
    /// macro wrapping the current fragment order.
    ///
    /// # Errors
    ///
    /// Returns a host error if draft trigger creation fails.
    #[instrument(skip_all)]
    pub fn stop(&mut self, bus: &mut dyn CommandBus) -> Result<()> {
        if let Some(subscription) = self.subscription.take() {
            bus.unsubscribe(subscription);
        }
        self.active = false;

        if self.fragments.is_empty() {
            info!("Recording stopped with no fragments");
            return Ok(());
        }

        let execute_list = self.execute_list();
        match self.draft.as_mut() {
            Some(draft) => draft.rebind(execute_list, bus)?,
            None => self.draft = Some(Macro::draft(execute_list, bus)?),
        }

        info!(fragments = self.fragments.len(), "Recording stopped");

        Ok(())
    }

    /// Removes one fragment, deletes its UI trigger, and re-synchronizes the
    /// draft's command list if a draft exists.
    ///
    /// Returns `false` when no fragment carries the given id.
    ///
    /// # Errors
    ///
    /// Returns a host error if draft trigger re-creation fails.
    pub fn remove_fragment(
        &mut self,
        fragment_id: FragmentId,
        bus: &mut dyn CommandBus,
    ) -> Result<bool> {
        let Some(position) = self
            .fragments
            .iter()
            .position(|fragment| fragment.id == fragment_id)
        else {
            return Ok(false);
        };

        let fragment = self.fragments.remove(position);
        bus.remove_trigger(fragment.trigger);

        let execute_list = self.execute_list();
        if let Some(draft) = self.draft.as_mut() {
            draft.rebind(execute_list, bus)?;
        }

        debug!(remaining = self.fragments.len(), "Fragment removed");

        Ok(true)
    }

    /// Looks up a fragment by its removable trigger id.
    pub fn fragment_by_trigger(&self, trigger_id: &CommandId) -> Option<FragmentId> {
        self.fragments
            .iter()
            .find(|fragment| fragment.trigger_id() == trigger_id)
            .map(Fragment::id)
    }

    /// Names the draft, hands it to the registry, persists, and clears the
    /// recorder.
    ///
    /// When still tracking, the recording is stopped first so the fragments
    /// become a draft. A cancelled or empty naming prompt fails without
    /// destroying the draft, so the caller may retry. With nothing recorded
    /// this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MacroError::NamingCancelled`] on an aborted prompt,
    /// or store/host errors from persistence and trigger updates.
    #[instrument(skip_all)]
    pub fn build(
        &mut self,
        name: Option<String>,
        naming: &mut dyn NamePrompt,
        registry: &mut Registry,
        store: &mut dyn MacroStore,
        bus: &mut dyn CommandBus,
    ) -> Result<()> {
        if self.active {
            self.stop(bus)?;
        }
        let Some(mut draft) = self.draft.take() else {
            return Ok(());
        };

        if let Err(e) = draft.finish_build(name, naming, bus) {
            // Draft retained for retry.
            self.draft = Some(draft);
            return Err(e);
        }

        registry.register(draft, bus);
        registry.save(store)?;
        self.clear(bus);

        Ok(())
    }

    /// Discards the draft and every fragment, deleting their UI triggers and
    /// resetting the deduplication state.
    ///
    /// A macro that was already built is owned by the registry by then and is
    /// not touched; deletion from the registry is a separate path.
    pub fn clear(&mut self, bus: &mut dyn CommandBus) {
        if let Some(mut draft) = self.draft.take() {
            draft.remove_triggers(bus);
        }
        for fragment in self.fragments.drain(..) {
            bus.remove_trigger(fragment.trigger);
        }
        self.last_seen = None;
    }
}
