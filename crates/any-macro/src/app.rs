//! Session: owns the engine state and routes host events to it.
//!
//! All engine mutation happens on this single event loop. The supervising
//! boundary is [`Session::dispatch`]: a failed handler is logged and the
//! session keeps serving later events, so one bad macro cannot take the
//! whole session down.

use crate::{script, AppError, HostEvent, Result};

use std::{
    io::{self, BufRead, Write as _},
    panic::Location,
    path::Path,
    sync::mpsc,
    time::Duration,
};

use any_macro_core::{
    CommandBus, CommandId, ConfirmPrompt, Macro, MacroError, MacroRecord, MacroStore, NamePrompt,
    Observation, Recorder, Registry, Sequencer, MAX_TRACK,
};
use error_location::ErrorLocation;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Identifier the record/stop toggle is bound to. Fired as a command like
/// any other, so the recorder must know to ignore it.
pub const RECORD_TOGGLE_ID: &str = "AnyMacro_ToggleRecording";

/// One interactive session over the macro engine.
pub struct Session {
    bus: Box<dyn CommandBus>,
    naming: Box<dyn NamePrompt>,
    confirm: Box<dyn ConfirmPrompt>,
    store: Box<dyn MacroStore>,
    registry: Registry,
    recorder: Recorder,
    sequencers: Vec<Sequencer>,
    events: mpsc::Receiver<HostEvent>,
    session_id: Option<Uuid>,
    pump_grace: Duration,
    running: bool,
}

impl Session {
    /// Builds a session and loads the persisted macro library.
    ///
    /// `pump_grace` bounds how long [`Session::pump`] waits for a deferred
    /// lifecycle event while playback is live; past it the playback is
    /// considered stalled.
    ///
    /// # Errors
    ///
    /// Returns an error when the macro store exists but cannot be read.
    #[instrument(skip_all)]
    pub fn new(
        mut bus: Box<dyn CommandBus>,
        naming: Box<dyn NamePrompt>,
        confirm: Box<dyn ConfirmPrompt>,
        store: Box<dyn MacroStore>,
        events: mpsc::Receiver<HostEvent>,
        consecutive_block: bool,
        pump_grace: Duration,
    ) -> Result<Self> {
        let mut registry = Registry::new();
        let loaded = registry.load(store.as_ref(), bus.as_mut())?;
        info!(loaded, "Session ready");

        Ok(Self {
            bus,
            naming,
            confirm,
            store,
            registry,
            recorder: Recorder::new(CommandId::from(RECORD_TOGGLE_ID), consecutive_block),
            sequencers: Vec::new(),
            events,
            session_id: None,
            pump_grace,
            running: true,
        })
    }

    /// The loaded macro library.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The recorder, for inspecting tracking state.
    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// Playbacks still holding subscriptions.
    pub fn live_playbacks(&self) -> usize {
        self.sequencers.len()
    }

    /// Whether the session still accepts events.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Routes one event to its handler; failures are logged, not fatal.
    ///
    /// Cancelled prompts are ordinary outcomes, not faults, and log at info.
    pub fn dispatch(&mut self, event: HostEvent) {
        debug!(?event, "Dispatching");

        let result = match event {
            HostEvent::CommandStarting(id) => self.on_starting(&id),
            HostEvent::CommandTerminated(id) => self.on_terminated(&id),
            HostEvent::TriggerFired(id) => self.on_trigger(&id),
            HostEvent::ToggleRecording => self.toggle_recording(),
            HostEvent::BuildMacro { name } => self.build_macro(name),
            HostEvent::ClearRecording => {
                self.clear_recording();
                Ok(())
            }
            HostEvent::ListMacros => {
                self.list_macros();
                Ok(())
            }
            HostEvent::InjectMacros(value) => self.inject(value),
            HostEvent::Shutdown => {
                self.running = false;
                Ok(())
            }
        };

        match result {
            Ok(()) => {}
            Err(AppError::Macro {
                source: MacroError::NamingCancelled { .. },
                ..
            }) => info!("Naming cancelled, draft retained"),
            Err(AppError::Macro {
                source: MacroError::ConfirmationDeclined { .. },
                ..
            }) => info!("Deletion not confirmed, macro retained"),
            Err(error) => error!(%error, "Event handler failed"),
        }
    }

    /// Runs the directives of a script file, pumping playback between them.
    ///
    /// # Errors
    ///
    /// Returns an error when the script cannot be read or parsed; runtime
    /// failures inside handlers are absorbed by [`Session::dispatch`].
    #[instrument(skip(self))]
    pub fn run_script(&mut self, path: &Path) -> Result<()> {
        let events = script::parse_file(path)?;
        for event in events {
            if !self.running {
                break;
            }
            self.dispatch(event);
            self.pump();
        }
        Ok(())
    }

    /// Reads directives from stdin until quit or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error when stdin itself fails; bad directives are reported
    /// and the prompt continues.
    pub fn run_repl(&mut self) -> Result<()> {
        let stdin = io::stdin();
        while self.running {
            print!("any-macro> ");
            let _ = io::stdout().flush();

            let mut line = String::new();
            let read = stdin
                .lock()
                .read_line(&mut line)
                .map_err(|source| AppError::IoError {
                    source,
                    location: ErrorLocation::from(Location::caller()),
                })?;
            if read == 0 {
                break;
            }

            match script::parse_line(&line) {
                Ok(events) => {
                    for event in events {
                        self.dispatch(event);
                    }
                    self.pump();
                }
                Err(error) => println!("error: {error}"),
            }
        }
        Ok(())
    }

    /// Drains the event queue, waiting for deferred lifecycle events while
    /// any playback is live.
    ///
    /// Terminated events arrive from sleeper threads, so an empty queue with
    /// live playback means an event is still in flight; a queue that stays
    /// empty past the grace period means the host dropped one.
    pub fn pump(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.dispatch(event),
                Err(mpsc::TryRecvError::Empty) => {
                    if !self.running || self.sequencers.is_empty() {
                        break;
                    }
                    match self.events.recv_timeout(self.pump_grace) {
                        Ok(event) => self.dispatch(event),
                        Err(_) => {
                            warn!(
                                live = self.sequencers.len(),
                                "Playback stalled, abandoning pump"
                            );
                            break;
                        }
                    }
                }
                Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }
    }

    fn on_starting(&mut self, id: &CommandId) -> Result<()> {
        if self.recorder.is_active()
            && self.recorder.observe(id, self.bus.as_mut())? == Observation::AutoStopped
        {
            println!("recording stopped: {MAX_TRACK} command limit reached");
            self.session_id = None;
        }

        let mut first_error = None;
        for sequencer in &mut self.sequencers {
            if let Err(e) = sequencer.on_starting(id, self.bus.as_mut()) {
                first_error.get_or_insert(e);
            }
        }
        self.reap_finished();

        first_error.map_or(Ok(()), |e| Err(e.into()))
    }

    fn on_terminated(&mut self, id: &CommandId) -> Result<()> {
        let mut first_error = None;
        for sequencer in &mut self.sequencers {
            // A rejected follow-up execute halts that sequencer only; the
            // others keep replaying.
            if let Err(e) = sequencer.on_terminated(id, self.bus.as_mut()) {
                first_error.get_or_insert(e);
            }
        }
        self.reap_finished();

        first_error.map_or(Ok(()), |e| Err(e.into()))
    }

    /// Resolves a fired trigger to the thing it was bound to.
    ///
    /// Checked in ownership order: recorder fragments, then the draft's own
    /// triggers, then registry deletion triggers, then macro invocation by
    /// id, finally invocation by user-visible name as a convenience.
    fn on_trigger(&mut self, id: &CommandId) -> Result<()> {
        if let Some(fragment_id) = self.recorder.fragment_by_trigger(id) {
            self.recorder.remove_fragment(fragment_id, self.bus.as_mut())?;
            return Ok(());
        }

        if let Some(draft) = self.recorder.draft() {
            if draft.id() == id {
                let sequencer = draft.sequencer();
                return self.start_playback(sequencer);
            }
            if draft.delete_trigger_id() == *id {
                self.clear_recording();
                return Ok(());
            }
        }

        if let Some(owner) = self.registry.get_by_delete_trigger(id) {
            let owner_id = owner.id().clone();
            self.registry.delete(
                &owner_id,
                self.confirm.as_mut(),
                self.store.as_mut(),
                self.bus.as_mut(),
            )?;
            return Ok(());
        }

        if let Some(found) = self.registry.get(id) {
            let sequencer = found.sequencer();
            return self.start_playback(sequencer);
        }
        if let Some(found) = self.registry.get_by_name(id.as_str()) {
            let sequencer = found.sequencer();
            return self.start_playback(sequencer);
        }

        warn!(trigger = %id, "Trigger bound to nothing");
        Ok(())
    }

    fn start_playback(&mut self, mut sequencer: Sequencer) -> Result<()> {
        sequencer.start(self.bus.as_mut())?;
        if sequencer.is_live() {
            self.sequencers.push(sequencer);
        }
        Ok(())
    }

    fn reap_finished(&mut self) {
        self.sequencers.retain(Sequencer::is_live);
    }

    #[instrument(skip_all)]
    fn toggle_recording(&mut self) -> Result<()> {
        if self.recorder.is_active() {
            self.recorder.stop(self.bus.as_mut())?;
            if let Some(session) = self.session_id.take() {
                info!(%session, fragments = self.recorder.fragment_count(), "Recording session ended");
            }
            println!(
                "recording stopped ({} commands tracked)",
                self.recorder.fragment_count()
            );
        } else {
            let session = Uuid::new_v4();
            self.recorder.start(self.bus.as_mut())?;
            self.session_id = Some(session);
            info!(%session, "Recording session started");
            println!("recording started");
        }
        Ok(())
    }

    fn build_macro(&mut self, name: Option<String>) -> Result<()> {
        if self.recorder.draft().is_none() && self.recorder.fragment_count() == 0 {
            println!("nothing recorded");
            return Ok(());
        }

        self.recorder.build(
            name,
            self.naming.as_mut(),
            &mut self.registry,
            self.store.as_mut(),
            self.bus.as_mut(),
        )?;
        self.session_id = None;
        println!("macro built ({} registered)", self.registry.len());
        Ok(())
    }

    fn clear_recording(&mut self) {
        self.recorder.clear(self.bus.as_mut());
        self.session_id = None;
        println!("recording cleared");
    }

    fn list_macros(&self) {
        if self.registry.is_empty() {
            println!("no macros registered");
            return;
        }
        for entry in self.registry.iter() {
            println!(
                "  {}  \"{}\"  ({} commands)",
                entry.id(),
                entry.name(),
                entry.execute_list().len()
            );
        }
    }

    /// Merges externally supplied macro records into the registry.
    ///
    /// Accepts one record object or a list of them. Each valid record is
    /// registered (replacing a same-id macro); malformed entries are skipped
    /// with a warning. The store is rewritten only when something landed.
    #[instrument(skip_all)]
    fn inject(&mut self, value: Value) -> Result<()> {
        let items = match value {
            Value::Array(items) => items,
            other => vec![other],
        };

        let mut added = 0;
        for item in items {
            let reconstructed = serde_json::from_value::<MacroRecord>(item)
                .map_err(MacroError::from)
                .and_then(|record| Macro::from_record(record, self.bus.as_mut()));
            match reconstructed {
                Ok(injected) => {
                    info!(id = %injected.id(), "Macro injected");
                    self.registry.register(injected, self.bus.as_mut());
                    added += 1;
                }
                Err(e) => warn!(error = %e, "Skipping malformed injected record"),
            }
        }

        if added > 0 {
            self.registry.save(self.store.as_mut())?;
        }
        println!("injected {added} macro(s)");
        Ok(())
    }
}
