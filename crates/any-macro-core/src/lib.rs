//! AnyMacro Core Library
//!
//! Command-macro recording and sequential playback engine. Observes the host
//! application's command-lifecycle events through the [`CommandBus`] seam,
//! turns them into ordered macros, persists them as JSON, and replays them
//! one command at a time with strict start/terminate synchronization.
//!
//! # Example
//!
//! ```no_run
//! use any_macro_core::{
//!     CommandBus, CommandId, CoreResult, Recorder, StreamKind, SubscriptionHandle,
//!     TriggerHandle,
//! };
//!
//! struct NullBus(u64);
//!
//! impl CommandBus for NullBus {
//!     fn execute_command(&mut self, _id: &CommandId) -> CoreResult<()> {
//!         Ok(())
//!     }
//!     fn subscribe(&mut self, _stream: StreamKind) -> CoreResult<SubscriptionHandle> {
//!         self.0 += 1;
//!         Ok(SubscriptionHandle::new(self.0))
//!     }
//!     fn unsubscribe(&mut self, _handle: SubscriptionHandle) {}
//!     fn define_trigger(&mut self, id: &CommandId, _label: &str) -> CoreResult<TriggerHandle> {
//!         Ok(TriggerHandle::new(id.clone()))
//!     }
//!     fn remove_trigger(&mut self, _handle: TriggerHandle) {}
//! }
//!
//! fn main() -> CoreResult<()> {
//!     let mut bus = NullBus(0);
//!     let mut recorder = Recorder::new(CommandId::new("AnyMacro_ToggleRecording"), false);
//!
//!     recorder.start(&mut bus)?;
//!     recorder.observe(&CommandId::new("SketchCreate"), &mut bus)?;
//!     recorder.observe(&CommandId::new("ExtrudeCommand"), &mut bus)?;
//!     recorder.stop(&mut bus)?;
//!
//!     assert_eq!(recorder.fragment_count(), 2);
//!     Ok(())
//! }
//! ```

mod command;
mod error;
mod host;
mod macros;
mod recorder;
mod registry;
mod sequencer;

pub use {
    command::{to_identifier, CommandId, HALT_COMMAND_ID, SELECT_COMMAND_ID},
    error::{MacroError, Result as CoreResult},
    host::{
        CommandBus, Confirmation, ConfirmPrompt, JsonFileStore, MacroStore, MemoryStore,
        NamePrompt, StreamKind, SubscriptionHandle, TextResponse, TriggerHandle,
    },
    macros::{Macro, MacroRecord, MacroTriggers, DERIVED_ID_PREFIX},
    recorder::{Fragment, FragmentId, Observation, Recorder, MAX_TRACK},
    registry::Registry,
    sequencer::{Sequencer, SequencerState},
};

#[cfg(test)]
mod tests;
