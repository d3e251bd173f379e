//! Macro identity, list management, and persistence mapping.

use crate::{
    command::{to_identifier, CommandId},
    error::{MacroError, Result},
    host::{CommandBus, NamePrompt, TextResponse, TriggerHandle},
    sequencer::Sequencer,
};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Prefix for identifiers derived from macro names.
pub const DERIVED_ID_PREFIX: &str = "AnyMacro";

const DRAFT_ID: &str = "AnyMacro_Draft";
const DRAFT_NAME: &str = "Unsaved Macro";

/// Persisted shape of one built macro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroRecord {
    /// User-visible macro name.
    pub name: String,
    /// Unique macro identifier.
    pub id: String,
    /// Ordered command list replayed on invocation.
    #[serde(rename = "executeList")]
    pub execute_list: Vec<CommandId>,
}

impl MacroRecord {
    /// Checks that all three fields are present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`MacroError::InvalidRecord`] naming the offending field.
    #[track_caller]
    pub fn validate(&self) -> Result<()> {
        let reason = if self.name.is_empty() {
            "empty name"
        } else if self.id.is_empty() {
            "empty id"
        } else if self.execute_list.is_empty() {
            "empty executeList"
        } else {
            return Ok(());
        };

        Err(MacroError::InvalidRecord {
            reason: reason.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// The pair of host UI triggers one macro owns: invoke and delete.
#[derive(Debug)]
pub struct MacroTriggers {
    /// Trigger bound to the macro id itself; firing it starts playback.
    pub invoke: TriggerHandle,
    /// Trigger bound to `{id}_delete`; firing it requests deletion.
    pub delete: TriggerHandle,
}

/// A named, reusable ordered command sequence.
///
/// A macro starts life as a Recorder-owned draft with placeholder identity
/// and becomes built (named, persisted, Registry-owned) via
/// [`Macro::finish_build`] or [`Macro::from_record`].
#[derive(Debug)]
pub struct Macro {
    id: CommandId,
    name: String,
    execute_list: Vec<CommandId>,
    is_built: bool,
    triggers: Option<MacroTriggers>,
}

impl Macro {
    /// Creates a draft macro wrapping a recorded command list.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects trigger creation.
    pub fn draft(execute_list: Vec<CommandId>, bus: &mut dyn CommandBus) -> Result<Self> {
        let mut draft = Self {
            id: CommandId::new(DRAFT_ID),
            name: DRAFT_NAME.to_string(),
            execute_list,
            is_built: false,
            triggers: None,
        };
        draft.create_triggers(bus)?;

        debug!(commands = draft.execute_list.len(), "Draft macro created");

        Ok(draft)
    }

    /// Reconstructs a built macro from a persisted record.
    ///
    /// # Errors
    ///
    /// Returns [`MacroError::InvalidRecord`] for incomplete records, or a
    /// host error if trigger creation fails.
    pub fn from_record(record: MacroRecord, bus: &mut dyn CommandBus) -> Result<Self> {
        record.validate()?;

        let mut loaded = Self {
            id: CommandId::new(record.id),
            name: record.name,
            execute_list: record.execute_list,
            is_built: true,
            triggers: None,
        };
        loaded.create_triggers(bus)?;

        Ok(loaded)
    }

    /// Derives the macro id for a given name.
    pub fn derived_id(name: &str) -> CommandId {
        CommandId::new(format!("{DERIVED_ID_PREFIX}_{}", to_identifier(name)))
    }

    /// Assigns final identity to a draft and marks it built.
    ///
    /// When `name` is `None` the naming collaborator is asked. Cancellation
    /// or an empty name fails without touching the draft's current identity,
    /// so the caller may retry.
    ///
    /// # Errors
    ///
    /// Returns [`MacroError::NamingCancelled`] on an aborted or empty prompt,
    /// or a host error if trigger re-creation fails.
    #[track_caller]
    pub fn finish_build(
        &mut self,
        name: Option<String>,
        naming: &mut dyn NamePrompt,
        bus: &mut dyn CommandBus,
    ) -> Result<()> {
        let name = match name {
            Some(name) => name,
            None => match naming.prompt_for_text("Naming Macro", "Enter macro name:") {
                TextResponse::Entered(text) => text,
                TextResponse::Cancelled => {
                    return Err(MacroError::NamingCancelled {
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            },
        };

        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(MacroError::NamingCancelled {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.id = Self::derived_id(&name);
        self.name = name;
        self.is_built = true;
        self.create_triggers(bus)?;

        info!(id = %self.id, name = %self.name, "Macro built");

        Ok(())
    }

    /// Replaces the bound command list after fragment edits and re-creates
    /// the invocation and deletion triggers.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects trigger creation.
    pub fn rebind(&mut self, execute_list: Vec<CommandId>, bus: &mut dyn CommandBus) -> Result<()> {
        self.execute_list = execute_list;
        self.create_triggers(bus)
    }

    /// Removes both triggers from the host, if present.
    pub fn remove_triggers(&mut self, bus: &mut dyn CommandBus) {
        if let Some(triggers) = self.triggers.take() {
            bus.remove_trigger(triggers.invoke);
            bus.remove_trigger(triggers.delete);
        }
    }

    fn create_triggers(&mut self, bus: &mut dyn CommandBus) -> Result<()> {
        self.remove_triggers(bus);

        let invoke = bus.define_trigger(&self.id, &self.name)?;
        let delete = bus.define_trigger(
            &self.delete_trigger_id(),
            &format!("Delete {}", self.name),
        )?;
        self.triggers = Some(MacroTriggers { invoke, delete });

        Ok(())
    }

    /// Unique macro identifier (also its invocation trigger id).
    pub fn id(&self) -> &CommandId {
        &self.id
    }

    /// User-visible macro name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered command list replayed on invocation.
    pub fn execute_list(&self) -> &[CommandId] {
        &self.execute_list
    }

    /// Whether this macro has been named and persisted.
    pub fn is_built(&self) -> bool {
        self.is_built
    }

    /// Identifier the paired deletion trigger is bound to.
    pub fn delete_trigger_id(&self) -> CommandId {
        CommandId::new(format!("{}_delete", self.id))
    }

    /// Creates a fresh sequencer over this macro's command list.
    pub fn sequencer(&self) -> Sequencer {
        Sequencer::new(self.execute_list.iter().cloned())
    }

    /// Persistence mapping.
    pub fn to_record(&self) -> MacroRecord {
        MacroRecord {
            name: self.name.clone(),
            id: self.id.as_str().to_string(),
            execute_list: self.execute_list.clone(),
        }
    }
}
