//! In-memory collection of built macros plus its persistence glue.

use crate::{
    command::CommandId,
    error::{MacroError, Result},
    host::{CommandBus, Confirmation, ConfirmPrompt, MacroStore},
    macros::{Macro, MacroRecord},
};

use std::panic::Location;

use error_location::ErrorLocation;
use serde_json::Value;
use tracing::{info, instrument, warn};

/// Session-owned set of macros, keyed by unique id.
///
/// Iteration order is registration order, which is also persistence order.
#[derive(Debug, Default)]
pub struct Registry {
    macros: Vec<Macro>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered macros.
    pub fn len(&self) -> usize {
        self.macros.len()
    }

    /// Whether no macros are registered.
    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Iterates macros in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Macro> {
        self.macros.iter()
    }

    /// Looks up a macro by id.
    pub fn get(&self, id: &CommandId) -> Option<&Macro> {
        self.macros.iter().find(|m| m.id() == id)
    }

    /// Looks up a macro by user-visible name.
    pub fn get_by_name(&self, name: &str) -> Option<&Macro> {
        self.macros.iter().find(|m| m.name() == name)
    }

    /// Looks up the macro owning the given deletion trigger.
    pub fn get_by_delete_trigger(&self, trigger_id: &CommandId) -> Option<&Macro> {
        self.macros
            .iter()
            .find(|m| m.delete_trigger_id() == *trigger_id)
    }

    /// Adds a macro, replacing any existing entry with the same id.
    ///
    /// Replacement keeps runtime behavior consistent with the last-wins
    /// shadowing a reload would produce; the shadowed macro's triggers are
    /// removed so they cannot mis-fire.
    pub fn register(&mut self, new: Macro, bus: &mut dyn CommandBus) {
        if let Some(position) = self.macros.iter().position(|m| m.id() == new.id()) {
            let mut shadowed = self.macros.remove(position);
            warn!(id = %shadowed.id(), "Replacing macro with duplicate id");
            shadowed.remove_triggers(bus);
        }
        self.macros.push(new);
    }

    /// Removes and returns a macro without touching its triggers.
    pub fn remove(&mut self, id: &CommandId) -> Option<Macro> {
        let position = self.macros.iter().position(|m| m.id() == id)?;
        Some(self.macros.remove(position))
    }

    /// Deletes a macro after user confirmation and rewrites the store.
    ///
    /// Only an explicit yes proceeds; no and cancelled leave the registry and
    /// the persisted store untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MacroError::ConfirmationDeclined`] when the user does not
    /// confirm, or a store error from the rewrite.
    #[track_caller]
    pub fn delete(
        &mut self,
        id: &CommandId,
        confirm: &mut dyn ConfirmPrompt,
        store: &mut dyn MacroStore,
        bus: &mut dyn CommandBus,
    ) -> Result<()> {
        let Some(target) = self.get(id) else {
            return Ok(());
        };

        let message = format!(
            "Are you sure you wish to delete the macro \"{}\"?",
            target.name()
        );
        match confirm.prompt_yes_no_cancel(&message, "Confirm Macro Deletion") {
            Confirmation::Yes => {}
            Confirmation::No | Confirmation::Cancelled => {
                return Err(MacroError::ConfirmationDeclined {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        if let Some(mut removed) = self.remove(id) {
            removed.remove_triggers(bus);
            info!(id = %id, "Macro deleted");
        }
        self.save(store)
    }

    /// Reconstructs macros from the store, best effort.
    ///
    /// A malformed record is skipped with a warning and loading continues
    /// with the rest; records sharing an id shadow earlier ones. Returns the
    /// number of macros loaded.
    ///
    /// # Errors
    ///
    /// Returns an error only when the store itself cannot be read or its top
    /// level is not a list.
    #[track_caller]
    #[instrument(skip_all)]
    pub fn load(&mut self, store: &dyn MacroStore, bus: &mut dyn CommandBus) -> Result<usize> {
        let Some(value) = store.read()? else {
            return Ok(0);
        };

        let Value::Array(items) = value else {
            return Err(MacroError::InvalidRecord {
                reason: "store root is not a list".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let mut loaded = 0;
        for item in items {
            let reconstructed = serde_json::from_value::<MacroRecord>(item)
                .map_err(MacroError::from)
                .and_then(|record| Macro::from_record(record, bus));
            match reconstructed {
                Ok(loaded_macro) => {
                    self.register(loaded_macro, bus);
                    loaded += 1;
                }
                Err(e) => warn!(error = %e, "Skipping malformed macro record"),
            }
        }

        info!(loaded, "Macro store loaded");

        Ok(loaded)
    }

    /// Serializes every built macro's record, in registry order, and writes
    /// the store wholesale.
    ///
    /// # Errors
    ///
    /// Returns a store error if serialization or the write fails.
    #[instrument(skip_all)]
    pub fn save(&self, store: &mut dyn MacroStore) -> Result<()> {
        let records: Vec<MacroRecord> = self
            .macros
            .iter()
            .filter(|m| m.is_built())
            .map(Macro::to_record)
            .collect();

        let value = serde_json::to_value(&records)?;
        store.write(&value)?;

        info!(macros = records.len(), "Macro store saved");

        Ok(())
    }
}
