//! Line-oriented script parsing for driving a session without a terminal.
//!
//! One directive per line; blank lines and `#` comments are skipped. The
//! same grammar backs the interactive prompt, so a saved script is exactly
//! a replayable transcript of a session.

use crate::{AppError, HostEvent, Result};

use std::{fs, panic::Location, path::Path};

use any_macro_core::{CommandId, HALT_COMMAND_ID};
use error_location::ErrorLocation;

/// Parses a whole script file into the events it produces, in order.
#[track_caller]
pub fn parse_file(path: &Path) -> Result<Vec<HostEvent>> {
    let source = fs::read_to_string(path).map_err(|source| AppError::IoError {
        source,
        location: ErrorLocation::from(Location::caller()),
    })?;

    let mut events = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let parsed = parse_line(line).map_err(|error| AppError::ScriptError {
            reason: format!("line {}: {error}", index + 1),
            location: ErrorLocation::from(Location::caller()),
        })?;
        events.extend(parsed);
    }
    Ok(events)
}

/// Parses one directive into zero or more events.
///
/// Grammar:
/// - `do <command id>` emits a starting and a terminated event, like a user
///   running a command by hand
/// - `starting <id>` / `terminated <id>` emit one lifecycle event
/// - `record` / `stop` toggle recording
/// - `build [name]` builds the draft, prompting for a name when none is given
/// - `clear` discards the recording
/// - `run <macro id>` fires a macro's trigger
/// - `halt` fires the playback halt signal
/// - `list` prints the registered macros
/// - `inject <json>` merges records into the registry
/// - `quit` ends the session
#[track_caller]
pub fn parse_line(line: &str) -> Result<Vec<HostEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Vec::new());
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let events = match verb {
        "do" => {
            let id = required_argument(verb, rest)?;
            vec![
                HostEvent::CommandStarting(id.clone()),
                HostEvent::CommandTerminated(id),
            ]
        }
        "starting" => vec![HostEvent::CommandStarting(required_argument(verb, rest)?)],
        "terminated" => vec![HostEvent::CommandTerminated(required_argument(verb, rest)?)],
        "record" | "stop" => vec![HostEvent::ToggleRecording],
        "build" => {
            let name = if rest.is_empty() {
                None
            } else {
                Some(rest.to_string())
            };
            vec![HostEvent::BuildMacro { name }]
        }
        "clear" => vec![HostEvent::ClearRecording],
        "run" => vec![HostEvent::TriggerFired(required_argument(verb, rest)?)],
        "halt" => vec![HostEvent::CommandStarting(CommandId::from(HALT_COMMAND_ID))],
        "list" => vec![HostEvent::ListMacros],
        "inject" => {
            let value =
                serde_json::from_str(rest).map_err(|error| AppError::ScriptError {
                    reason: format!("inject expects JSON: {error}"),
                    location: ErrorLocation::from(Location::caller()),
                })?;
            vec![HostEvent::InjectMacros(value)]
        }
        "quit" => vec![HostEvent::Shutdown],
        unknown => {
            return Err(AppError::ScriptError {
                reason: format!("unknown directive '{unknown}'"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };
    Ok(events)
}

#[track_caller]
fn required_argument(verb: &str, rest: &str) -> Result<CommandId> {
    if rest.is_empty() {
        return Err(AppError::ScriptError {
            reason: format!("'{verb}' requires a command id"),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(CommandId::from(rest))
}
