use any_macro_core::CommandId;

/// Events dispatched on the session's single event loop.
///
/// One variant per event kind, routed by explicit matching; handlers never
/// capture mutable state across registrations.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// A host command began executing.
    CommandStarting(CommandId),
    /// A host command finished executing.
    CommandTerminated(CommandId),
    /// A defined UI trigger was invoked (macro, fragment, or delete trigger).
    TriggerFired(CommandId),
    /// Toggle the recorder between tracking and stopped.
    ToggleRecording,
    /// Name the current draft and persist it as a built macro.
    BuildMacro {
        /// Pre-supplied name; `None` asks the naming collaborator.
        name: Option<String>,
    },
    /// Discard the current draft and all recorded fragments.
    ClearRecording,
    /// Print the registered macros.
    ListMacros,
    /// Cross-process injection payload: one record or a list of records.
    InjectMacros(serde_json::Value),
    /// Stop the event loop.
    Shutdown,
}
