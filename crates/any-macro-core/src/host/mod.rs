mod bus;
mod prompt;
mod store;

pub use {
    bus::{CommandBus, StreamKind, SubscriptionHandle, TriggerHandle},
    prompt::{Confirmation, ConfirmPrompt, NamePrompt, TextResponse},
    store::{JsonFileStore, MacroStore, MemoryStore},
};
