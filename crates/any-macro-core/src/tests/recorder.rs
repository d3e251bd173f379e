use crate::tests::support::{cmd, CannedName, MockBus};
use crate::{
    MacroError, MemoryStore, Observation, Recorder, Registry, TextResponse, MAX_TRACK,
    SELECT_COMMAND_ID,
};

fn active_recorder(bus: &mut MockBus, consecutive_block: bool) -> Recorder {
    let mut recorder = Recorder::new(cmd("AnyMacro_ToggleRecording"), consecutive_block);
    #[allow(clippy::unwrap_used)]
    recorder.start(bus).unwrap();
    recorder
}

/// WHAT: Fragments preserve the order commands were observed starting
/// WHY: Fragment order is the macro's replay order
#[test]
#[allow(clippy::unwrap_used)]
fn given_active_recorder_when_observing_commands_then_fragments_in_order() {
    // Given: An active recorder with blocking disabled
    let mut bus = MockBus::new();
    let mut recorder = active_recorder(&mut bus, false);

    // When: Observing four starting events
    for id in ["A", "B", "A", "C"] {
        recorder.observe(&cmd(id), &mut bus).unwrap();
    }

    // Then: Fragments match observation order exactly
    let recorded: Vec<&str> = recorder
        .fragments()
        .iter()
        .map(|f| f.command().as_str())
        .collect();
    assert_eq!(recorded, ["A", "B", "A", "C"]);
}

/// WHAT: Consecutive equal ids collapse to one fragment while blocking is on
/// WHY: Repeated fast re-fires of one command are a single user action
#[test]
#[allow(clippy::unwrap_used)]
fn given_consecutive_block_enabled_when_same_command_repeats_then_single_fragment() {
    // Given: An active recorder with blocking enabled
    let mut bus = MockBus::new();
    let mut recorder = active_recorder(&mut bus, true);

    // When: Observing A three times, then B, then A again
    for id in ["A", "A", "A", "B", "A"] {
        recorder.observe(&cmd(id), &mut bus).unwrap();
    }

    // Then: The run of equal ids collapsed; A after B records again
    let recorded: Vec<&str> = recorder
        .fragments()
        .iter()
        .map(|f| f.command().as_str())
        .collect();
    assert_eq!(recorded, ["A", "B", "A"]);
}

/// WHAT: With blocking disabled every qualifying event records
/// WHY: The toggle must actually change observable behavior
#[test]
#[allow(clippy::unwrap_used)]
fn given_consecutive_block_disabled_when_same_command_repeats_then_all_recorded() {
    // Given: An active recorder with blocking disabled
    let mut bus = MockBus::new();
    let mut recorder = active_recorder(&mut bus, false);

    // When: Observing A, A, B
    for id in ["A", "A", "B"] {
        recorder.observe(&cmd(id), &mut bus).unwrap();
    }

    // Then: All three starting events became fragments
    let recorded: Vec<&str> = recorder
        .fragments()
        .iter()
        .map(|f| f.command().as_str())
        .collect();
    assert_eq!(recorded, ["A", "A", "B"]);
}

/// WHAT: The recorder's own trigger and the selection command are never recorded
/// WHY: Host-UI noise is not user intent
#[test]
#[allow(clippy::unwrap_used)]
fn given_reserved_ids_when_observed_then_skipped() {
    // Given: An active recorder
    let mut bus = MockBus::new();
    let mut recorder = active_recorder(&mut bus, false);

    // When: Observing the toggle id and the selection id
    let toggle = recorder.observe(&cmd("AnyMacro_ToggleRecording"), &mut bus).unwrap();
    let select = recorder.observe(&cmd(SELECT_COMMAND_ID), &mut bus).unwrap();

    // Then: Both were skipped and nothing was recorded
    assert_eq!(toggle, Observation::Skipped);
    assert_eq!(select, Observation::Skipped);
    assert_eq!(recorder.fragment_count(), 0);
}

/// WHAT: Observing an eleventh distinct command stops recording without appending
/// WHY: The fragment cap is enforced before append, never transiently exceeded
#[test]
#[allow(clippy::unwrap_used)]
fn given_full_recorder_when_observing_another_command_then_auto_stops() {
    // Given: A recorder filled to MAX_TRACK distinct commands
    let mut bus = MockBus::new();
    let mut recorder = active_recorder(&mut bus, false);
    for i in 0..MAX_TRACK {
        recorder.observe(&cmd(&format!("Cmd{i}")), &mut bus).unwrap();
    }
    assert_eq!(recorder.fragment_count(), MAX_TRACK);

    // When: Observing one more qualifying command
    let result = recorder.observe(&cmd("Overflow"), &mut bus).unwrap();

    // Then: Recording auto-stopped; the cap still holds and a draft exists
    assert_eq!(result, Observation::AutoStopped);
    assert!(!recorder.is_active());
    assert_eq!(recorder.fragment_count(), MAX_TRACK);
    assert!(recorder.draft().is_some());
    assert_eq!(bus.active_subscriptions(), 0);
}

/// WHAT: Stopping with zero fragments produces no draft
/// WHY: An empty recording is not a macro
#[test]
#[allow(clippy::unwrap_used)]
fn given_no_fragments_when_stopping_then_no_draft() {
    // Given: An active recorder that observed nothing
    let mut bus = MockBus::new();
    let mut recorder = active_recorder(&mut bus, false);

    // When: Stopping
    recorder.stop(&mut bus).unwrap();

    // Then: No draft was created and the subscription was released
    assert!(recorder.draft().is_none());
    assert_eq!(bus.active_subscriptions(), 0);
}

/// WHAT: Removing a fragment re-synchronizes the draft's command list
/// WHY: The draft must always mirror the current fragment order
#[test]
#[allow(clippy::unwrap_used)]
fn given_draft_when_removing_fragment_then_draft_resynchronized() {
    // Given: A stopped recording [A, B, C] with a draft
    let mut bus = MockBus::new();
    let mut recorder = active_recorder(&mut bus, false);
    for id in ["A", "B", "C"] {
        recorder.observe(&cmd(id), &mut bus).unwrap();
    }
    recorder.stop(&mut bus).unwrap();

    // When: Removing the middle fragment
    let middle = recorder.fragments()[1].id();
    let removed = recorder.remove_fragment(middle, &mut bus).unwrap();

    // Then: The fragment is gone and the draft now wraps [A, C]
    assert!(removed);
    let draft = recorder.draft().unwrap();
    let draft_list: Vec<&str> = draft.execute_list().iter().map(|c| c.as_str()).collect();
    assert_eq!(draft_list, ["A", "C"]);
}

/// WHAT: A cancelled naming prompt fails the build but keeps the draft
/// WHY: The user must be able to retry without re-recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_draft_when_naming_cancelled_then_draft_retained() {
    // Given: A stopped recording with a draft
    let mut bus = MockBus::new();
    let mut recorder = active_recorder(&mut bus, false);
    recorder.observe(&cmd("A"), &mut bus).unwrap();
    recorder.stop(&mut bus).unwrap();

    let mut registry = Registry::new();
    let mut store = MemoryStore::new();
    let mut naming = CannedName(TextResponse::Cancelled);

    // When: Building with a cancelled prompt
    let result = recorder.build(None, &mut naming, &mut registry, &mut store, &mut bus);

    // Then: Build failed non-destructively
    assert!(matches!(result, Err(MacroError::NamingCancelled { .. })));
    assert!(recorder.draft().is_some());
    assert!(registry.is_empty());
    assert!(store.value().is_none());
}

/// WHAT: A successful build registers, persists, and clears the recorder
/// WHY: Completes the draft-to-built macro lifecycle
#[test]
#[allow(clippy::unwrap_used)]
fn given_draft_when_built_then_registered_persisted_and_cleared() {
    // Given: A stopped recording [A, B] with a draft
    let mut bus = MockBus::new();
    let mut recorder = active_recorder(&mut bus, false);
    recorder.observe(&cmd("A"), &mut bus).unwrap();
    recorder.observe(&cmd("B"), &mut bus).unwrap();
    recorder.stop(&mut bus).unwrap();

    let mut registry = Registry::new();
    let mut store = MemoryStore::new();
    let mut naming = CannedName(TextResponse::Entered("My Macro".to_string()));

    // When: Building through the naming prompt
    recorder
        .build(None, &mut naming, &mut registry, &mut store, &mut bus)
        .unwrap();

    // Then: The macro is registered under its derived id and persisted
    let built = registry.get(&cmd("AnyMacro_My_Macro")).unwrap();
    assert_eq!(built.name(), "My Macro");
    assert!(built.is_built());
    assert!(store.value().is_some());

    // And: The recorder is cleared for the next session
    assert_eq!(recorder.fragment_count(), 0);
    assert!(recorder.draft().is_none());
}

/// WHAT: A rejected subscription leaves the recorder inactive
/// WHY: An inactive recorder must not pretend to be tracking
#[test]
fn given_failed_subscription_when_starting_then_recorder_stays_inactive() {
    // Given: A bus that rejects subscriptions
    let mut bus = MockBus::new();
    bus.fail_subscribe = true;
    let mut recorder = Recorder::new(cmd("AnyMacro_ToggleRecording"), false);

    // When: Starting the recorder
    let result = recorder.start(&mut bus);

    // Then: The start failed and the recorder is not active
    assert!(result.is_err());
    assert!(!recorder.is_active());
}

/// WHAT: Clearing deletes every fragment trigger and the draft's triggers
/// WHY: Leaked UI triggers would mis-fire on future host activity
#[test]
#[allow(clippy::unwrap_used)]
fn given_fragments_and_draft_when_cleared_then_all_triggers_removed() {
    // Given: A stopped recording [A, B] with a draft
    let mut bus = MockBus::new();
    let mut recorder = active_recorder(&mut bus, false);
    recorder.observe(&cmd("A"), &mut bus).unwrap();
    recorder.observe(&cmd("B"), &mut bus).unwrap();
    recorder.stop(&mut bus).unwrap();

    // When: Clearing the recorder
    recorder.clear(&mut bus);

    // Then: Every defined trigger was removed again
    assert_eq!(recorder.fragment_count(), 0);
    assert!(recorder.draft().is_none());
    assert_eq!(bus.removed_triggers.len(), bus.defined_triggers.len());
}
