use crate::{script::parse_line, HostEvent};

use any_macro_core::HALT_COMMAND_ID;

/// WHAT: Blank lines and comments parse to no events
/// WHY: Scripts need annotation without side effects
#[test]
#[allow(clippy::unwrap_used)]
fn given_blank_and_comment_lines_when_parsed_then_no_events() {
    // Given / When
    let blank = parse_line("   ").unwrap();
    let comment = parse_line("# replay the sketch macro").unwrap();

    // Then
    assert!(blank.is_empty());
    assert!(comment.is_empty());
}

/// WHAT: `do` expands to a starting and a terminated event for the same id
/// WHY: One directive stands in for a user running a command by hand
#[test]
#[allow(clippy::unwrap_used)]
fn given_do_directive_when_parsed_then_start_and_terminate_emitted() {
    // When
    let events = parse_line("do SketchLine").unwrap();

    // Then
    assert_eq!(events.len(), 2);
    assert!(
        matches!(&events[0], HostEvent::CommandStarting(id) if id.as_str() == "SketchLine")
    );
    assert!(
        matches!(&events[1], HostEvent::CommandTerminated(id) if id.as_str() == "SketchLine")
    );
}

/// WHAT: `build` carries an optional name, including names with spaces
/// WHY: A missing name must defer to the naming prompt instead of failing
#[test]
#[allow(clippy::unwrap_used)]
fn given_build_directive_when_parsed_then_name_is_optional() {
    // When
    let named = parse_line("build My Sketch Setup").unwrap();
    let unnamed = parse_line("build").unwrap();

    // Then
    assert!(
        matches!(&named[0], HostEvent::BuildMacro { name: Some(n) } if n == "My Sketch Setup")
    );
    assert!(matches!(&unnamed[0], HostEvent::BuildMacro { name: None }));
}

/// WHAT: `halt` emits a starting event carrying the halt signal id
/// WHY: Halting rides the same lifecycle stream sequencers already watch
#[test]
#[allow(clippy::unwrap_used)]
fn given_halt_directive_when_parsed_then_halt_signal_emitted() {
    // When
    let events = parse_line("halt").unwrap();

    // Then
    assert!(
        matches!(&events[0], HostEvent::CommandStarting(id) if id.as_str() == HALT_COMMAND_ID)
    );
}

/// WHAT: `inject` parses its JSON payload eagerly
/// WHY: A malformed payload should fail at the directive, not mid-session
#[test]
#[allow(clippy::unwrap_used)]
fn given_inject_directive_when_parsed_then_json_validated() {
    // When
    let good = parse_line(r#"inject {"name":"T","id":"AnyMacro_T","executeList":["A"]}"#);
    let bad = parse_line("inject {not json");

    // Then
    assert!(matches!(
        good.unwrap().first(),
        Some(HostEvent::InjectMacros(_))
    ));
    assert!(bad.is_err());
}

/// WHAT: Unknown verbs and missing arguments are rejected
/// WHY: A typo'd script line must not be silently skipped
#[test]
fn given_bad_directives_when_parsed_then_errors_returned() {
    assert!(parse_line("frobnicate").is_err());
    assert!(parse_line("do").is_err());
    assert!(parse_line("run").is_err());
}
