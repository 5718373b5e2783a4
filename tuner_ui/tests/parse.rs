use rstest::rstest;
use tuner_core::labels::{CLOSED_LOOP_CONTROL, IDLE};
use tuner_core::{Direction, Event};
use tuner_traits::Param;
use tuner_ui::{Command, ParseError, command_for, parse_line};

fn event(line: &str) -> Event {
    match parse_line(line) {
        Ok(Some(Command::Event(e))) => e,
        other => panic!("{line:?} parsed to {other:?}"),
    }
}

#[rstest]
#[case("refresh", Event::Refresh)]
#[case("set 0 pos_gain 25", Event::SetParam { axis: 0, param: Param::PosGain, value: 25.0 })]
#[case("set 1 vel_integrator_gain 0.5", Event::SetParam { axis: 1, param: Param::VelIntegratorGain, value: 0.5 })]
#[case("mode 1 2", Event::SelectMode { axis: 1, mode: 2 })]
#[case("mode 0 velocity control", Event::SelectMode { axis: 0, mode: 2 })]
#[case("mode 0 \"Torque Control\"", Event::SelectMode { axis: 0, mode: 1 })]
#[case("state 1 \"closed loop control\"", Event::SelectState { axis: 1, state: 8 })]
#[case("state 0 11", Event::SelectState { axis: 0, state: 11 })]
#[case("vel 1.5", Event::SetMagnitude(1.5))]
#[case("vel- 0", Event::CommandVelocity { axis: 0, direction: Direction::Negative })]
#[case("vel0 1", Event::CommandVelocity { axis: 1, direction: Direction::Zero })]
#[case("VEL+ 1", Event::CommandVelocity { axis: 1, direction: Direction::Positive })]
#[case("idle 1", Event::SwitchTo { axis: 1, state: IDLE })]
#[case("closed-loop 0", Event::SwitchTo { axis: 0, state: CLOSED_LOOP_CONTROL })]
#[case("  clear-errors  ", Event::ClearErrors)]
#[case("save", Event::SaveConfiguration)]
#[case("reboot", Event::Reboot)]
fn parses_commands(#[case] line: &str, #[case] expected: Event) {
    assert_eq!(event(line), expected);
}

#[rstest]
#[case("fly 0", ParseError::UnknownCommand("fly".to_string()))]
#[case("set 0", ParseError::MissingArgument("param"))]
#[case("set x pos_gain 1", ParseError::Invalid { what: "axis", value: "x".to_string() })]
#[case("set 0 gain 1", ParseError::Invalid { what: "param", value: "gain".to_string() })]
#[case("vel fast", ParseError::Invalid { what: "value", value: "fast".to_string() })]
#[case("state 0 warp drive", ParseError::Invalid { what: "state", value: "warp drive".to_string() })]
#[case("mode 0", ParseError::MissingArgument("mode"))]
#[case("save now", ParseError::Trailing("now".to_string()))]
#[case("state 0 \"idle", ParseError::UnterminatedQuote)]
fn rejects_malformed_lines(#[case] line: &str, #[case] expected: ParseError) {
    assert_eq!(parse_line(line), Err(expected));
}

#[test]
fn blank_and_comment_lines_are_skipped() {
    assert_eq!(parse_line(""), Ok(None));
    assert_eq!(parse_line("   "), Ok(None));
    assert_eq!(parse_line("# tune axis 0"), Ok(None));
}

#[test]
fn quit_and_help() {
    assert_eq!(parse_line("quit"), Ok(Some(Command::Quit)));
    assert_eq!(parse_line("exit"), Ok(Some(Command::Quit)));
    assert_eq!(parse_line("help"), Ok(Some(Command::Help)));
}

#[rstest]
#[case(Event::SwitchTo { axis: 1, state: IDLE })]
#[case(Event::SwitchTo { axis: 0, state: CLOSED_LOOP_CONTROL })]
#[case(Event::CommandVelocity { axis: 1, direction: Direction::Negative })]
#[case(Event::SelectState { axis: 0, state: 3 })]
#[case(Event::SetParam { axis: 0, param: Param::VelLimit, value: 2.5 })]
#[case(Event::ClearErrors)]
fn command_hints_parse_back(#[case] e: Event) {
    assert_eq!(event(&command_for(&e)), e);
}
