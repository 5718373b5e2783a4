#![no_main]
use libfuzzer_sys::fuzz_target;
use tuner_ui::{Command, command_for, parse_line};

fuzz_target!(|data: &str| {
    for line in data.lines() {
        // The canonical line for a parsed event must parse to the same canonical line.
        if let Ok(Some(Command::Event(event))) = parse_line(line) {
            let canonical = command_for(&event);
            match parse_line(&canonical) {
                Ok(Some(Command::Event(again))) => assert_eq!(command_for(&again), canonical),
                other => panic!("{canonical:?} reparsed as {other:?}"),
            }
        }
    }
});
