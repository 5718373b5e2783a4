//! Line-oriented command language.
//!
//! ```text
//! set 0 vel_limit 4.5        mode 1 velocity control     vel 2.0
//! vel- 1 | vel0 1 | vel+ 1   state 0 "closed loop control"
//! idle 0 | closed-loop 0     clear-errors | save | reboot | refresh | quit
//! ```
//! Mode and state accept either the numeric code or the label.

use thiserror::Error;
use tuner_core::labels::{CLOSED_LOOP_CONTROL, IDLE, LabelTable, MODES, STATES};
use tuner_core::{Direction, Event};
use tuner_traits::Param;

pub const HELP: &str = "\
commands:
  refresh                          re-render
  set <axis> <param> <value>       param: pos_gain|vel_gain|vel_integrator_gain|vel_limit
  mode <axis> <code|label>         e.g. mode 0 velocity control
  vel <value>                      velocity magnitude for vel-/vel0/vel+
  vel- <axis> | vel0 <axis> | vel+ <axis>
  state <axis> <code|label>        e.g. state 1 \"closed loop control\"
  idle <axis> | closed-loop <axis> state shortcuts
  clear-errors | save | reboot     device actions
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(Event),
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("invalid {what}: '{value}'")]
    Invalid { what: &'static str, value: String },
    #[error("unexpected trailing input: '{0}'")]
    Trailing(String),
    #[error("unterminated quote")]
    UnterminatedQuote,
}

fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut has_token = false;
    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    out.push(std::mem::take(&mut cur));
                    has_token = false;
                }
            }
            c => {
                cur.push(c);
                has_token = true;
            }
        }
    }
    if in_quotes {
        return Err(ParseError::UnterminatedQuote);
    }
    if has_token {
        out.push(cur);
    }
    Ok(out)
}

struct Args {
    tokens: std::vec::IntoIter<String>,
}

impl Args {
    fn next(&mut self, what: &'static str) -> Result<String, ParseError> {
        self.tokens.next().ok_or(ParseError::MissingArgument(what))
    }

    fn axis(&mut self) -> Result<usize, ParseError> {
        let raw = self.next("axis")?;
        raw.parse().map_err(|_| ParseError::Invalid {
            what: "axis",
            value: raw,
        })
    }

    fn number(&mut self, what: &'static str) -> Result<f32, ParseError> {
        let raw = self.next(what)?;
        raw.parse().map_err(|_| ParseError::Invalid { what, value: raw })
    }

    /// A code or a label; unquoted labels may span the remaining tokens.
    fn code(&mut self, what: &'static str, table: &LabelTable) -> Result<u8, ParseError> {
        let rest: Vec<String> = self.tokens.by_ref().collect();
        if rest.is_empty() {
            return Err(ParseError::MissingArgument(what));
        }
        let joined = rest.join(" ");
        if let Ok(code) = joined.parse::<u8>() {
            return Ok(code);
        }
        table
            .index_of(&joined.to_lowercase())
            .ok_or(ParseError::Invalid { what, value: joined })
    }

    fn finish(mut self, cmd: Command) -> Result<Option<Command>, ParseError> {
        match self.tokens.next() {
            Some(extra) => Err(ParseError::Trailing(extra)),
            None => Ok(Some(cmd)),
        }
    }
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let mut tokens = tokenize(trimmed)?.into_iter();
    let Some(head) = tokens.next() else {
        return Ok(None);
    };
    let mut args = Args { tokens };

    let event = match head.to_ascii_lowercase().as_str() {
        "help" | "?" => return args.finish(Command::Help),
        "quit" | "exit" | "q" => return args.finish(Command::Quit),
        "refresh" | "r" => Event::Refresh,
        "set" => {
            let axis = args.axis()?;
            let name = args.next("param")?;
            let param = Param::from_name(&name).ok_or(ParseError::Invalid {
                what: "param",
                value: name,
            })?;
            let value = args.number("value")?;
            Event::SetParam { axis, param, value }
        }
        "mode" => {
            let axis = args.axis()?;
            let mode = args.code("mode", &MODES)?;
            Event::SelectMode { axis, mode }
        }
        "state" => {
            let axis = args.axis()?;
            let state = args.code("state", &STATES)?;
            Event::SelectState { axis, state }
        }
        "vel" => Event::SetMagnitude(args.number("value")?),
        "vel-" => Event::CommandVelocity {
            axis: args.axis()?,
            direction: Direction::Negative,
        },
        "vel0" => Event::CommandVelocity {
            axis: args.axis()?,
            direction: Direction::Zero,
        },
        "vel+" => Event::CommandVelocity {
            axis: args.axis()?,
            direction: Direction::Positive,
        },
        "idle" => Event::SwitchTo {
            axis: args.axis()?,
            state: IDLE,
        },
        "closed-loop" => Event::SwitchTo {
            axis: args.axis()?,
            state: CLOSED_LOOP_CONTROL,
        },
        "clear-errors" => Event::ClearErrors,
        "save" => Event::SaveConfiguration,
        "reboot" => Event::Reboot,
        _ => return Err(ParseError::UnknownCommand(head)),
    };
    args.finish(Command::Event(event))
}

/// The command line that produces `event`.
pub fn command_for(event: &Event) -> String {
    match *event {
        Event::Refresh => "refresh".to_string(),
        Event::SetParam { axis, param, value } => format!("set {axis} {param} {value}"),
        Event::SelectMode { axis, mode } => format!("mode {axis} {mode}"),
        Event::SetMagnitude(value) => format!("vel {value}"),
        Event::CommandVelocity { axis, direction } => match direction {
            Direction::Negative => format!("vel- {axis}"),
            Direction::Zero => format!("vel0 {axis}"),
            Direction::Positive => format!("vel+ {axis}"),
        },
        Event::SelectState { axis, state } => format!("state {axis} {state}"),
        Event::SwitchTo { axis, state } if state == IDLE => format!("idle {axis}"),
        Event::SwitchTo { axis, state } if state == CLOSED_LOOP_CONTROL => {
            format!("closed-loop {axis}")
        }
        Event::SwitchTo { axis, state } => format!("state {axis} {state}"),
        Event::ClearErrors => "clear-errors".to_string(),
        Event::SaveConfiguration => "save".to_string(),
        Event::Reboot => "reboot".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_honours_quotes() {
        assert_eq!(
            tokenize(r#"state 0 "closed loop control""#).unwrap(),
            ["state", "0", "closed loop control"]
        );
        assert_eq!(tokenize(r#"a "" b"#).unwrap(), ["a", "", "b"]);
        assert_eq!(tokenize(r#"a "b"#), Err(ParseError::UnterminatedQuote));
    }
}
