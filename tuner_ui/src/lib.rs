#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Terminal interaction surface: command parsing in, panels or JSON out.

pub mod input;
pub mod json;
pub mod render;

pub use input::{Command, ParseError, command_for, parse_line};
pub use render::render_text;
