//! Plain-text layout: two axis columns side by side, sidebar underneath.

use crate::input::command_for;
use std::fmt::Write as _;
use tuner_core::view::{Action, AxisPanel, Selector, Sidebar, View};

const GUTTER: usize = 4;

fn action_line(action: &Action) -> String {
    format!("[ {} ]  ({})", action.label, command_for(&action.event))
}

fn selector_lines(sel: &Selector, out: &mut Vec<String>) {
    out.push(format!("{}: {}", sel.label, sel.selected_label));
    let options: Vec<String> = sel
        .options
        .iter()
        .enumerate()
        .map(|(i, o)| {
            if sel.selected == Some(i) {
                format!("*{i} {o}")
            } else {
                format!(" {i} {o}")
            }
        })
        .collect();
    for chunk in options.chunks(2) {
        out.push(format!("  {}", chunk.join("  ")));
    }
}

fn panel_lines(panel: &AxisPanel) -> Vec<String> {
    let mut out = vec![format!("== {} ==", panel.header)];
    if let Some(err) = &panel.error {
        out.push(format!("Error: {err}"));
    }

    out.push("-- Settings --".to_string());
    for w in &panel.settings {
        out.push(format!("{}: {:?}", w.label, w.value));
    }

    out.push("-- Test --".to_string());
    selector_lines(&panel.mode, &mut out);
    if let Some(v) = &panel.velocity {
        out.push(format!("input_vel: {:?}", v.input_vel));
        out.push(format!("{}: {:?}", v.magnitude.label, v.magnitude.value));
        out.extend(v.actions.iter().map(action_line));
    }
    selector_lines(&panel.state, &mut out);
    out.extend(panel.shortcuts.iter().map(action_line));
    out
}

fn sidebar_lines(sidebar: &Sidebar) -> Vec<String> {
    let mut out = vec![
        format!("== {} ==", sidebar.header),
        format!("Serial number: {}", sidebar.serial_number),
        format!("Hardware version: {}", sidebar.hardware_version),
        format!("Firmware version: {}", sidebar.firmware_version),
        format!("Voltage: {:?}", sidebar.voltage),
    ];
    out.extend(sidebar.actions.iter().map(action_line));
    out
}

/// Lay out `columns` side by side, padding each to its widest line.
fn side_by_side(columns: &[Vec<String>]) -> Vec<String> {
    let widths: Vec<usize> = columns
        .iter()
        .map(|c| c.iter().map(|l| l.chars().count()).max().unwrap_or(0))
        .collect();
    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
    (0..rows)
        .map(|r| {
            let mut line = String::new();
            for (i, col) in columns.iter().enumerate() {
                let cell = col.get(r).map(String::as_str).unwrap_or("");
                if i + 1 == columns.len() {
                    line.push_str(cell);
                } else {
                    let pad = widths[i] + GUTTER - cell.chars().count();
                    let _ = write!(line, "{cell}{}", " ".repeat(pad));
                }
            }
            line.trim_end().to_string()
        })
        .collect()
}

/// Render a full dashboard frame as text.
pub fn render_text(view: &View) -> String {
    let mut out = String::new();
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "* {notice}");
    }
    let columns: Vec<Vec<String>> = view.axes.iter().map(panel_lines).collect();
    for line in side_by_side(&columns) {
        let _ = writeln!(out, "{line}");
    }
    out.push('\n');
    for line in sidebar_lines(&view.sidebar) {
        let _ = writeln!(out, "{line}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_padded_to_widest_line() {
        let cols = vec![
            vec!["ab".to_string(), "abcdef".to_string()],
            vec!["x".to_string()],
        ];
        assert_eq!(side_by_side(&cols), ["ab        x", "abcdef"]);
    }
}
