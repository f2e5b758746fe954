//! CLI output formatting.
//!
//! Output is **state-centric**: after an edit the user sees what the session
//! holds (source, committed size, slider values, composed pipeline) rather
//! than a log of what happened. Script replays additionally list each event
//! with its positional index and what it changed.
//!
//! # Output Format
//!
//! ## Session summary
//!
//! ```text
//! Source: 800x600 (3f2a9c1e)
//! Output: 400x300
//! Adjustments
//!     brightness: 20
//!     warm: 35
//! Pipeline: brightness(120%) contrast(100%) saturate(100%) hue-rotate(0deg) sepia(35%) invert(0%) blur(0px)
//! ```
//!
//! ## Script replay
//!
//! ```text
//! 001 set warm 35
//!     warm = 35
//! 002 width 0
//!     width field = 1
//! 003 export
//!     Exported: edited-image.png (2048 bytes)
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::events::EditorEvent;
use crate::export::ExportOutcome;
use crate::imaging::{Adjustment, ImageBackend};
use crate::session::{EventOutcome, Session};

/// Length of the source id prefix shown in summaries.
const SHORT_ID_LEN: usize = 8;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Render a slider value without a trailing `.0` for whole numbers.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

// ============================================================================
// Session summary
// ============================================================================

/// Format the current session state.
///
/// Only non-default adjustments are listed; an untouched session says so.
pub fn format_session_summary<B: ImageBackend>(session: &Session<B>) -> Vec<String> {
    let mut lines = Vec::new();

    match session.source() {
        Some(source) => {
            let short_id: String = source.id().chars().take(SHORT_ID_LEN).collect();
            lines.push(format!("Source: {} ({})", source.natural_size(), short_id));
            lines.push(format!("Output: {}", session.output_size()));
            if session.draft_size() != session.output_size() {
                lines.push(format!(
                    "{}Pending resize: {}",
                    indent(1),
                    session.draft_size()
                ));
            }
        }
        None => lines.push("Source: none".to_string()),
    }

    let adjustments = session.adjustments();
    if adjustments.is_default() {
        lines.push("Adjustments: defaults".to_string());
    } else {
        lines.push("Adjustments".to_string());
        for kind in Adjustment::ALL {
            let value = adjustments.get(kind);
            if value != kind.default_value() {
                lines.push(format!("{}{kind}: {}", indent(1), format_value(value)));
            }
        }
    }

    lines.push(format!("Pipeline: {}", session.pipeline()));
    lines
}

/// Print the session summary to stdout.
pub fn print_session_summary<B: ImageBackend>(session: &Session<B>) {
    for line in format_session_summary(session) {
        println!("{}", line);
    }
}

// ============================================================================
// Export
// ============================================================================

pub fn format_export_outcome(outcome: &ExportOutcome) -> String {
    match outcome {
        ExportOutcome::Delivered { path, bytes } => {
            format!("Exported: {} ({} bytes)", path.display(), bytes)
        }
        ExportOutcome::NothingToExport => "Nothing to export: no image loaded".to_string(),
    }
}

// ============================================================================
// Script replay
// ============================================================================

/// Format one replayed event and what it changed.
///
/// ```text
/// 002 height abc
///     height field = 1
/// ```
pub fn format_event_step(index: usize, event: &EditorEvent, outcome: &EventOutcome) -> Vec<String> {
    let detail = match outcome {
        EventOutcome::Loaded(Some(size)) => format!("loaded {size}"),
        EventOutcome::Loaded(None) => "upload had no effect".to_string(),
        EventOutcome::Adjusted(kind, value) => format!("{kind} = {}", format_value(*value)),
        EventOutcome::SizeEdited(axis, value) => format!("{axis} field = {value}"),
        EventOutcome::Resized(size) => format!("output size {size}"),
        EventOutcome::Reset => "adjustments and size restored".to_string(),
        EventOutcome::PanelToggled(true) => "panel shown".to_string(),
        EventOutcome::PanelToggled(false) => "panel hidden".to_string(),
        EventOutcome::Exported(export) => format_export_outcome(export),
    };
    vec![
        format!("{} {}", format_index(index), event),
        format!("{}{}", indent(1), detail),
    ]
}

pub fn print_event_step(index: usize, event: &EditorEvent, outcome: &EventOutcome) {
    for line in format_event_step(index, event, outcome) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
