//! Input events and event scripts.
//!
//! Widgets (sliders, number fields, buttons) are reduced to discrete
//! [`EditorEvent`]s carrying a parameter and a raw value; the session's
//! [`dispatch`](crate::session::Session::dispatch) is the only consumer.
//!
//! Event scripts are the text form used by `avnac run`: one event per line,
//! blank lines and `#` comments ignored.
//!
//! ```text
//! # warm portrait, half size
//! set warm 35
//! set contrast 10
//! width 400
//! height 300
//! apply
//! export
//! ```

use crate::imaging::{Adjustment, Axis, UnknownAdjustment};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One user action.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Upload raw image bytes.
    Load(Vec<u8>),
    /// Slider moved.
    SetAdjustment { kind: Adjustment, value: f64 },
    /// Resize field edited; `raw` is the field text as typed.
    SetOutputSize { axis: Axis, raw: String },
    /// Resize apply button.
    ApplyResize,
    Reset,
    TogglePanel,
    Export,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventParseError {
    #[error("empty event")]
    Empty,
    #[error("unknown event '{0}'")]
    UnknownEvent(String),
    #[error("'{event}' expects {expected}")]
    MissingArgument {
        event: String,
        expected: &'static str,
    },
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error(transparent)]
    UnknownAdjustment(#[from] UnknownAdjustment),
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<EventParseError>,
    },
}

impl FromStr for EditorEvent {
    type Err = EventParseError;

    /// Parse the script form of an event. `Load` has no text form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let head = words.next().ok_or(EventParseError::Empty)?;
        let event = match head.to_ascii_lowercase().as_str() {
            "set" => {
                let name = words.next().ok_or(EventParseError::MissingArgument {
                    event: head.to_string(),
                    expected: "an adjustment name and a value",
                })?;
                let kind: Adjustment = name.parse()?;
                let raw = words.next().ok_or(EventParseError::MissingArgument {
                    event: head.to_string(),
                    expected: "a value",
                })?;
                let value = raw
                    .parse::<f64>()
                    .map_err(|_| EventParseError::NotANumber(raw.to_string()))?;
                EditorEvent::SetAdjustment { kind, value }
            }
            "width" | "height" => {
                let axis = if head.eq_ignore_ascii_case("width") {
                    Axis::Width
                } else {
                    Axis::Height
                };
                // Field text is kept verbatim; normalization happens in the session.
                let raw = words.collect::<Vec<_>>().join(" ");
                EditorEvent::SetOutputSize { axis, raw }
            }
            "apply" | "apply-resize" => EditorEvent::ApplyResize,
            "reset" => EditorEvent::Reset,
            "toggle-panel" | "e" => EditorEvent::TogglePanel,
            "export" | "download" => EditorEvent::Export,
            _ => return Err(EventParseError::UnknownEvent(head.to_string())),
        };
        Ok(event)
    }
}

impl fmt::Display for EditorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorEvent::Load(bytes) => write!(f, "load ({} bytes)", bytes.len()),
            EditorEvent::SetAdjustment { kind, value } => write!(f, "set {kind} {value}"),
            EditorEvent::SetOutputSize { axis, raw } => write!(f, "{axis} {raw}"),
            EditorEvent::ApplyResize => f.write_str("apply"),
            EditorEvent::Reset => f.write_str("reset"),
            EditorEvent::TogglePanel => f.write_str("toggle-panel"),
            EditorEvent::Export => f.write_str("export"),
        }
    }
}

/// Parse a whole script, reporting the first bad line by number (1-based).
pub fn parse_script(script: &str) -> Result<Vec<EditorEvent>, EventParseError> {
    script
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let line = line.split('#').next().unwrap_or("").trim();
            (!line.is_empty()).then_some((i + 1, line))
        })
        .map(|(line_no, line)| {
            line.parse().map_err(|e| EventParseError::AtLine {
                line: line_no,
                source: Box::new(e),
            })
        })
        .collect()
}
