//! Body scan: the per-line state machine that finds filament swaps.
//!
//! Every line goes through [`BodyScanner::step`], which takes the running
//! [`ScanState`] by value and returns the next state plus at most one event.
//! Nothing is kept outside that accumulator.

use crate::job::{Filament, SwapEvent, TaskKind};
use crate::settings::ExtractSettings;

/// Layer comment markers (Bambu/Orca and Prusa spellings).
pub const LAYER_MARKERS: [&str; 2] = ["; LAYER", "; layer"];
/// Explicit Z height comment.
pub const Z_MARKER: &str = "; Z:";
/// Motion command whose `Z` parameter is tracked.
pub const MOTION_COMMAND: &str = "G1";

/// Running state threaded through the scan.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScanState {
    /// Last seen Z (mm).
    pub z_height: f64,
    /// Last seen layer number.
    pub layer: i64,
    /// Last selected tool, `None` until the first `T` command.
    pub last_slot: Option<usize>,
}

/// Leading integer of `token`, with an optional sign: `"4/80"` reads as 4.
fn leading_int(token: &str) -> Option<i64> {
    let unsigned = token.trim_start_matches(['+', '-']);
    let sign_len = token.len() - unsigned.len();
    if sign_len > 1 {
        return None;
    }
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    token[..sign_len + digits].parse().ok()
}

/// Layer number from a layer comment, if the line is one and its last word
/// starts with an integer.
pub fn parse_layer(line: &str) -> Option<i64> {
    if !LAYER_MARKERS.iter().any(|m| line.starts_with(m)) {
        return None;
    }
    leading_int(line.split_whitespace().last()?)
}

/// Z height from a `; Z:` comment or a motion command, if present and valid.
///
/// The comment form wins; a motion line is only consulted when the line is
/// not a Z comment. With several `Z` words the last valid one is used.
pub fn parse_height(line: &str) -> Option<f64> {
    if let Some(rest) = line.strip_prefix(Z_MARKER) {
        let value = rest.split(':').next().unwrap_or("");
        return value.trim().parse().ok();
    }

    let code = line.split(';').next().unwrap_or("");
    let mut words = code.split_whitespace();
    if words.next() != Some(MOTION_COMMAND) {
        return None;
    }
    words
        .filter_map(|w| w.strip_prefix('Z'))
        .filter_map(|v| v.parse::<f64>().ok())
        .last()
}

/// Slot index from a bare tool-select command such as `T2`.
///
/// Only `T` followed by digits and nothing else counts; `T0 ; comment` and
/// `T1 L2` are not tool selections.
pub fn parse_tool_select(line: &str) -> Option<usize> {
    let digits = line.strip_prefix('T')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Round to one decimal place.
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Turns tool selections into [`SwapEvent`]s against a fixed palette.
#[derive(Debug, Clone, Copy)]
pub struct BodyScanner<'a> {
    palette: &'a [Filament],
    settings: &'a ExtractSettings,
    total_lines: usize,
}

impl<'a> BodyScanner<'a> {
    /// Create a scanner for a document of `total_lines` lines.
    pub fn new(palette: &'a [Filament], settings: &'a ExtractSettings, total_lines: usize) -> Self {
        Self {
            palette,
            settings,
            total_lines,
        }
    }

    /// Process one line at `index`.
    pub fn step(&self, mut state: ScanState, index: usize, raw: &str) -> (ScanState, Option<SwapEvent>) {
        let line = raw.trim();

        if let Some(layer) = parse_layer(line) {
            state.layer = layer;
        }
        if let Some(z) = parse_height(line) {
            state.z_height = z;
        }

        let Some(slot) = parse_tool_select(line) else {
            return (state, None);
        };

        let previous = state.last_slot.replace(slot);
        match previous {
            // First selection loads the starting material.
            None => (state, None),
            Some(prev) if prev == slot => (state, None),
            Some(_) => {
                let event = self.swap_event(&state, index, slot);
                (state, Some(event))
            }
        }
    }

    fn swap_event(&self, state: &ScanState, index: usize, slot: usize) -> SwapEvent {
        let (name, color) = match self.palette.iter().find(|f| f.slot_index == slot) {
            Some(f) => (f.display_name.clone(), f.color.clone()),
            None => (
                format!("Generic {slot}"),
                self.settings.unknown_slot_color.clone(),
            ),
        };
        let progress = if self.total_lines == 0 {
            0.0
        } else {
            round_tenth(index as f64 / self.total_lines as f64 * 100.0)
        };

        SwapEvent {
            identifier: format!("measured_{index}_{slot}"),
            kind: TaskKind::Swap,
            target_slot: slot,
            label: format!("➔ {name}"),
            detail: format!("Slot {}", slot + 1),
            color,
            z_height: state.z_height,
            layer_number: Some(state.layer),
            progress_fraction: progress,
            completed: false,
        }
    }

    /// Run the scan over every line, collecting swaps in order.
    pub fn scan<'l, I>(&self, lines: I) -> Vec<SwapEvent>
    where
        I: IntoIterator<Item = &'l str>,
    {
        let mut state = ScanState::default();
        let mut events = Vec::new();
        for (index, line) in lines.into_iter().enumerate() {
            let (next, event) = self.step(state, index, line);
            state = next;
            if let Some(event) = event {
                tracing::trace!(
                    line = index,
                    slot = event.target_slot,
                    z = event.z_height,
                    "swap"
                );
                events.push(event);
            }
        }
        events
    }
}
