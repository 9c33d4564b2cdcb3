//! Job record types.
//!
//! A [`JobRecord`] is what the extractor hands to the outside world. The
//! checklist front end only ever flips [`SwapEvent::completed`]; everything
//! else is fixed at extraction time.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One configured material slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filament {
    /// Slot index (0-based position in the header color list).
    pub slot_index: usize,
    /// Display name.
    pub display_name: String,
    /// Color as `#RRGGBB`.
    pub color: String,
}

impl Filament {
    /// Create a filament entry.
    pub fn new(slot_index: usize, display_name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            slot_index,
            display_name: display_name.into(),
            color: color.into(),
        }
    }
}

/// Kind of checklist task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Load the starting material. Reserved; the extractor never emits it.
    Start,
    /// Swap to another filament.
    #[default]
    Swap,
}

/// One filament change the operator has to perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapEvent {
    /// Unique id built from the source line and the target slot.
    pub identifier: String,
    /// Task kind.
    pub kind: TaskKind,
    /// Slot to switch to.
    pub target_slot: usize,
    /// Title, e.g. `➔ PLA Basic`.
    pub label: String,
    /// Subtitle, e.g. `Slot 2`.
    pub detail: String,
    /// Color of the target filament.
    pub color: String,
    /// Z height (mm) at the swap.
    pub z_height: f64,
    /// Layer number at the swap, if any was seen.
    pub layer_number: Option<i64>,
    /// Position in the file, 0-100 with one decimal.
    pub progress_fraction: f64,
    /// Checked off by the operator.
    pub completed: bool,
}

/// Counts derived from the event list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobSummary {
    /// Number of swap events.
    pub swap_count: usize,
    /// Number of distinct slots swapped to.
    pub distinct_slots_used: usize,
}

impl JobSummary {
    /// Compute the summary for an event list.
    pub fn from_events(events: &[SwapEvent]) -> Self {
        let slots: HashSet<usize> = events.iter().map(|e| e.target_slot).collect();
        Self {
            swap_count: events.len(),
            distinct_slots_used: slots.len(),
        }
    }
}

/// Output of one extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// File name as supplied by the caller.
    pub source_name: String,
    /// Every configured filament, used or not.
    pub palette: Vec<Filament>,
    /// Swaps in document order.
    pub events: Vec<SwapEvent>,
    /// Summary counts.
    pub summary: JobSummary,
}

impl JobRecord {
    /// Assemble a record, deriving the summary from `events`.
    pub fn new(source_name: impl Into<String>, palette: Vec<Filament>, events: Vec<SwapEvent>) -> Self {
        let summary = JobSummary::from_events(&events);
        Self {
            source_name: source_name.into(),
            palette,
            events,
            summary,
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Source name without its print-file extension.
    pub fn display_title(&self) -> &str {
        let name = self.source_name.as_str();
        for suffix in [".gcode.3mf", ".gcode", ".3mf"] {
            if name.len() >= suffix.len() {
                let split = name.len() - suffix.len();
                if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(suffix) {
                    return &name[..split];
                }
            }
        }
        name
    }

    /// Flip the completed flag of the event with `identifier`.
    ///
    /// Returns `false` if no such event exists.
    pub fn toggle_completed(&mut self, identifier: &str) -> bool {
        match self.events.iter_mut().find(|e| e.identifier == identifier) {
            Some(event) => {
                event.completed = !event.completed;
                true
            }
            None => false,
        }
    }

    /// Clear every completed flag.
    pub fn reset_progress(&mut self) {
        for event in &mut self.events {
            event.completed = false;
        }
    }

    /// Number of events checked off.
    pub fn completed_count(&self) -> usize {
        self.events.iter().filter(|e| e.completed).count()
    }

    /// Share of events checked off, 0-100.
    pub fn completion_percent(&self) -> f64 {
        if self.events.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.events.len() as f64 * 100.0
    }
}
