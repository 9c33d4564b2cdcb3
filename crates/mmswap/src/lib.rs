#![warn(missing_docs)]

//! Filament-swap extraction for manual multi-material prints.
//!
//! Given a sliced print file (plain G-code or a `.3mf` package with G-code
//! inside) this crate lists every filament change the operator has to do by
//! hand, with the Z height, layer and file position of each one.
//!
//! # Example
//!
//! ```no_run
//! let bytes = std::fs::read("benchy.gcode.3mf")?;
//! let job = mmswap::extract("benchy.gcode.3mf", &bytes)?;
//!
//! for event in &job.events {
//!     println!("Z={:.2} {} ({})", event.z_height, event.label, event.detail);
//! }
//! println!("{} swaps, {} filaments", job.summary.swap_count, job.summary.distinct_slots_used);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod archive;
pub mod error;
mod header;
pub mod job;
mod scan;
pub mod settings;

pub use error::{ErrorKind, ExtractError, Result};
pub use job::{Filament, JobRecord, JobSummary, SwapEvent, TaskKind};
pub use settings::ExtractSettings;

use archive::resolve_document;
use header::{build_palette, scan_header};
use scan::BodyScanner;

/// Extract the swap list from a print file with default settings.
pub fn extract(file_name: &str, bytes: &[u8]) -> Result<JobRecord> {
    extract_with(file_name, bytes, &ExtractSettings::default())
}

/// Extract the swap list from a print file.
///
/// Fails only if the document cannot be found or decoded.
pub fn extract_with(file_name: &str, bytes: &[u8], settings: &ExtractSettings) -> Result<JobRecord> {
    settings.validate()?;
    let text = resolve_document(file_name, bytes, settings)?;
    Ok(extract_text(file_name, &text, settings))
}

/// Build a job record from already-decoded tool-path text.
fn extract_text(file_name: &str, text: &str, settings: &ExtractSettings) -> JobRecord {
    let lines: Vec<&str> = text.split('\n').collect();

    let meta = scan_header(lines.iter().copied(), settings);
    let palette = build_palette(&meta, settings);
    tracing::debug!(
        file = file_name,
        lines = lines.len(),
        filaments = palette.len(),
        "header scanned"
    );

    let events = BodyScanner::new(&palette, settings, lines.len()).scan(lines.iter().copied());
    let job = JobRecord::new(file_name, palette, events);
    tracing::debug!(
        swaps = job.summary.swap_count,
        slots = job.summary.distinct_slots_used,
        "body scanned"
    );
    job
}
