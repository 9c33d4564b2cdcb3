//! Plain-text rendering of job records.

use std::fmt::Write;

use mmswap::JobRecord;

/// Palette followed by one numbered line per swap.
pub fn checklist(job: &JobRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", job.display_title());
    let _ = writeln!(out);

    let _ = writeln!(out, "Filaments:");
    for f in &job.palette {
        let _ = writeln!(out, "  [Slot {}] {} {}", f.slot_index + 1, f.color, f.display_name);
    }
    let _ = writeln!(out);

    if job.events.is_empty() {
        let _ = writeln!(out, "No filament swaps.");
        return out;
    }

    let _ = writeln!(out, "Swaps:");
    for (i, e) in job.events.iter().enumerate() {
        let mark = if e.completed { "x" } else { " " };
        let layer = e
            .layer_number
            .map(|l| format!("layer {l}"))
            .unwrap_or_else(|| "layer ?".into());
        let _ = writeln!(
            out,
            "  [{mark}] #{:<3} Z={:>7.2}  {:<10} ({:>5.1}%)  {}  [{}]  {}",
            i + 1,
            e.z_height,
            layer,
            e.progress_fraction,
            e.label,
            e.detail,
            e.color
        );
    }
    out
}

/// One-line counts.
pub fn summary(job: &JobRecord) -> String {
    format!(
        "{}: {} swaps, {} distinct filaments, {} configured\n",
        job.source_name,
        job.summary.swap_count,
        job.summary.distinct_slots_used,
        job.palette.len()
    )
}
