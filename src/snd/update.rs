//! Format-preserving coordinate update
//!
//! Scans an existing .snd document textually, never rebuilding lines it
//! does not intend to change, and re-associates each `VEH_XYZ` record
//! with the command that governs its block. Commands found in the
//! geometry's command map produce a selectable `ChangeRecord` whenever the
//! old and new coordinates differ beyond the per-axis tolerance; applying
//! a selection rewrites only those exact lines and leaves every other byte
//! of the original untouched.
//!
//! The identify/apply split is deliberate: a caller can present every
//! proposed change for inspection and toggling before any mutation, and
//! the original buffer is never altered until the caller commits.

use anyhow::{bail, Result};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::constants::snd as kw;
use crate::constants::update::XYZ_TOLERANCE;
use crate::obj::Xyz;
use crate::snd::keyword_arg;

/// Trigger keywords that carry a single command token. These are the join
/// points between a block's pending VEH_XYZ line and the command map.
const COMMAND_KEYWORDS: [&str; 6] = [
    kw::EVENT_CMND_HOLD_CUE,
    kw::EVENT_CMND_HOLD_STOP,
    kw::EVENT_CMND_CUE,
    kw::EVENT_CMND_UP,
    kw::EVENT_CMND_DOWN,
    kw::EVENT_CMND_ONCE,
];

/// One proposed coordinate rewrite
#[derive(Debug, Clone, Serialize)]
pub struct ChangeRecord {
    /// Command whose geometry position moved
    pub command: String,
    /// Owning event name, for display only
    pub event_name: String,
    /// Zero-based index into the document's lines
    pub line_index: usize,
    /// Verbatim original line; its leading whitespace survives the rewrite
    pub old_line: String,
    pub old_xyz: Xyz,
    pub new_xyz: Xyz,
    /// Selected changes are applied; callers may toggle before applying
    pub selected: bool,
}

/// Outcome of one identify pass
#[derive(Debug, Default, Serialize)]
pub struct UpdateReport {
    pub changes: Vec<ChangeRecord>,
    /// Attachment blocks seen
    pub total_entries: usize,
    /// Command lines whose command was found in the map (with a pending
    /// position line); counted at most once per block
    pub matched: usize,
    /// Commands not present in the map, first-appearance order, deduplicated
    pub unmatched_commands: Vec<String>,
}

/// Scan state carried across the line loop; reset at every begin marker
#[derive(Debug)]
struct ScanState {
    event_name: String,
    pending_xyz_line: Option<usize>,
}

impl ScanState {
    fn reset(&mut self) {
        self.event_name = "Unknown Event".to_string();
        self.pending_xyz_line = None;
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self {
            event_name: "Unknown Event".to_string(),
            pending_xyz_line: None,
        }
    }
}

/// Single forward scan over the document, associating each pending
/// `VEH_XYZ` line with the next command-bearing trigger line in its block
/// and comparing the recorded coordinates against the geometry's.
pub fn identify_changes(snd: &str, command_map: &HashMap<String, Xyz>) -> Result<UpdateReport> {
    if snd.trim().is_empty() {
        bail!("no existing document supplied: .snd buffer is empty");
    }

    // split('\n') rather than lines(): apply_changes indexes the same way,
    // and the join must reproduce the document byte-for-byte
    let lines: Vec<&str> = snd.split('\n').collect();

    let mut report = UpdateReport::default();
    let mut state = ScanState::default();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();

        if line == kw::BEGIN_MARKER {
            report.total_entries += 1;
            state.reset();
            continue;
        }

        if let Some(name) = keyword_arg(line, kw::EVENT_NAME) {
            state.event_name = name.to_string();
            continue;
        }

        // Not yet actionable: the command that governs this position
        // appears later in the block
        if line.starts_with(kw::VEH_XYZ) {
            state.pending_xyz_line = Some(i);
            continue;
        }

        let Some(command) = command_token(line) else {
            continue;
        };
        let Some(pending) = state.pending_xyz_line.take() else {
            // Many valid entries carry no position at all (VEH_PART);
            // nothing to rewrite
            continue;
        };

        match command_map.get(command) {
            Some(&new_xyz) => {
                report.matched += 1;
                let old_line = lines[pending];
                let old_xyz = parse_xyz_line(old_line);

                if differs_beyond_tolerance(old_xyz, new_xyz) {
                    report.changes.push(ChangeRecord {
                        command: command.to_string(),
                        event_name: state.event_name.clone(),
                        line_index: pending,
                        old_line: old_line.to_string(),
                        old_xyz,
                        new_xyz,
                        selected: true,
                    });
                } else {
                    debug!(command, "position unchanged within tolerance");
                }
            }
            None => {
                if !report.unmatched_commands.iter().any(|c| c == command) {
                    report.unmatched_commands.push(command.to_string());
                }
            }
        }
    }

    info!(
        total_entries = report.total_entries,
        matched = report.matched,
        changes = report.changes.len(),
        unmatched = report.unmatched_commands.len(),
        "identified coordinate changes"
    );
    Ok(report)
}

/// Rewrite only the selected records' lines, reusing each original line's
/// leading whitespace so indentation style round-trips byte-for-byte.
/// Everything else passes through verbatim in original order.
pub fn apply_changes(snd: &str, changes: &[ChangeRecord]) -> String {
    let mut lines: Vec<String> = snd.split('\n').map(String::from).collect();
    let mut applied = 0usize;

    for change in changes.iter().filter(|c| c.selected) {
        if change.line_index >= lines.len() {
            debug!(line_index = change.line_index, "stale change record, skipping");
            continue;
        }
        let indent_len = change.old_line.len() - change.old_line.trim_start().len();
        let indent = &change.old_line[..indent_len];
        let [x, y, z] = change.new_xyz;
        lines[change.line_index] = format!("{indent}{} {x:.3} {y:.3} {z:.3}", kw::VEH_XYZ);
        applied += 1;
    }

    if applied > 0 {
        info!(applied, "applied coordinate rewrites");
    }
    lines.join("\n")
}

/// Extract the command token from a command-bearing trigger line
fn command_token(line: &str) -> Option<&str> {
    COMMAND_KEYWORDS
        .iter()
        .find_map(|keyword| keyword_arg(line, keyword))
        .filter(|command| !command.is_empty())
}

/// Re-parse the coordinate triple out of a literal VEH_XYZ line.
/// Unparseable fields become NaN, which never exceeds the tolerance, so a
/// mangled record is matched but never proposed for rewrite.
fn parse_xyz_line(line: &str) -> Xyz {
    let mut xyz = [f64::NAN; 3];
    let trimmed = line.trim();
    let rest = trimmed.strip_prefix(kw::VEH_XYZ).unwrap_or(trimmed);
    for (slot, token) in xyz.iter_mut().zip(rest.split_whitespace().take(3)) {
        *slot = token.parse().unwrap_or(f64::NAN);
    }
    xyz
}

fn differs_beyond_tolerance(old: Xyz, new: Xyz) -> bool {
    old.iter()
        .zip(new.iter())
        .any(|(a, b)| (a - b).abs() > XYZ_TOLERANCE)
}
