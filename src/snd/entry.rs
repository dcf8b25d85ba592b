//! Sound attachment entry model
//!
//! One `SoundEntry` is the structured, mutable form of a single
//! `BEGIN_SOUND_ATTACHMENT` block. Entries are produced either by the
//! generator (from cockpit manipulators or the canned library) or by
//! parsing an existing document for review; the review surface edits
//! fields in place and soft-deletes via the tombstone flag, so entries are
//! never physically removed and indices stay stable.

use serde::{Deserialize, Serialize};

use crate::constants::snd as kw;
use crate::obj::Xyz;
use crate::snd::keyword_arg;

/// Trigger category for one attachment entry.
///
/// Exactly one is active per entry; payload fields for the other kinds are
/// retained on the entry (not cleared), so switching kind and back loses
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerKind {
    /// Dataref start/end condition pair
    StartCond,
    /// Command press
    CmndDown,
    /// Command release
    CmndUp,
    /// Command held, sound stops on release
    CmndHoldStop,
    /// Command held, release cue fires the tail
    CmndHoldCue,
    /// Cue fired by a dataref condition
    CueTriggerCond,
}

impl TriggerKind {
    /// Keyword emitted for the command-bearing kinds; `None` for the two
    /// condition kinds, which carry no single command string.
    pub fn command_keyword(self) -> Option<&'static str> {
        match self {
            TriggerKind::CmndDown => Some(kw::EVENT_CMND_DOWN),
            TriggerKind::CmndUp => Some(kw::EVENT_CMND_UP),
            TriggerKind::CmndHoldStop => Some(kw::EVENT_CMND_HOLD_STOP),
            TriggerKind::CmndHoldCue => Some(kw::EVENT_CMND_HOLD_CUE),
            TriggerKind::StartCond | TriggerKind::CueTriggerCond => None,
        }
    }
}

/// Where the sound is anchored: a point in aircraft coordinates or a named
/// airframe part. Exactly one of the two forms per entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    Xyz(Xyz),
    Part(String),
}

/// Hands out entry ids for one parse or generation session. Caller-owned
/// so concurrent sessions never share a counter.
#[derive(Debug, Default)]
pub struct EntryIdAllocator {
    next: u32,
}

impl EntryIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> String {
        self.next += 1;
        format!("entry_{}", self.next)
    }
}

/// One configuration record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundEntry {
    pub id: String,
    /// FMOD event path, e.g. `/aircraft/generic/switch`
    pub event_name: String,
    /// Active trigger kind; selects which payload fields serialize
    pub trigger: TriggerKind,

    // Trigger payloads. Only the fields matching `trigger` are emitted;
    // the rest are retained untouched.
    pub start_cond: String,
    pub end_cond: String,
    pub command: String,
    pub cue_trigger: String,

    /// Optional auto-end condition, emitted for any trigger kind
    pub auto_end_cond: String,
    pub placement: Placement,
    pub polyphonic: bool,
    pub allowed_for_ai: bool,
    pub param_dref_idx: Option<i32>,
    /// Free-text comment emitted on its own `#` line before the block
    pub comment: String,
    /// Tombstone: excluded from serialization, kept in the collection
    pub deleted: bool,
    /// Review bookkeeping flag
    pub completed: bool,
    /// True for canned library entries, false for manipulator-derived or
    /// parsed entries
    pub is_template: bool,
}

impl SoundEntry {
    pub fn new(id: String) -> Self {
        Self {
            id,
            event_name: "/aircraft/sound".to_string(),
            trigger: TriggerKind::StartCond,
            start_cond: String::new(),
            end_cond: String::new(),
            command: String::new(),
            cue_trigger: String::new(),
            auto_end_cond: String::new(),
            placement: Placement::Xyz([0.0, 0.0, 0.0]),
            polyphonic: false,
            allowed_for_ai: false,
            param_dref_idx: None,
            comment: String::new(),
            deleted: false,
            completed: false,
            is_template: false,
        }
    }

    pub fn delete(&mut self) {
        self.deleted = true;
    }

    pub fn restore(&mut self) {
        self.deleted = false;
    }

    /// Canonical serialization of this entry. Deleted entries serialize to
    /// the empty string (omission, not an error).
    ///
    /// Record order is fixed: comment, begin marker, event name, placement,
    /// flags, parameter index, trigger lines, auto-end, end marker, blank
    /// separator. Coordinates always render with exactly three decimals;
    /// the updater re-parses these strings, so the width is load-bearing.
    pub fn to_snd(&self) -> String {
        if self.deleted {
            return String::new();
        }

        let mut out = String::new();

        if !self.comment.is_empty() {
            out.push_str(&format!("# {}\n", self.comment));
        }

        out.push_str(kw::BEGIN_MARKER);
        out.push('\n');
        out.push_str(&format!("\t{} {}\n", kw::EVENT_NAME, self.event_name));

        match &self.placement {
            Placement::Part(part) => {
                out.push_str(&format!("\t{} {}\n", kw::VEH_PART, part));
            }
            Placement::Xyz([x, y, z]) => {
                out.push_str(&format!("\t{} {x:.3} {y:.3} {z:.3}\n", kw::VEH_XYZ));
            }
        }

        if self.polyphonic {
            out.push_str(&format!("\t{}\n", kw::EVENT_POLYPHONIC));
        }
        if self.allowed_for_ai {
            out.push_str(&format!("\t{}\n", kw::EVENT_ALLOWED_FOR_AI));
        }
        if let Some(idx) = self.param_dref_idx {
            out.push_str(&format!("\t{} {idx}\n", kw::PARAM_DREF_IDX));
        }

        match self.trigger {
            TriggerKind::StartCond => {
                if !self.start_cond.is_empty() {
                    out.push_str(&format!("\t{} {}\n", kw::EVENT_START_COND, self.start_cond));
                }
                if !self.end_cond.is_empty() {
                    out.push_str(&format!("\t{} {}\n", kw::EVENT_END_COND, self.end_cond));
                }
            }
            TriggerKind::CueTriggerCond => {
                if !self.cue_trigger.is_empty() {
                    out.push_str(&format!("\t{} {}\n", kw::CUE_TRIGGER_COND, self.cue_trigger));
                }
            }
            kind => {
                // The four command kinds share one emission shape
                if let Some(keyword) = kind.command_keyword() {
                    if !self.command.is_empty() {
                        out.push_str(&format!("\t{} {}\n", keyword, self.command));
                    }
                }
            }
        }

        if !self.auto_end_cond.is_empty() {
            out.push_str(&format!("\t{} {}\n", kw::EVENT_AUTO_END, self.auto_end_cond));
        }

        out.push_str(kw::END_MARKER);
        out.push_str("\n\n");
        out
    }
}

/// Parse an existing document into entries for the review surface.
///
/// Best-effort: unrecognized lines inside a block are skipped, text
/// outside any block is ignored, and a `#` comment line immediately
/// preceding a begin marker becomes the entry's comment. Separator lines
/// made only of `#` characters are not comments.
pub fn parse_entries(content: &str, ids: &mut EntryIdAllocator) -> Vec<SoundEntry> {
    let mut entries = Vec::new();
    let mut current: Option<SoundEntry> = None;
    let mut pending_comment = String::new();

    for raw in content.lines() {
        let line = raw.trim();

        if current.is_none() {
            if line == kw::BEGIN_MARKER {
                let mut entry = SoundEntry::new(ids.next_id());
                entry.comment = std::mem::take(&mut pending_comment);
                current = Some(entry);
            } else if let Some(text) = line.strip_prefix('#') {
                let text = text.trim_start_matches('#').trim();
                if !text.is_empty() {
                    pending_comment = text.to_string();
                }
            }
            continue;
        }

        if line == kw::END_MARKER {
            entries.extend(current.take());
            continue;
        }

        let Some(entry) = current.as_mut() else {
            continue;
        };

        if let Some(name) = keyword_arg(line, kw::EVENT_NAME) {
            entry.event_name = name.to_string();
        } else if line.starts_with(kw::VEH_XYZ) {
            entry.placement = Placement::Xyz(parse_xyz_tokens(line));
        } else if let Some(part) = keyword_arg(line, kw::VEH_PART) {
            entry.placement = Placement::Part(part.to_string());
        } else if let Some(cond) = keyword_arg(line, kw::EVENT_START_COND) {
            entry.start_cond = cond.to_string();
            entry.trigger = TriggerKind::StartCond;
        } else if let Some(cond) = keyword_arg(line, kw::EVENT_END_COND) {
            entry.end_cond = cond.to_string();
        } else if let Some(cmd) = keyword_arg(line, kw::EVENT_CMND_DOWN) {
            entry.command = cmd.to_string();
            entry.trigger = TriggerKind::CmndDown;
        } else if let Some(cmd) = keyword_arg(line, kw::EVENT_CMND_UP) {
            entry.command = cmd.to_string();
            entry.trigger = TriggerKind::CmndUp;
        } else if let Some(cmd) = keyword_arg(line, kw::EVENT_CMND_HOLD_STOP) {
            entry.command = cmd.to_string();
            entry.trigger = TriggerKind::CmndHoldStop;
        } else if let Some(cmd) = keyword_arg(line, kw::EVENT_CMND_HOLD_CUE) {
            entry.command = cmd.to_string();
            entry.trigger = TriggerKind::CmndHoldCue;
        } else if let Some(cond) = keyword_arg(line, kw::CUE_TRIGGER_COND) {
            entry.cue_trigger = cond.to_string();
            entry.trigger = TriggerKind::CueTriggerCond;
        } else if let Some(cond) = keyword_arg(line, kw::EVENT_AUTO_END) {
            entry.auto_end_cond = cond.to_string();
        } else if line == kw::EVENT_POLYPHONIC {
            entry.polyphonic = true;
        } else if line == kw::EVENT_ALLOWED_FOR_AI {
            entry.allowed_for_ai = true;
        } else if let Some(idx) = keyword_arg(line, kw::PARAM_DREF_IDX) {
            entry.param_dref_idx = idx.split_whitespace().next().and_then(|t| t.parse().ok());
        }
    }

    entries
}

/// Re-emit a full document: header text followed by every live entry.
/// Deleted entries contribute nothing but keep their slot in `entries`.
pub fn render_document(header: &str, entries: &[SoundEntry]) -> String {
    let mut out = String::from(header);
    for entry in entries {
        out.push_str(&entry.to_snd());
    }
    out
}

fn parse_xyz_tokens(line: &str) -> Xyz {
    let mut xyz = [0.0; 3];
    for (slot, token) in xyz
        .iter_mut()
        .zip(line.split_whitespace().skip(1).take(3))
    {
        *slot = token.parse().unwrap_or(0.0);
    }
    xyz
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with_command(kind: TriggerKind) -> SoundEntry {
        let mut entry = SoundEntry::new("entry_1".to_string());
        entry.event_name = "/aircraft/generic/switch".to_string();
        entry.placement = Placement::Xyz([1.5, -2.25, 3.0]);
        entry.trigger = kind;
        entry.command = "sim/cockpit/battery_toggle".to_string();
        entry
    }

    #[test]
    fn test_to_snd_full_shape() {
        let mut entry = entry_with_command(TriggerKind::CmndHoldCue);
        entry.comment = "Battery switch".to_string();
        entry.polyphonic = true;
        entry.allowed_for_ai = true;
        entry.param_dref_idx = Some(2);
        entry.auto_end_cond = "sim/cockpit/electrical/battery_on == 0".to_string();

        let expected = "# Battery switch\n\
                        BEGIN_SOUND_ATTACHMENT\n\
                        \tEVENT_NAME /aircraft/generic/switch\n\
                        \tVEH_XYZ 1.500 -2.250 3.000\n\
                        \tEVENT_POLYPHONIC\n\
                        \tEVENT_ALLOWED_FOR_AI\n\
                        \tPARAM_DREF_IDX 2\n\
                        \tEVENT_CMND_HOLD_CUE sim/cockpit/battery_toggle\n\
                        \tEVENT_AUTO_END_FROM_START_COND sim/cockpit/electrical/battery_on == 0\n\
                        END_SOUND_ATTACHMENT\n\n";
        assert_eq!(entry.to_snd(), expected);
    }

    #[test]
    fn test_deleted_entry_serializes_empty() {
        let mut entry = entry_with_command(TriggerKind::CmndDown);
        entry.delete();
        assert_eq!(entry.to_snd(), "");
        entry.restore();
        assert!(!entry.to_snd().is_empty());
    }

    #[test]
    fn test_part_placement_line() {
        let mut entry = entry_with_command(TriggerKind::CmndDown);
        entry.placement = Placement::Part("engine 0".to_string());
        let out = entry.to_snd();
        assert!(out.contains("\tVEH_PART engine 0\n"));
        assert!(!out.contains("VEH_XYZ"));
    }

    #[test]
    fn test_coordinates_render_three_decimals() {
        let mut entry = entry_with_command(TriggerKind::CmndDown);
        entry.placement = Placement::Xyz([0.0, 12.5, -0.25]);
        assert!(entry.to_snd().contains("\tVEH_XYZ 0.000 12.500 -0.250\n"));
    }

    #[test]
    fn test_payload_retained_across_kind_switch() {
        let mut entry = entry_with_command(TriggerKind::CmndDown);
        let original = entry.to_snd();

        // Switch to a condition trigger: the command is not emitted...
        entry.trigger = TriggerKind::StartCond;
        entry.start_cond = "sim/flightmodel/position/groundspeed > 5".to_string();
        let as_cond = entry.to_snd();
        assert!(!as_cond.contains("EVENT_CMND_DOWN"));
        assert!(as_cond.contains("EVENT_START_COND"));

        // ...but switching back reproduces the original output exactly.
        entry.trigger = TriggerKind::CmndDown;
        assert_eq!(entry.to_snd(), original);
    }

    #[test]
    fn test_empty_payload_emits_no_trigger_line() {
        let mut entry = entry_with_command(TriggerKind::CmndUp);
        entry.command.clear();
        let out = entry.to_snd();
        assert!(!out.contains("EVENT_CMND_UP"));
    }

    #[test]
    fn test_trigger_kind_keywords() {
        for (kind, keyword) in [
            (TriggerKind::CmndDown, "EVENT_CMND_DOWN"),
            (TriggerKind::CmndUp, "EVENT_CMND_UP"),
            (TriggerKind::CmndHoldStop, "EVENT_CMND_HOLD_STOP"),
            (TriggerKind::CmndHoldCue, "EVENT_CMND_HOLD_CUE"),
        ] {
            let entry = entry_with_command(kind);
            assert!(
                entry.to_snd().contains(&format!("\t{keyword} sim/cockpit/battery_toggle\n")),
                "missing {keyword}"
            );
        }
    }

    #[test]
    fn test_id_allocator_sequence() {
        let mut ids = EntryIdAllocator::new();
        assert_eq!(ids.next_id(), "entry_1");
        assert_eq!(ids.next_id(), "entry_2");

        // A second allocator starts fresh; no shared state
        let mut other = EntryIdAllocator::new();
        assert_eq!(other.next_id(), "entry_1");
    }

    #[test]
    fn test_parse_entries_roundtrip_fields() {
        let mut entry = entry_with_command(TriggerKind::CmndHoldCue);
        entry.comment = "Battery switch".to_string();
        entry.polyphonic = true;
        entry.param_dref_idx = Some(1);
        let text = entry.to_snd();

        let mut ids = EntryIdAllocator::new();
        let parsed = parse_entries(&text, &mut ids);
        assert_eq!(parsed.len(), 1);

        let got = &parsed[0];
        assert_eq!(got.comment, "Battery switch");
        assert_eq!(got.event_name, "/aircraft/generic/switch");
        assert_eq!(got.placement, Placement::Xyz([1.5, -2.25, 3.0]));
        assert_eq!(got.trigger, TriggerKind::CmndHoldCue);
        assert_eq!(got.command, "sim/cockpit/battery_toggle");
        assert!(got.polyphonic);
        assert_eq!(got.param_dref_idx, Some(1));
        assert!(!got.is_template);
    }

    #[test]
    fn test_parse_entries_start_end_conditions() {
        let text = "BEGIN_SOUND_ATTACHMENT\n\
                    \tEVENT_NAME /aircraft/warning/stall\n\
                    \tVEH_XYZ 0.000 0.500 -0.500\n\
                    \tEVENT_START_COND sim/flightmodel/failures/stallwarning_on == 1\n\
                    \tEVENT_END_COND sim/flightmodel/failures/stallwarning_on == 0\n\
                    END_SOUND_ATTACHMENT\n";
        let mut ids = EntryIdAllocator::new();
        let parsed = parse_entries(text, &mut ids);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].trigger, TriggerKind::StartCond);
        assert_eq!(parsed[0].start_cond, "sim/flightmodel/failures/stallwarning_on == 1");
        assert_eq!(parsed[0].end_cond, "sim/flightmodel/failures/stallwarning_on == 0");
    }

    #[test]
    fn test_parse_entries_banner_lines_are_not_comments() {
        let text = "#####################\n\
                    BEGIN_SOUND_ATTACHMENT\n\
                    \tEVENT_NAME /aircraft/x\n\
                    END_SOUND_ATTACHMENT\n";
        let mut ids = EntryIdAllocator::new();
        let parsed = parse_entries(text, &mut ids);
        assert_eq!(parsed[0].comment, "");
    }

    #[test]
    fn test_parse_entries_ids_are_sequential() {
        let text = "BEGIN_SOUND_ATTACHMENT\nEND_SOUND_ATTACHMENT\n\
                    BEGIN_SOUND_ATTACHMENT\nEND_SOUND_ATTACHMENT\n";
        let mut ids = EntryIdAllocator::new();
        let parsed = parse_entries(text, &mut ids);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].id, "entry_1");
        assert_eq!(parsed[1].id, "entry_2");
    }

    #[test]
    fn test_render_document_skips_deleted() {
        let mut first = entry_with_command(TriggerKind::CmndDown);
        first.comment = "Kept".to_string();
        let mut second = entry_with_command(TriggerKind::CmndDown);
        second.comment = "Gone".to_string();
        second.delete();

        let doc = render_document("HEADER\n\n", &[first, second]);
        assert!(doc.starts_with("HEADER\n\n"));
        assert!(doc.contains("# Kept"));
        assert!(!doc.contains("# Gone"));
    }
}
