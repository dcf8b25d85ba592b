//! FMOD sound attachment (.snd) engine
//!
//! Four collaborating pieces over the same line-oriented format:
//! - **entry**: the mutable model of one attachment block and its
//!   canonical serialization
//! - **generate**: fresh document synthesis from cockpit geometry
//! - **update**: format-preserving coordinate diff-and-patch against an
//!   existing document
//! - **events**: event path catalog extraction

pub mod entry;
pub mod events;
pub mod generate;
pub mod update;

pub use entry::{EntryIdAllocator, Placement, SoundEntry, TriggerKind};
pub use generate::{CannedSound, GenerateOptions, GenerateStats, Generator};
pub use update::{ChangeRecord, UpdateReport};

/// Splits `KEYWORD arg...` into the trimmed argument, returning `None`
/// unless `line` starts with the keyword followed by whitespace. Keeps
/// keyword matching exact: `EVENT_NAME` never matches `EVENT_NAME_FOO`.
pub(crate) fn keyword_arg<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.starts_with([' ', '\t']) {
        Some(rest.trim())
    } else {
        None
    }
}
