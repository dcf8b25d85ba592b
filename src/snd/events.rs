//! Event path catalog
//!
//! Collects the distinct FMOD event paths referenced by a document, for
//! downstream studio-project packaging.

use std::collections::BTreeSet;

use crate::constants::snd as kw;
use crate::snd::keyword_arg;

/// Every `EVENT_NAME` path rooted at `/`, deduplicated and sorted.
/// Whitespace inside a path token is normalized to single spaces.
pub fn extract_event_paths(snd: &str) -> Vec<String> {
    let mut events = BTreeSet::new();

    for raw in snd.lines() {
        let line = raw.trim();
        if keyword_arg(line, kw::EVENT_NAME).is_some() {
            let path = line
                .split_whitespace()
                .skip(1)
                .collect::<Vec<_>>()
                .join(" ");
            if path.starts_with('/') {
                events.insert(path);
            }
        }
    }

    events.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_sorted_and_deduplicated() {
        let doc = "BEGIN_SOUND_ATTACHMENT\n\
                   \tEVENT_NAME /aircraft/warning/stall\n\
                   END_SOUND_ATTACHMENT\n\
                   BEGIN_SOUND_ATTACHMENT\n\
                   \tEVENT_NAME /aircraft/engine/running\n\
                   END_SOUND_ATTACHMENT\n\
                   BEGIN_SOUND_ATTACHMENT\n\
                   \tEVENT_NAME /aircraft/warning/stall\n\
                   END_SOUND_ATTACHMENT\n";
        assert_eq!(
            extract_event_paths(doc),
            vec!["/aircraft/engine/running", "/aircraft/warning/stall"]
        );
    }

    #[test]
    fn test_non_rooted_paths_ignored() {
        let doc = "\tEVENT_NAME aircraft/no/leading/slash\n\tEVENT_NAME /kept\n";
        assert_eq!(extract_event_paths(doc), vec!["/kept"]);
    }

    #[test]
    fn test_empty_document_yields_empty_catalog() {
        assert!(extract_event_paths("").is_empty());
    }
}
