//! Marker label resolution.
//!
//! The marker detector reports integer class ids; which ids count as
//! "markers" is decided once at startup by matching a required label set
//! against the detector's class-name table, case-insensitively. A detector
//! whose names match nothing in the allow-list is a fatal configuration
//! error, reported before the session reads a single frame.

use anyhow::{anyhow, Result};

/// Resolve marker class ids from a detector's class-name table.
///
/// Matching is case-insensitive and exact per name. Returns the matching
/// class ids in table order. Errors when no name matches - the caller must
/// treat that as fatal, not per-frame.
pub fn resolve_marker_classes(class_names: &[String], wanted: &[String]) -> Result<Vec<u32>> {
    let wanted_lower: Vec<String> = wanted.iter().map(|w| w.to_lowercase()).collect();

    let resolved: Vec<u32> = class_names
        .iter()
        .enumerate()
        .filter(|(_, name)| wanted_lower.iter().any(|w| w == &name.to_lowercase()))
        .map(|(id, _)| id as u32)
        .collect();

    if resolved.is_empty() {
        return Err(anyhow!(
            "no marker classes resolved: model classes {:?} match none of {:?}",
            class_names,
            wanted
        ));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolves_case_insensitively() {
        let table = names(&["Cards", "Lanyard", "helmet"]);
        let wanted = names(&["cards", "card", "lanyard"]);
        let ids = resolve_marker_classes(&table, &wanted).unwrap();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn unmatched_labels_are_fatal() {
        let table = names(&["person", "bicycle"]);
        let wanted = names(&["cards", "lanyard"]);
        assert!(resolve_marker_classes(&table, &wanted).is_err());
    }

    #[test]
    fn partial_match_is_accepted() {
        let table = names(&["card"]);
        let wanted = names(&["cards", "card", "lanyard"]);
        assert_eq!(resolve_marker_classes(&table, &wanted).unwrap(), vec![0]);
    }
}
