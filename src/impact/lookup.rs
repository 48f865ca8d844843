//! Impact lookup by item name

use super::table::{ImpactRecord, DEFAULT_IMPACT, IMPACT_TABLE};

/// First keyword entry contained in the item name, case-insensitively
pub fn find_impact(item_name: &str) -> Option<(&'static str, ImpactRecord)> {
    let name = item_name.to_lowercase();
    IMPACT_TABLE
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(keyword, record)| (*keyword, *record))
}

/// Resolve impact constants for an item name
///
/// Unmatched names get [`DEFAULT_IMPACT`]; this never fails.
pub fn lookup_impact(item_name: &str) -> ImpactRecord {
    match find_impact(item_name) {
        Some((_, record)) => record,
        None => {
            tracing::debug!("No impact keyword for '{}', using default", item_name);
            DEFAULT_IMPACT
        }
    }
}
