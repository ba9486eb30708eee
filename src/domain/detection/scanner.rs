//! Containment test of candidate strings against an encoding catalog.

use super::encoding::{EncodedValue, EncodingCatalog};

/// Returns every catalog entry whose value occurs in `candidate`, in catalog order.
///
/// Plain substring search without normalization or decoding. Entries with an
/// empty value never match.
pub fn scan<'a>(candidate: &str, catalog: &'a EncodingCatalog) -> Vec<&'a EncodedValue> {
    catalog
        .iter()
        .filter(|e| !e.value.is_empty() && candidate.contains(e.value.as_str()))
        .collect()
}

/// Returns true if any catalog entry occurs in `candidate`.
pub fn matches_any(candidate: &str, catalog: &EncodingCatalog) -> bool {
    catalog
        .iter()
        .any(|e| !e.value.is_empty() && candidate.contains(e.value.as_str()))
}
