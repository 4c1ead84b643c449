//! Free-text filtering of suspicious domains.

use crate::models::SuspiciousDomain;

/// Split a comma-separated domain list, trimming each element.
///
/// Empty elements are kept: `"a,,b"` yields `["a", "", "b"]`.
pub fn split_domains(input: &str) -> Vec<String> {
    input.split(',').map(|d| d.trim().to_owned()).collect()
}

/// Rows whose domain, customer name or rendered discovery date contain `term`.
///
/// Matching is case-insensitive and order-preserving. An empty term keeps
/// every row.
pub fn filter_suspicious(rows: &[SuspiciousDomain], term: &str) -> Vec<SuspiciousDomain> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return rows.to_vec();
    }

    rows.iter()
        .filter(|row| matches_term(row, &needle))
        .cloned()
        .collect()
}

fn matches_term(row: &SuspiciousDomain, needle: &str) -> bool {
    row.suspicious_domain.to_lowercase().contains(needle)
        || row.customer.name.to_lowercase().contains(needle)
        || row.found_date_display().to_lowercase().contains(needle)
}
