//! Map identifier normalization.
//!
//! Steam reports map identifiers with inconsistent casing and with
//! decorations for seasons and events (`mp_rr_olympus_mu2`,
//! `mp_rr_divided_moon_halloween`). Normalization reduces them to the
//! canonical base identifier used as the table key.

use crate::tables::{is_termination_token, lookup_map_label};

const SEPARATOR: &str = "_";

/// Reduce a raw map identifier to its canonical form.
///
/// 1. trim, drop leading `#` markers, lower-case
/// 2. a curated identifier is returned as-is (event variants stay decorated)
/// 3. otherwise keep trimmed segments up to the first termination token
///
/// Identifiers with no termination token come back whole; the caller is
/// expected to handle the table miss.
pub fn normalize(raw: &str) -> String {
    let lowered = raw
        .trim_start_matches(|c: char| c == '#' || c.is_whitespace())
        .trim_end()
        .to_ascii_lowercase();

    if lookup_map_label(&lowered).is_some() {
        return lowered;
    }

    let base: Vec<&str> = lowered
        .split(SEPARATOR)
        .map(str::trim)
        .take_while(|segment| !is_termination_token(segment))
        .collect();
    base.join(SEPARATOR)
}
