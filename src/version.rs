//! Naive dotted version comparison
//!
//! This is deliberately not semver: only a single leading range operator is
//! understood. Components are compared left to right, and the first
//! component that decides the order wins. A non-numeric component
//! (pre-release tags, `x` wildcards, compound ranges) reached before that
//! makes the pair compare as "not outdated".

use std::cmp::Ordering;

const RANGE_OPERATORS: [char; 5] = ['^', '~', '>', '=', '<'];

/// Whether `latest` is newer than the version an `installed` range names
pub fn is_outdated(installed: &str, latest: &str) -> bool {
    compare(installed, latest) == Some(Ordering::Less)
}

/// Field-wise comparison of two dotted versions.
///
/// Returns `None` when a component that has to be compared does not parse.
fn compare(installed: &str, latest: &str) -> Option<Ordering> {
    let mut installed = strip_operator(installed.trim()).split('.');
    let mut latest = latest.trim().split('.');

    loop {
        let (a, b) = match (installed.next(), latest.next()) {
            (None, None) => return Some(Ordering::Equal),
            (a, b) => (component(a)?, component(b)?),
        };
        match a.cmp(&b) {
            Ordering::Equal => continue,
            other => return Some(other),
        }
    }
}

fn strip_operator(version: &str) -> &str {
    version.strip_prefix(&RANGE_OPERATORS[..]).unwrap_or(version)
}

/// A missing trailing component counts as 0
fn component(part: Option<&str>) -> Option<u64> {
    match part {
        Some(part) => part.parse().ok(),
        None => Some(0),
    }
}
