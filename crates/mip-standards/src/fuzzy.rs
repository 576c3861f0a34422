//! Closest-match suggestions for unknown labels.
//!
//! Uses Jaro-Winkler similarity on normalized text. Cost is linear in the
//! number of candidates, so it is only run once per distinct unresolved label.

use rapidfuzz::distance::jaro_winkler;

/// Normalize a string for comparison.
///
/// - Trims whitespace
/// - Converts to lowercase
/// - Collapses runs of whitespace
pub fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Similarity in `[0.0, 1.0]`; `1.0` means identical after normalization.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    jaro_winkler::similarity(a.chars(), b.chars())
}

/// Return the candidate most similar to `label`.
///
/// Ties keep the earliest candidate, so results are deterministic for an
/// ordered candidate sequence. Returns `None` only for an empty sequence.
pub fn closest<'a>(label: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let needle = normalize(label);
    let mut best: Option<(&'a str, f64)> = None;
    for candidate in candidates {
        let score = jaro_winkler::similarity(needle.chars(), normalize(candidate).chars());
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((candidate, score)),
        }
    }
    best.map(|(candidate, _)| candidate)
}
