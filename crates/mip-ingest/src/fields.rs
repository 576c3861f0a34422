//! Field-level helpers shared by inference, validation, and output.

use std::collections::BTreeMap;

/// Split a raw line on `delimiter`. An empty delimiter yields the whole line
/// as a single field.
pub fn split_line<'a>(line: &'a str, delimiter: &str) -> Vec<&'a str> {
    if delimiter.is_empty() {
        return vec![line];
    }
    line.split(delimiter).collect()
}

/// Remove surrounding whitespace and double quotes from a field.
pub fn strip_quotes(field: &str) -> &str {
    field.trim().trim_matches('"').trim()
}

/// Most frequent value and its frequency. Ties resolve to the smallest value.
pub fn modal_count(counts: impl IntoIterator<Item = usize>) -> Option<(usize, usize)> {
    let mut frequencies: BTreeMap<usize, usize> = BTreeMap::new();
    for count in counts {
        *frequencies.entry(count).or_default() += 1;
    }
    let mut best: Option<(usize, usize)> = None;
    // Ascending key order, so a strict comparison keeps the smallest on ties.
    for (count, frequency) in frequencies {
        match best {
            Some((_, top)) if frequency <= top => {}
            _ => best = Some((count, frequency)),
        }
    }
    best
}

pub fn parse_year(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

/// Parse a finite number. `NaN` and infinities are rejected.
pub fn parse_value(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Integer strictly between 1000 and 9999.
pub fn is_plausible_year(text: &str) -> bool {
    parse_year(text).is_some_and(|year| year > 1000 && year < 9999)
}
