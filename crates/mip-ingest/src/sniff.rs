//! Statistical sniffing over sampled lines.

use std::cmp::Ordering;

use mip_model::ColumnRole;

use crate::fields::{modal_count, parse_value, split_line};

/// Pick the delimiter that splits the sample most consistently.
///
/// Each candidate is scored by how many non-blank lines share its modal
/// field count; candidates whose modal count is below 2 never split anything
/// and are discarded. Equal scores go to the candidate with the wider modal
/// split. Returns `None` when no candidate qualifies or when the best two
/// agree on both score and width.
pub fn sniff_delimiter<'a>(lines: &[String], candidates: &[&'a str]) -> Option<&'a str> {
    let sample: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|line| !line.trim().is_empty())
        .collect();
    if sample.is_empty() {
        return None;
    }

    let mut scored: Vec<(&'a str, (usize, usize))> = candidates
        .iter()
        .filter(|candidate| !candidate.is_empty())
        .filter_map(|candidate| {
            let counts = sample.iter().map(|line| split_line(line, candidate).len());
            let (mode, frequency) = modal_count(counts)?;
            (mode >= 2).then_some((*candidate, (frequency, mode)))
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    match scored.as_slice() {
        [] => None,
        [(only, _)] => Some(*only),
        [(first, top), (_, second), ..] => match top.cmp(second) {
            Ordering::Greater => Some(*first),
            _ => None,
        },
    }
}

/// Tally of evidence for and against the first sampled row being a header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderVote {
    pub header: usize,
    pub data: usize,
}

impl HeaderVote {
    /// `Some(true)` for a header, `Some(false)` for data, `None` on a tie.
    pub fn decision(&self) -> Option<bool> {
        match self.header.cmp(&self.data) {
            Ordering::Greater => Some(true),
            Ordering::Less => Some(false),
            Ordering::Equal => None,
        }
    }
}

fn is_header_literal(cell: &str) -> bool {
    cell.eq_ignore_ascii_case("model") || ColumnRole::ALL.iter().any(|role| role.is_header_name(cell))
}

/// Vote on whether `rows[0]` is a header.
///
/// - every literal role name in the first row is a vote for a header;
/// - for each column whose remaining cells are all numeric, a non-numeric
///   first cell votes for a header and a numeric one votes against.
///
/// Rows whose width differs from the first row are ignored.
pub fn vote_header<S: AsRef<str>>(rows: &[Vec<S>]) -> HeaderVote {
    let mut vote = HeaderVote::default();
    let Some((first, rest)) = rows.split_first() else {
        return vote;
    };
    let width = first.len();
    let body: Vec<&Vec<S>> = rest.iter().filter(|row| row.len() == width).collect();

    for (column, cell) in first.iter().enumerate() {
        let cell = cell.as_ref();
        if is_header_literal(cell) {
            vote.header += 1;
            continue;
        }
        let mut values = body
            .iter()
            .map(|row| row[column].as_ref())
            .filter(|value| !value.is_empty())
            .peekable();
        if values.peek().is_none() {
            continue;
        }
        if values.all(|value| parse_value(value).is_some()) {
            if parse_value(cell).is_some() {
                vote.data += 1;
            } else {
                vote.header += 1;
            }
        }
    }
    vote
}
