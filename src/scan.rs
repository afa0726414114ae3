//! Lenient line scanner: header / body / footer split.
//!
//! Scanning never fails. Structural problems (a missing blank line before the
//! body) are flagged, not fatal, and the strictness lives in the rules.

use crate::footer::footer_start;
use crate::lines::LinesWithTerminator;

pub(crate) struct Scanned<'a> {
    pub(crate) header: &'a str,
    pub(crate) body_lines: Vec<&'a str>,
    /// Contiguous slice of the input covering all footer lines.
    pub(crate) footer_block: &'a str,
    pub(crate) blank_before_body: bool,
}

/// Split a message into header line, body lines and footer block.
///
/// The first line is always the header, even when empty. The footer block
/// starts at the first remaining line that matches the footer grammar,
/// whether or not a blank line precedes it; everything between the header and
/// that boundary is body. A remainder that does not start with a blank line
/// sets `blank_before_body` to false but still scans normally.
pub(crate) fn scan(raw: &str) -> Scanned<'_> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for line in LinesWithTerminator::new(raw) {
        lines.push((offset, line.trim_end_matches(['\r', '\n'])));
        offset += line.len();
    }

    let (header, remainder) = match lines.split_first() {
        Some(((_, header), remainder)) => (*header, remainder),
        None => ("", &[][..]),
    };

    let blank_before_body = remainder
        .first()
        .map_or(true, |(_, content)| content.trim().is_empty());

    let boundary = remainder
        .iter()
        .position(|(_, content)| footer_start(content).is_some())
        .unwrap_or(remainder.len());

    let footer_block = if boundary < remainder.len() {
        raw[remainder[boundary].0..].trim_end()
    } else {
        ""
    };

    Scanned {
        header,
        body_lines: trim_blank_edges(&remainder[..boundary]),
        footer_block,
        blank_before_body,
    }
}

fn trim_blank_edges<'a>(lines: &[(usize, &'a str)]) -> Vec<&'a str> {
    let mut lines: Vec<&'a str> = lines.iter().map(|(_, content)| *content).collect();
    while lines.first().is_some_and(|line| line.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    lines
}
