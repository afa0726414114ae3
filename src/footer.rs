//! The footer grammar:
//!
//! ```text
//! <footer>    ::= <token>, <separator>, <value>
//! <token>     ::= "BREAKING CHANGE" | <word characters and hyphens>+
//! <separator> ::= ": " | " #"
//! ```
//!
//! A footer value may continue onto following lines: a non-blank line that
//! does not itself start a footer extends the value of the footer above it.
//! A blank line closes the open footer. A non-matching line with no footer
//! open is dropped with a `malformed-footer` warning instead of failing the
//! parse.

use std::borrow::Cow;

use winnow::combinator::alt;
use winnow::token::take_while;
use winnow::{ModalResult, Parser};

use crate::lines::LinesWithTerminator;
use crate::message::{Footer, FooterSeparator, FooterToken, BREAKING_PHRASE};
use crate::report::{Position, Violation};

pub(crate) fn token<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    alt((BREAKING_PHRASE, word_token)).parse_next(input)
}

fn word_token<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || c == '-' || c == '_'
    })
    .parse_next(input)
}

fn separator(input: &mut &str) -> ModalResult<FooterSeparator> {
    alt((
        ": ".value(FooterSeparator::ColonSpace),
        " #".value(FooterSeparator::SpacePound),
    ))
    .parse_next(input)
}

/// Recognize `token separator` at the start of a line.
///
/// Returns the token, the separator, and the byte offset at which the value
/// begins.
pub(crate) fn footer_start(line: &str) -> Option<(FooterToken<'_>, FooterSeparator, usize)> {
    let mut remaining = line;
    let tok = token(&mut remaining).ok()?;
    let sep = separator(&mut remaining).ok()?;
    Some((
        FooterToken::new_unchecked(tok),
        sep,
        line.len() - remaining.len(),
    ))
}

/// Parse the scanner's footer block into footers plus any warnings.
///
/// `block` is a contiguous slice of the original message, so footer values
/// spanning continuation lines stay borrowed unless a CRLF terminator has to
/// be normalized away.
pub(crate) fn parse_footers(block: &str) -> (Vec<Footer<'_>>, Vec<Violation>) {
    let mut footers = Vec::new();
    let mut violations = Vec::new();
    let mut open: Option<(FooterToken<'_>, FooterSeparator, usize)> = None;
    let mut offset = 0;
    let mut value_end = 0;

    for line in LinesWithTerminator::new(block) {
        let content = line.trim_end_matches(['\r', '\n']);
        if let Some((tok, sep, consumed)) = footer_start(content) {
            if let Some((tok, sep, start)) = open.take() {
                footers.push(Footer::new(tok, sep, value(block, start, value_end)));
            }
            open = Some((tok, sep, offset + consumed));
            value_end = offset + content.len();
        } else if content.trim().is_empty() {
            if let Some((tok, sep, start)) = open.take() {
                footers.push(Footer::new(tok, sep, value(block, start, value_end)));
            }
        } else if open.is_some() {
            value_end = offset + content.len();
        } else {
            violations.push(Violation::warning(
                "malformed-footer",
                Position::Footer,
                format!("line is not a valid footer: `{content}`"),
            ));
        }
        offset += line.len();
    }
    if let Some((tok, sep, start)) = open {
        footers.push(Footer::new(tok, sep, value(block, start, value_end)));
    }

    (footers, violations)
}

/// A footer value with `\n` line terminators, borrowed when possible.
fn value(block: &str, start: usize, end: usize) -> Cow<'_, str> {
    let value = block[start..end].trim_end();
    if value.contains("\r\n") {
        Cow::Owned(value.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use indoc::indoc;

    #[track_caller]
    fn assert_footers(block: &str, expected: &[(&str, &str, &str)]) {
        let (footers, violations) = parse_footers(block);
        assert!(violations.is_empty(), "{violations:?}");
        let actual: Vec<_> = footers
            .iter()
            .map(|f| (f.token().as_str(), f.separator().as_str(), f.value()))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_single_footer() {
        assert_footers("hello: world", &[("hello", ": ", "world")]);
    }

    #[test]
    fn test_ref_separator() {
        assert_footers("Closes #12", &[("Closes", " #", "12")]);
    }

    #[test]
    fn test_breaking_change_token() {
        assert_footers(
            "BREAKING CHANGE: woops!",
            &[("BREAKING CHANGE", ": ", "woops!")],
        );

        let (footers, _) = parse_footers("BREAKING CHANGE: woops!");
        assert!(footers[0].breaking());
    }

    #[test]
    fn test_adjacent_footers() {
        assert_footers(
            indoc!(
                "Reviewed-by: Marge Simpson <marge@simpsons.com>
                Closes #12"
            ),
            &[
                ("Reviewed-by", ": ", "Marge Simpson <marge@simpsons.com>"),
                ("Closes", " #", "12"),
            ],
        );
    }

    #[test]
    fn test_multi_line_value() {
        assert_footers(
            indoc!(
                "BREAKING CHANGE: removes the old endpoint
                and the legacy auth flow
                Closes #12"
            ),
            &[
                (
                    "BREAKING CHANGE",
                    ": ",
                    "removes the old endpoint\nand the legacy auth flow",
                ),
                ("Closes", " #", "12"),
            ],
        );
    }

    #[test]
    fn test_crlf_continuation_value_is_normalized() {
        assert_footers(
            "BREAKING CHANGE: removes the endpoint\r\nand the auth flow",
            &[("BREAKING CHANGE", ": ", "removes the endpoint\nand the auth flow")],
        );
    }

    #[test]
    fn test_blank_line_closes_value() {
        assert_footers(
            indoc!(
                "Reviewed-by: Lisa

                Closes #7"
            ),
            &[("Reviewed-by", ": ", "Lisa"), ("Closes", " #", "7")],
        );
    }

    #[test]
    fn test_empty_value_is_permitted() {
        assert_footers("Acked-by: ", &[("Acked-by", ": ", "")]);
    }

    #[test]
    fn test_malformed_line_is_a_warning() {
        let (footers, violations) = parse_footers(indoc!(
            "Reviewed-by: Lisa

            not a footer line"
        ));

        assert_eq!(footers.len(), 1);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule_id(), "malformed-footer");
        assert_eq!(violations[0].severity(), crate::Severity::Warning);
    }

    #[test]
    fn test_colon_without_space_is_not_a_footer() {
        let (footers, violations) = parse_footers("token:value");
        assert!(footers.is_empty());
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_empty_block() {
        let (footers, violations) = parse_footers("");
        assert!(footers.is_empty());
        assert!(violations.is_empty());
    }
}
