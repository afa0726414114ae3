//! The header grammar:
//!
//! ```text
//! <header>  ::= <type>, ["(", <scope>, ")"], ["!"], ":", <SP>, <description>
//! <type>    ::= <any UTF8-octets except newline or parens or ":" or "!" or whitespace>+
//! <scope>   ::= <any UTF8-octets except newline or parens>+
//! ```
//!
//! Parsing is all-or-nothing per component but never all-or-nothing per
//! header: on failure a [`HeaderFailure`] carries both the reason and the
//! fragments a lenient second pass could still recover, so rules keep
//! producing feedback for malformed headers.

use std::fmt;

use winnow::combinator::{cut_err, delimited, opt};
use winnow::error::{ContextError, StrContext};
use winnow::token::{rest, take_while};
use winnow::{ModalResult, Parser};

use crate::message::{Scope, Type};
use crate::report::{Position, Violation};

const TYPE: &str = "type";
const SCOPE: &str = "scope";
const COLON: &str = "colon";
const SPACE: &str = "space";

/// A header that conformed to the conventional commit grammar.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParsedHeader<'a> {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    ty: Type<'a>,
    scope: Option<Scope<'a>>,
    breaking: bool,
    description: &'a str,
}

impl<'a> ParsedHeader<'a> {
    /// The type of the commit.
    pub fn type_(&self) -> Type<'a> {
        self.ty
    }

    /// The optional scope of the commit.
    pub fn scope(&self) -> Option<Scope<'a>> {
        self.scope
    }

    /// Whether an exclamation mark appeared immediately before the colon.
    pub fn breaking(&self) -> bool {
        self.breaking
    }

    /// The commit description.
    pub fn description(&self) -> &'a str {
        self.description
    }
}

/// Why a header did not conform to the grammar, plus recovered fragments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderFailure<'a> {
    kind: HeaderFailureKind,
    partial: PartialHeader<'a>,
}

impl<'a> HeaderFailure<'a> {
    /// The failure mode.
    pub fn kind(&self) -> HeaderFailureKind {
        self.kind
    }

    /// The best-effort fragments recovered from the malformed header.
    pub fn partial(&self) -> &PartialHeader<'a> {
        &self.partial
    }

    pub(crate) fn to_violation(&self) -> Violation {
        Violation::error(self.kind.rule_id(), Position::Header, self.kind.to_string())
    }
}

/// The distinct ways a header can fail to parse.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum HeaderFailureKind {
    /// The header does not start with a type.
    MissingType,

    /// The scope parenthesis is unbalanced or empty.
    InvalidScope,

    /// No colon follows the type/scope/breaking marker.
    MissingColon,

    /// The colon is not followed by a space.
    MissingSpace,

    /// The description is empty after trimming.
    MissingDescription,
}

impl HeaderFailureKind {
    pub(crate) fn rule_id(self) -> &'static str {
        match self {
            HeaderFailureKind::MissingDescription => "empty-description",
            _ => "header-grammar",
        }
    }
}

impl fmt::Display for HeaderFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderFailureKind::MissingType => f.write_str("header is missing a type"),
            HeaderFailureKind::InvalidScope => f.write_str("header scope is malformed"),
            HeaderFailureKind::MissingColon => {
                f.write_str("header is missing a colon after the type")
            }
            HeaderFailureKind::MissingSpace => {
                f.write_str("header is missing a space after the colon")
            }
            HeaderFailureKind::MissingDescription => f.write_str("header description is empty"),
        }
    }
}

/// Fragments recovered from a malformed header.
///
/// The breaking flag honors the `!`-before-colon marker even when the header
/// as a whole does not parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PartialHeader<'a> {
    ty: Option<&'a str>,
    scope: Option<&'a str>,
    breaking: bool,
    description: Option<&'a str>,
}

impl<'a> PartialHeader<'a> {
    /// The recovered type, if any.
    pub fn type_(&self) -> Option<&'a str> {
        self.ty
    }

    /// The recovered scope, if any.
    pub fn scope(&self) -> Option<&'a str> {
        self.scope
    }

    /// Whether an exclamation mark appears immediately before the colon.
    pub fn breaking(&self) -> bool {
        self.breaking
    }

    /// The recovered description, if any.
    pub fn description(&self) -> Option<&'a str> {
        self.description
    }
}

/// Parse one header line. The line must not contain newlines.
pub(crate) fn parse_header(line: &str) -> Result<ParsedHeader<'_>, HeaderFailure<'_>> {
    match summary.parse(line) {
        Ok((ty, scope, breaking, description)) => {
            let description = description.trim_end();
            if description.trim().is_empty() {
                return Err(HeaderFailure {
                    kind: HeaderFailureKind::MissingDescription,
                    partial: fragments(line),
                });
            }
            Ok(ParsedHeader {
                ty: Type::new_unchecked(ty),
                scope: scope.map(Scope::new_unchecked),
                breaking,
                description,
            })
        }
        Err(err) => Err(HeaderFailure {
            kind: classify(err.inner()),
            partial: fragments(line),
        }),
    }
}

fn is_line_ending(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn is_parens(c: char) -> bool {
    c == '(' || c == ')'
}

pub(crate) fn type_<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| {
        !is_line_ending(c) && !is_parens(c) && c != ':' && c != '!' && !c.is_whitespace()
    })
    .context(StrContext::Label(TYPE))
    .parse_next(input)
}

pub(crate) fn scope<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| !is_line_ending(c) && !is_parens(c))
        .context(StrContext::Label(SCOPE))
        .parse_next(input)
}

fn scope_block<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited(
        '(',
        cut_err(scope),
        cut_err(')'.context(StrContext::Label(SCOPE))),
    )
    .parse_next(input)
}

fn exclamation_mark(input: &mut &str) -> ModalResult<char> {
    '!'.parse_next(input)
}

#[allow(clippy::type_complexity)]
fn summary<'a>(input: &mut &'a str) -> ModalResult<(&'a str, Option<&'a str>, bool, &'a str)> {
    let ty = type_.parse_next(input)?;
    let scope = opt(scope_block).parse_next(input)?;
    let breaking = opt(exclamation_mark).parse_next(input)?;
    ':'.context(StrContext::Label(COLON)).parse_next(input)?;
    ' '.context(StrContext::Label(SPACE)).parse_next(input)?;
    let description = rest.parse_next(input)?;
    Ok((ty, scope, breaking.is_some(), description))
}

fn classify(err: &ContextError) -> HeaderFailureKind {
    for context in err.context() {
        if let StrContext::Label(label) = context {
            return match *label {
                TYPE => HeaderFailureKind::MissingType,
                SCOPE => HeaderFailureKind::InvalidScope,
                SPACE => HeaderFailureKind::MissingSpace,
                _ => HeaderFailureKind::MissingColon,
            };
        }
    }
    HeaderFailureKind::MissingColon
}

/// Lenient pass over a malformed header, keeping whatever prefix still
/// matches the grammar and whatever text follows the first colon.
fn fragments(line: &str) -> PartialHeader<'_> {
    let mut remaining = line;
    let ty = opt(type_)
        .parse_next(&mut remaining)
        .unwrap_or_default();
    let scope = opt(delimited('(', scope, ')'))
        .parse_next(&mut remaining)
        .unwrap_or_default();
    let bang = opt(exclamation_mark)
        .parse_next(&mut remaining)
        .unwrap_or_default();

    let (head, description) = match line.split_once(':') {
        Some((head, tail)) => {
            let description = tail.strip_prefix(' ').unwrap_or(tail).trim();
            (head, (!description.is_empty()).then_some(description))
        }
        None => (line, None),
    };

    PartialHeader {
        ty,
        scope,
        breaking: bang.is_some() || head.ends_with('!'),
        description,
    }
}
