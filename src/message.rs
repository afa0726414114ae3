//! The commit message and its typed components.

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

use crate::footer as footer_parser;
use crate::header::{parse_header, HeaderFailure, ParsedHeader};
use crate::report::{Position, Violation};
use crate::scan::scan;
use crate::{Error, ErrorKind};

pub(crate) const BREAKING_PHRASE: &str = "BREAKING CHANGE";
pub(crate) const BREAKING_ARROW: &str = "BREAKING-CHANGE";

/// A commit message, decomposed for linting.
///
/// Parsing is lenient: a malformed message still produces a `CommitMessage`,
/// with the problems recorded as [`Violation`]s and whatever header fragments
/// could be recovered kept available for the rules.
#[derive(Clone, Debug, PartialEq)]
pub struct CommitMessage<'a> {
    raw: &'a str,
    header: &'a str,
    body: Vec<&'a str>,
    footers: Vec<Footer<'a>>,
    parsed: Result<ParsedHeader<'a>, HeaderFailure<'a>>,
    diagnostics: Vec<Violation>,
    breaking: bool,
}

impl<'a> CommitMessage<'a> {
    /// Decompose a raw commit message.
    ///
    /// This never fails. Header grammar problems, malformed footers and a
    /// missing blank line before the body are recorded as parse-level
    /// violations, retrievable through the rule engine's report.
    pub fn parse(raw: &'a str) -> Self {
        let text = raw.trim_matches(['\r', '\n']);
        let scanned = scan(text);

        let mut diagnostics = Vec::new();
        if !scanned.blank_before_body {
            diagnostics.push(Violation::warning(
                "body-leading-blank",
                Position::Body,
                "body must begin one blank line after the header",
            ));
        }

        let (footers, footer_diagnostics) = footer_parser::parse_footers(scanned.footer_block);
        diagnostics.extend(footer_diagnostics);

        let parsed = parse_header(scanned.header);
        if let Err(failure) = &parsed {
            diagnostics.push(failure.to_violation());
        }

        let header_breaking = match &parsed {
            Ok(header) => header.breaking(),
            Err(failure) => failure.partial().breaking(),
        };
        let breaking = header_breaking || footers.iter().any(Footer::breaking);

        Self {
            raw,
            header: scanned.header,
            body: scanned.body_lines,
            footers,
            parsed,
            diagnostics,
            breaking,
        }
    }

    /// The raw message this was parsed from.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// The header: the first line of the message.
    pub fn header(&self) -> &'a str {
        self.header
    }

    /// The type of the commit, if one could be recovered from the header.
    pub fn type_(&self) -> Option<Type<'a>> {
        match &self.parsed {
            Ok(header) => Some(header.type_()),
            Err(failure) => failure.partial().type_().map(Type::new_unchecked),
        }
    }

    /// The scope of the commit, if present and recoverable.
    pub fn scope(&self) -> Option<Scope<'a>> {
        match &self.parsed {
            Ok(header) => header.scope(),
            Err(failure) => failure.partial().scope().map(Scope::new_unchecked),
        }
    }

    /// The commit description, if one could be recovered from the header.
    pub fn description(&self) -> Option<&'a str> {
        match &self.parsed {
            Ok(header) => Some(header.description()),
            Err(failure) => failure.partial().description(),
        }
    }

    /// The body lines, blank interior lines included.
    pub fn body(&self) -> &[&'a str] {
        &self.body
    }

    /// Any footer.
    ///
    /// A footer is similar to a Git trailer, with the exception of not
    /// requiring whitespace before newlines.
    ///
    /// See: <https://git-scm.com/docs/git-interpret-trailers>
    pub fn footers(&self) -> &[Footer<'a>] {
        &self.footers
    }

    /// A flag to signal that the commit contains breaking changes.
    ///
    /// This flag is set either when the header has an exclamation mark
    /// immediately before the colon, e.g.:
    /// ```text
    /// feat(scope)!: this is a breaking change
    /// ```
    ///
    /// Or when a `BREAKING CHANGE:` footer is defined:
    /// ```text
    /// feat: my commit description
    ///
    /// BREAKING CHANGE: this is a breaking change
    /// ```
    ///
    /// Either marker is sufficient on its own; having both is not an error.
    pub fn breaking(&self) -> bool {
        self.breaking
    }

    /// Explanation for the breaking change.
    ///
    /// Note: if no `BREAKING CHANGE` footer is provided, the `description` is
    /// expected to describe the breaking change.
    pub fn breaking_description(&self) -> Option<&str> {
        if let Some(footer) = self.footers.iter().find(|footer| footer.breaking()) {
            return Some(footer.value());
        }
        let header_breaking = match &self.parsed {
            Ok(header) => header.breaking(),
            Err(failure) => failure.partial().breaking(),
        };
        header_breaking.then(|| self.description()).flatten()
    }

    /// The fully parsed header, when the header conformed to the grammar.
    pub fn parsed_header(&self) -> Option<&ParsedHeader<'a>> {
        self.parsed.as_ref().ok()
    }

    /// The header grammar failure, when the header did not conform.
    pub fn header_failure(&self) -> Option<&HeaderFailure<'a>> {
        self.parsed.as_ref().err()
    }

    /// Violations found while scanning and parsing, before any rule ran.
    pub(crate) fn diagnostics(&self) -> &[Violation] {
        &self.diagnostics
    }
}

impl fmt::Display for CommitMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(header) = &self.parsed else {
            return f.write_str(self.raw);
        };

        f.write_str(header.type_().as_str())?;
        if let Some(scope) = header.scope() {
            write!(f, "({scope})")?;
        }
        if header.breaking() {
            f.write_str("!")?;
        }
        write!(f, ": {}", header.description())?;

        if !self.body.is_empty() {
            write!(f, "\n\n{}", self.body.join("\n"))?;
        }

        for footer in self.footers() {
            write!(
                f,
                "\n\n{}{}{}",
                footer.token(),
                footer.separator(),
                footer.value()
            )?;
        }

        Ok(())
    }
}

/// A single footer.
///
/// A footer is similar to a Git trailer, with the exception of not requiring
/// whitespace before newlines.
///
/// See: <https://git-scm.com/docs/git-interpret-trailers>
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Footer<'a> {
    token: FooterToken<'a>,
    sep: FooterSeparator,
    value: Cow<'a, str>,
}

impl<'a> Footer<'a> {
    /// Piece together a footer.
    pub fn new(
        token: FooterToken<'a>,
        sep: FooterSeparator,
        value: impl Into<Cow<'a, str>>,
    ) -> Self {
        Self {
            token,
            sep,
            value: value.into(),
        }
    }

    /// The token of the footer.
    pub const fn token(&self) -> FooterToken<'a> {
        self.token
    }

    /// The separator between the footer token and its value.
    pub const fn separator(&self) -> FooterSeparator {
        self.sep
    }

    /// The value of the footer.
    ///
    /// A value spanning continuation lines is returned with `\n` line
    /// terminators regardless of the terminators in the raw message.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// A flag to signal that the footer describes a breaking change.
    pub fn breaking(&self) -> bool {
        self.token.breaking()
    }
}

/// The type of separator between the footer token and value.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum FooterSeparator {
    /// ": "
    ColonSpace,

    /// " #"
    SpacePound,
}

impl FooterSeparator {
    /// Access `str` representation of the separator.
    pub fn as_str(self) -> &'static str {
        match self {
            FooterSeparator::ColonSpace => ": ",
            FooterSeparator::SpacePound => " #",
        }
    }
}

impl Deref for FooterSeparator {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl PartialEq<&'_ str> for FooterSeparator {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for FooterSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

macro_rules! unicase_components {
    ($($ty:ident),+) => (
        $(
            /// A component of the commit message, compared case-insensitively.
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $ty<'a>(unicase::UniCase<&'a str>);

            impl<'a> $ty<'a> {
                /// See `parse` for ensuring the data is valid.
                pub const fn new_unchecked(value: &'a str) -> Self {
                    $ty(unicase::UniCase::unicode(value))
                }

                /// Access `str` representation
                pub fn as_str(&self) -> &'a str {
                    self.0.into_inner()
                }
            }

            impl Deref for $ty<'_> {
                type Target = str;

                fn deref(&self) -> &Self::Target {
                    self.as_str()
                }
            }

            impl PartialEq<&'_ str> for $ty<'_> {
                fn eq(&self, other: &&str) -> bool {
                    *self == $ty::new_unchecked(*other)
                }
            }

            impl fmt::Display for $ty<'_> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.0.fmt(f)
                }
            }

            #[cfg(feature = "serde")]
            impl serde::Serialize for $ty<'_> {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    serializer.serialize_str(self)
                }
            }
        )+
    )
}

unicase_components![Type, Scope, FooterToken];

impl<'a> Type<'a> {
    /// Parse a `str` into a `Type`.
    pub fn parse(input: &'a str) -> Result<Self, Error> {
        let mut remaining = input;
        let parsed = crate::header::type_(&mut remaining)
            .map_err(|_| Error::new(ErrorKind::InvalidType).set_context(input))?;
        if !remaining.is_empty() {
            return Err(Error::new(ErrorKind::InvalidType).set_context(input));
        }
        Ok(Type::new_unchecked(parsed))
    }
}

/// Common commit types
impl Type<'static> {
    /// Commit type when introducing new features (correlates with `minor` in semver)
    pub const FEAT: Type<'static> = Type::new_unchecked("feat");
    /// Commit type when patching a bug (correlates with `patch` in semver)
    pub const FIX: Type<'static> = Type::new_unchecked("fix");
    /// Possible commit type when reverting changes.
    pub const REVERT: Type<'static> = Type::new_unchecked("revert");
    /// Possible commit type for changing documentation.
    pub const DOCS: Type<'static> = Type::new_unchecked("docs");
    /// Possible commit type for changing code style.
    pub const STYLE: Type<'static> = Type::new_unchecked("style");
    /// Possible commit type for refactoring code structure.
    pub const REFACTOR: Type<'static> = Type::new_unchecked("refactor");
    /// Possible commit type for performance optimizations.
    pub const PERF: Type<'static> = Type::new_unchecked("perf");
    /// Possible commit type for addressing tests.
    pub const TEST: Type<'static> = Type::new_unchecked("test");
    /// Possible commit type for other things.
    pub const CHORE: Type<'static> = Type::new_unchecked("chore");
}

impl<'a> Scope<'a> {
    /// Parse a `str` into a `Scope`.
    pub fn parse(input: &'a str) -> Result<Self, Error> {
        let mut remaining = input;
        let parsed = crate::header::scope(&mut remaining)
            .map_err(|_| Error::new(ErrorKind::InvalidScope).set_context(input))?;
        if !remaining.is_empty() {
            return Err(Error::new(ErrorKind::InvalidScope).set_context(input));
        }
        Ok(Scope::new_unchecked(parsed))
    }
}

impl<'a> FooterToken<'a> {
    /// Parse a `str` into a `FooterToken`.
    pub fn parse(input: &'a str) -> Result<Self, Error> {
        let mut remaining = input;
        let parsed = crate::footer::token(&mut remaining)
            .map_err(|_| Error::new(ErrorKind::InvalidFooterToken).set_context(input))?;
        if !remaining.is_empty() {
            return Err(Error::new(ErrorKind::InvalidFooterToken).set_context(input));
        }
        Ok(FooterToken::new_unchecked(parsed))
    }

    /// A flag to signal that the footer describes a breaking change.
    pub fn breaking(&self) -> bool {
        self == &BREAKING_PHRASE || self == &BREAKING_ARROW
    }
}
