//! Fatal errors: invalid configuration and component validation.
//!
//! Malformed commit messages are never fatal; they surface as
//! [`Violation`][crate::Violation]s instead.

use std::fmt;

/// The error returned when a configuration or commit component is invalid.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,

    context: Option<String>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    pub(crate) fn set_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ErrorKind::*;

        match self.kind {
            InvalidType => f.write_str("invalid commit type")?,
            InvalidScope => f.write_str("invalid scope format")?,
            InvalidFooterToken => f.write_str("invalid footer token")?,
            ZeroMaxHeaderLength => f.write_str("`max_header_length` must be greater than zero")?,
            EmptyTypeEnum => f.write_str("`allowed_types` must not be an empty set")?,
        }

        if let Some(context) = &self.context {
            write!(f, ": `{context}`")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

/// All possible error kinds.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The value does not parse as a commit type.
    InvalidType,

    /// The value does not parse as a scope.
    InvalidScope,

    /// The value does not parse as a footer token.
    InvalidFooterToken,

    /// `max_header_length` was configured as zero.
    ZeroMaxHeaderLength,

    /// `allowed_types` was configured as an empty set.
    EmptyTypeEnum,
}
