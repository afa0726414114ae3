//! Violations and the aggregated lint report.

use std::fmt;

use crate::message::CommitMessage;

/// How serious a violation is.
///
/// Only `Error` violations make a message invalid; warnings are advisory.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Severity {
    /// Advisory; does not fail the lint pass.
    Warning,

    /// Fails the lint pass.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Which part of the message a violation refers to.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Position {
    /// The first line of the message.
    Header,

    /// The free-form body.
    Body,

    /// The trailing footer lines.
    Footer,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Header => f.write_str("header"),
            Position::Body => f.write_str("body"),
            Position::Footer => f.write_str("footer"),
        }
    }
}

/// One reported problem.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Violation {
    rule_id: String,
    severity: Severity,
    message: String,
    position: Position,
}

impl Violation {
    /// Piece together a violation.
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        position: Position,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            position,
        }
    }

    /// An error-severity violation.
    pub fn error(
        rule_id: impl Into<String>,
        position: Position,
        message: impl Into<String>,
    ) -> Self {
        Self::new(rule_id, Severity::Error, position, message)
    }

    /// A warning-severity violation.
    pub fn warning(
        rule_id: impl Into<String>,
        position: Position,
        message: impl Into<String>,
    ) -> Self {
        Self::new(rule_id, Severity::Warning, position, message)
    }

    /// The identifier of the rule that produced this violation.
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// The severity of this violation.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The human-readable explanation.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The part of the message this violation refers to.
    pub fn position(&self) -> Position {
        self.position
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {} [{}]",
            self.position, self.severity, self.message, self.rule_id
        )
    }
}

/// The aggregated outcome of one lint pass.
#[derive(Clone, Debug, PartialEq)]
pub struct LintResult<'a> {
    message: CommitMessage<'a>,
    violations: Vec<Violation>,
}

impl<'a> LintResult<'a> {
    /// True iff no violation has severity [`Severity::Error`].
    pub fn is_valid(&self) -> bool {
        !self
            .violations
            .iter()
            .any(|violation| violation.severity() == Severity::Error)
    }

    /// All violations, sorted by (position, severity descending, rule id).
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// The error-severity violations.
    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|violation| violation.severity() == Severity::Error)
    }

    /// The warning-severity violations.
    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|violation| violation.severity() == Severity::Warning)
    }

    /// The parsed message the report was derived from.
    pub fn message(&self) -> &CommitMessage<'a> {
        &self.message
    }
}

impl fmt::Display for LintResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for violation in &self.violations {
            writeln!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Stable-sort violations for deterministic output and compute the report.
pub(crate) fn aggregate<'a>(
    message: CommitMessage<'a>,
    mut violations: Vec<Violation>,
) -> LintResult<'a> {
    violations.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| b.severity.cmp(&a.severity))
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });
    LintResult {
        message,
        violations,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[cfg(feature = "serde")]
    use serde_test::Token;

    fn fixture() -> Vec<Violation> {
        vec![
            Violation::warning("malformed-footer", Position::Footer, "bad footer"),
            Violation::error("invalid-type", Position::Header, "bad type"),
            Violation::warning("body-leading-blank", Position::Body, "no blank line"),
            Violation::error("header-grammar", Position::Header, "missing colon"),
        ]
    }

    #[test]
    fn test_sorted_by_position_severity_rule() {
        let result = aggregate(CommitMessage::parse("feat: x"), fixture());

        let ids: Vec<_> = result
            .violations()
            .iter()
            .map(Violation::rule_id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "header-grammar",
                "invalid-type",
                "body-leading-blank",
                "malformed-footer",
            ]
        );
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let once = aggregate(CommitMessage::parse("feat: x"), fixture());
        let twice = aggregate(
            CommitMessage::parse("feat: x"),
            once.violations().to_vec(),
        );

        assert_eq!(once.violations(), twice.violations());
    }

    #[test]
    fn test_is_valid() {
        let clean = aggregate(CommitMessage::parse("feat: x"), Vec::new());
        assert!(clean.is_valid());

        let warned = aggregate(
            CommitMessage::parse("feat: x"),
            vec![Violation::warning("w", Position::Body, "advisory")],
        );
        assert!(warned.is_valid());

        let failed = aggregate(
            CommitMessage::parse("feat: x"),
            vec![Violation::error("e", Position::Header, "fatal")],
        );
        assert!(!failed.is_valid());
        assert_eq!(failed.errors().count(), 1);
        assert_eq!(failed.warnings().count(), 0);
    }

    #[test]
    fn test_violation_display() {
        let violation = Violation::error("header-grammar", Position::Header, "missing colon");
        assert_eq!(
            violation.to_string(),
            "header: error: missing colon [header-grammar]"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_violation_serialize() {
        let violation = Violation::error("invalid-type", Position::Header, "bad type");
        serde_test::assert_ser_tokens(
            &violation,
            &[
                Token::Struct {
                    name: "Violation",
                    len: 4,
                },
                Token::Str("rule_id"),
                Token::Str("invalid-type"),
                Token::Str("severity"),
                Token::UnitVariant {
                    name: "Severity",
                    variant: "error",
                },
                Token::Str("message"),
                Token::Str("bad type"),
                Token::Str("position"),
                Token::UnitVariant {
                    name: "Position",
                    variant: "header",
                },
                Token::StructEnd,
            ],
        );
    }
}
