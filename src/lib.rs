//! A linting library for the [Conventional Commit] specification.
//!
//! [conventional commit]: https://www.conventionalcommits.org
//!
//! # Example
//!
//! ```rust
//! use indoc::indoc;
//!
//! let message = indoc!("
//!     feat(export)!: switch the export format to JSON
//!
//!     The old format was undocumented and hard to extend, and every
//!     consumer we know of already parses JSON anyway.
//!
//!     BREAKING CHANGE: exports from older releases can no longer be
//!     imported; run the migration command once before upgrading.
//!
//!     Reviewed-by: Ada Lovelace <ada@example.com>
//!     Closes #42
//! ");
//!
//! let linter = conventional_lint::Linter::new(conventional_lint::Config::default()).unwrap();
//! let report = linter.lint(message);
//!
//! // A conforming message produces an empty, valid report.
//! assert!(report.is_valid());
//! assert!(report.violations().is_empty());
//!
//! // All components of the parsed message are available on the report.
//! let commit = report.message();
//! assert_eq!(commit.type_().unwrap(), conventional_lint::FEAT);
//! assert_eq!(commit.scope().unwrap(), "export");
//! assert_eq!(commit.description(), Some("switch the export format to JSON"));
//!
//! // And the free-form commit body.
//! assert!(commit.body().join("\n").contains("already parses JSON"));
//!
//! // A bang (`!`) in the header or a "BREAKING CHANGE" footer marks the
//! // commit as breaking; either on its own is sufficient.
//! assert!(commit.breaking());
//! assert!(commit.breaking_description().unwrap().contains("migration command"));
//!
//! // Footer values may span continuation lines.
//! assert!(commit.footers()[0].value().contains("before upgrading"));
//!
//! // Footers provide access to their token and value.
//! assert_eq!(commit.footers()[1].token(), "Reviewed-by");
//! assert_eq!(commit.footers()[1].value(), "Ada Lovelace <ada@example.com>");
//!
//! // Two types of separators are supported, regular ": ", and " #":
//! assert_eq!(commit.footers()[2].separator(), " #");
//! assert_eq!(commit.footers()[2].value(), "42");
//! ```
//!
//! Problems are collected into one report, never reported one at a time:
//!
//! ```rust
//! use conventional_lint::{Config, Linter};
//!
//! let config = Config {
//!     allowed_types: Some(["feat".to_owned(), "fix".to_owned()].into()),
//!     ..Default::default()
//! };
//! let linter = Linter::new(config).unwrap();
//!
//! let report = linter.lint("docs!:broken header");
//!
//! assert!(!report.is_valid());
//! let ids: Vec<_> = report.violations().iter().map(|v| v.rule_id()).collect();
//! assert_eq!(ids, ["header-grammar", "invalid-type"]);
//!
//! // The breaking marker is honored even in a malformed header.
//! assert!(report.message().breaking());
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod footer;
mod header;
mod lines;
mod message;
mod report;
mod rules;
mod scan;

pub use config::Config;
pub use engine::Linter;
pub use error::{Error, ErrorKind};
pub use header::{HeaderFailure, HeaderFailureKind, ParsedHeader, PartialHeader};
pub use message::{CommitMessage, Footer, FooterSeparator, FooterToken, Scope, Type};
pub use report::{LintResult, Position, Severity, Violation};
pub use rules::{HeaderMaxLength, Rule, RuleSet, ScopeFormat, ScopeRequired, TypeEnum};

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
