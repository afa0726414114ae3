//! The rule capability and the built-in rules.
//!
//! Rules are plugged in by explicit registration: the caller builds a
//! [`RuleSet`] and hands it to [`Linter::with_rules`][crate::Linter]. There
//! is no global registry.

use std::fmt;

use indexmap::IndexMap;

use crate::config::Config;
use crate::message::CommitMessage;
use crate::report::{Position, Violation};

/// An independent check producing zero or more violations.
///
/// Rules are stateless and shared read-only across invocations; the
/// `Send + Sync` bound lets callers lint batches of messages from parallel
/// workers. Rules read their options from the [`Config`] they are handed and
/// should do nothing when their option is unset.
pub trait Rule: Send + Sync {
    /// Evaluate the rule against one parsed message.
    fn evaluate(&self, message: &CommitMessage<'_>, config: &Config) -> Vec<Violation>;
}

/// An insertion-ordered mapping of rule id to rule.
///
/// Evaluation follows insertion order, which makes violation output
/// deterministic; it does not affect which violations are produced.
pub struct RuleSet {
    rules: IndexMap<String, Box<dyn Rule>>,
}

impl RuleSet {
    /// A set with no rules at all, as a base for fully custom sets.
    pub fn empty() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// The built-in rules, in their canonical order.
    pub fn builtin() -> Self {
        let mut rules = Self::empty();
        rules.insert(TypeEnum::ID, TypeEnum);
        rules.insert(HeaderMaxLength::ID, HeaderMaxLength);
        rules.insert(ScopeRequired::ID, ScopeRequired);
        rules.insert(ScopeFormat::ID, ScopeFormat);
        rules
    }

    /// Register a rule under an id, replacing any rule with the same id.
    pub fn insert(&mut self, id: impl Into<String>, rule: impl Rule + 'static) {
        self.rules.insert(id.into(), Box::new(rule));
    }

    /// The number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &dyn Rule)> {
        self.rules
            .iter()
            .map(|(id, rule)| (id.as_str(), rule.as_ref()))
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules.keys()).finish()
    }
}

/// Restricts the commit type to the configured `allowed_types` set.
///
/// Runs on the recovered type fragment even when the header as a whole is
/// malformed, so a bad type and a grammar problem are both reported in one
/// pass.
pub struct TypeEnum;

impl TypeEnum {
    /// The id this rule is registered under by default.
    pub const ID: &'static str = "invalid-type";
}

impl Rule for TypeEnum {
    fn evaluate(&self, message: &CommitMessage<'_>, config: &Config) -> Vec<Violation> {
        let Some(allowed) = &config.allowed_types else {
            return Vec::new();
        };
        let Some(ty) = message.type_() else {
            return Vec::new();
        };
        if allowed.iter().any(|candidate| ty == candidate.as_str()) {
            return Vec::new();
        }

        let expected = allowed
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        vec![Violation::error(
            Self::ID,
            Position::Header,
            format!("type `{ty}` is not allowed (expected one of: {expected})"),
        )]
    }
}

/// Flags headers longer than the configured `max_header_length`.
pub struct HeaderMaxLength;

impl HeaderMaxLength {
    /// The id this rule is registered under by default.
    pub const ID: &'static str = "header-max-length";
}

impl Rule for HeaderMaxLength {
    fn evaluate(&self, message: &CommitMessage<'_>, config: &Config) -> Vec<Violation> {
        let Some(limit) = config.max_header_length else {
            return Vec::new();
        };
        let length = message.header().chars().count();
        if length <= limit {
            return Vec::new();
        }

        vec![Violation::error(
            Self::ID,
            Position::Header,
            format!("header is {length} characters, limit is {limit}"),
        )]
    }
}

/// Errors when `require_scope` is set and the header carries no scope.
pub struct ScopeRequired;

impl ScopeRequired {
    /// The id this rule is registered under by default.
    pub const ID: &'static str = "scope-required";
}

impl Rule for ScopeRequired {
    fn evaluate(&self, message: &CommitMessage<'_>, config: &Config) -> Vec<Violation> {
        if !config.require_scope || message.scope().is_some() {
            return Vec::new();
        }

        vec![Violation::error(
            Self::ID,
            Position::Header,
            "a scope is required but none was given",
        )]
    }
}

/// Warns when a scope contains whitespace.
pub struct ScopeFormat;

impl ScopeFormat {
    /// The id this rule is registered under by default.
    pub const ID: &'static str = "scope-format";
}

impl Rule for ScopeFormat {
    fn evaluate(&self, message: &CommitMessage<'_>, _config: &Config) -> Vec<Violation> {
        let Some(scope) = message.scope() else {
            return Vec::new();
        };
        if !scope.as_str().chars().any(char::is_whitespace) {
            return Vec::new();
        }

        vec![Violation::warning(
            Self::ID,
            Position::Header,
            format!("scope `{scope}` contains whitespace"),
        )]
    }
}
