//! The rule engine: collect-all evaluation with per-rule fault isolation.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::config::Config;
use crate::message::CommitMessage;
use crate::report::{aggregate, LintResult, Position, Violation};
use crate::rules::RuleSet;
use crate::Error;

/// The lint entry point: a validated configuration plus a rule set.
///
/// One `Linter` is safe to share across threads and reuse for any number of
/// messages.
#[derive(Debug)]
pub struct Linter {
    rules: RuleSet,
    config: Config,
}

impl Linter {
    /// A linter with the built-in rules.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is invalid; nothing is
    /// evaluated against an invalid configuration.
    pub fn new(config: Config) -> Result<Self, Error> {
        Self::with_rules(config, RuleSet::default())
    }

    /// A linter with a caller-assembled rule set.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is invalid.
    pub fn with_rules(config: Config, rules: RuleSet) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { rules, config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The registered rules.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Lint one commit message.
    ///
    /// Every enabled rule runs even after earlier rules report errors, so the
    /// report enumerates everything wrong with the message in one pass.
    pub fn lint<'a>(&self, raw: &'a str) -> LintResult<'a> {
        let message = CommitMessage::parse(raw);
        let violations = evaluate(&message, &self.rules, &self.config);
        aggregate(message, violations)
    }
}

/// Run parse-level diagnostics and every enabled rule, in order, without
/// short-circuiting. A panicking rule is converted into an error violation
/// instead of aborting its siblings.
pub(crate) fn evaluate(
    message: &CommitMessage<'_>,
    rules: &RuleSet,
    config: &Config,
) -> Vec<Violation> {
    let mut violations: Vec<Violation> = message
        .diagnostics()
        .iter()
        .filter(|violation| config.is_enabled(violation.rule_id()))
        .cloned()
        .collect();

    for (id, rule) in rules.iter() {
        if !config.is_enabled(id) {
            continue;
        }
        // Rules are stateless, so observing one mid-panic is not a concern.
        match catch_unwind(AssertUnwindSafe(|| rule.evaluate(message, config))) {
            Ok(found) => violations.extend(found),
            Err(_) => violations.push(Violation::error(
                format!("{id}-internal-error"),
                Position::Header,
                format!("rule `{id}` panicked during evaluation"),
            )),
        }
    }

    violations
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::report::Severity;
    use crate::rules::Rule;
    use indoc::indoc;

    #[test]
    fn test_scoped_commit_is_valid() {
        let linter = Linter::new(Config::default()).unwrap();
        let result = linter.lint("feat(parser): add support for scoped commits");

        assert!(result.is_valid());
        assert!(result.violations().is_empty());
        let message = result.message();
        assert_eq!(message.type_().unwrap(), "feat");
        assert_eq!(message.scope().unwrap(), "parser");
        assert!(!message.breaking());
        assert_eq!(
            message.description(),
            Some("add support for scoped commits")
        );
    }

    #[test]
    fn test_bang_marks_breaking() {
        let linter = Linter::new(Config::default()).unwrap();
        let result = linter.lint("fix!: drop legacy API");

        assert!(result.is_valid());
        assert!(result.violations().is_empty());
        assert!(result.message().breaking());
    }

    #[test]
    fn test_missing_colon_is_one_grammar_error() {
        let linter = Linter::new(Config::default()).unwrap();
        let result = linter.lint("update stuff");

        assert!(!result.is_valid());
        assert_eq!(result.violations().len(), 1);
        assert_eq!(result.violations()[0].rule_id(), "header-grammar");
        assert_eq!(result.violations()[0].severity(), Severity::Error);
    }

    #[test]
    fn test_empty_description_is_one_error() {
        let linter = Linter::new(Config::default()).unwrap();
        let result = linter.lint("chore: ");

        assert!(!result.is_valid());
        assert_eq!(result.violations().len(), 1);
        assert_eq!(result.violations()[0].rule_id(), "empty-description");
    }

    #[test]
    fn test_type_outside_enum_is_one_error() {
        let config = Config {
            allowed_types: Some(["feat".to_owned(), "fix".to_owned()].into()),
            ..Default::default()
        };
        let linter = Linter::new(config).unwrap();
        let result = linter.lint("docs: update readme");

        assert!(!result.is_valid());
        assert_eq!(result.violations().len(), 1);
        assert_eq!(result.violations()[0].rule_id(), "invalid-type");
    }

    #[test]
    fn test_breaking_change_footer_marks_breaking() {
        let linter = Linter::new(Config::default()).unwrap();
        let result = linter.lint(indoc!(
            "feat: add endpoint

            BREAKING CHANGE: removes old endpoint"
        ));

        assert!(result.is_valid());
        assert!(result.message().breaking());
        assert_eq!(
            result.message().breaking_description(),
            Some("removes old endpoint")
        );
    }

    #[test]
    fn test_collect_all_never_short_circuits() {
        let config = Config {
            allowed_types: Some(["feat".to_owned()].into()),
            max_header_length: Some(10),
            ..Default::default()
        };
        let linter = Linter::new(config).unwrap();
        let result = linter.lint("docs: update the readme with fresh examples");

        let ids: Vec<_> = result
            .violations()
            .iter()
            .map(|violation| violation.rule_id())
            .collect();
        assert_eq!(ids, vec!["header-max-length", "invalid-type"]);
    }

    #[test]
    fn test_disabled_rules_are_skipped() {
        let config = Config {
            allowed_types: Some(["feat".to_owned()].into()),
            disabled_rules: ["invalid-type".to_owned()].into(),
            ..Default::default()
        };
        let linter = Linter::new(config).unwrap();
        let result = linter.lint("docs: update readme");

        assert!(result.is_valid());
    }

    #[test]
    fn test_disabled_parse_diagnostics_are_skipped() {
        let config = Config {
            disabled_rules: ["header-grammar".to_owned()].into(),
            ..Default::default()
        };
        let linter = Linter::new(config).unwrap();
        let result = linter.lint("update stuff");

        assert!(result.is_valid());
    }

    #[test]
    fn test_panicking_rule_is_isolated() {
        struct Panicky;
        impl Rule for Panicky {
            fn evaluate(&self, _: &CommitMessage<'_>, _: &Config) -> Vec<Violation> {
                panic!("boom")
            }
        }
        struct AlwaysWarn;
        impl Rule for AlwaysWarn {
            fn evaluate(&self, _: &CommitMessage<'_>, _: &Config) -> Vec<Violation> {
                vec![Violation::warning("always-warn", Position::Body, "hello")]
            }
        }

        let mut rules = RuleSet::empty();
        rules.insert("panicky", Panicky);
        rules.insert("always-warn", AlwaysWarn);
        let linter = Linter::with_rules(Config::default(), rules).unwrap();
        let result = linter.lint("feat: ok");

        let ids: Vec<_> = result
            .violations()
            .iter()
            .map(|violation| violation.rule_id())
            .collect();
        assert_eq!(ids, vec!["panicky-internal-error", "always-warn"]);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_invalid_config_is_fatal_up_front() {
        let config = Config {
            max_header_length: Some(0),
            ..Default::default()
        };
        assert!(Linter::new(config).is_err());
    }

    #[test]
    fn test_clean_message_with_everything() {
        let config = Config {
            allowed_types: Some(["feat".to_owned(), "fix".to_owned()].into()),
            max_header_length: Some(72),
            require_scope: true,
            ..Default::default()
        };
        let linter = Linter::new(config).unwrap();
        let result = linter.lint(indoc!(
            "feat(api)!: replace the v1 endpoint

            The v1 endpoint has been deprecated for two releases.

            BREAKING CHANGE: clients must migrate to /v2
            Closes #42"
        ));

        assert!(result.is_valid(), "{:?}", result.violations());
        assert!(result.message().breaking());
        assert_eq!(result.message().footers().len(), 2);
    }
}
