//! Lint configuration.

use std::collections::BTreeSet;

use crate::message::Type;
use crate::{Error, ErrorKind};

/// Options recognized by the built-in rules.
///
/// Every option defaults to "off"; a default `Config` accepts any message
/// that conforms to the conventional commit grammar. How a configuration is
/// stored (TOML, JSON, hard-coded) is the caller's concern; with the `serde`
/// feature this type derives `Deserialize` so a config file maps directly
/// onto it.
///
/// ```rust
/// let config = conventional_lint::Config {
///     allowed_types: Some(["feat".to_owned(), "fix".to_owned()].into()),
///     max_header_length: Some(72),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Restrict the commit type to this set. `None` accepts any type.
    pub allowed_types: Option<BTreeSet<String>>,

    /// Flag headers longer than this many characters.
    pub max_header_length: Option<usize>,

    /// Require a scope on every commit.
    pub require_scope: bool,

    /// Rule ids to skip, including parse-level ids such as `header-grammar`.
    pub disabled_rules: BTreeSet<String>,
}

impl Config {
    /// Check the configuration for values that would make every lint result
    /// meaningless.
    ///
    /// This is the only fatal path in the crate; it runs before any rule is
    /// evaluated.
    ///
    /// # Errors
    ///
    /// Returns an error when `max_header_length` is zero, `allowed_types` is
    /// an empty set, or an `allowed_types` entry is not a valid type token.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_header_length == Some(0) {
            return Err(Error::new(ErrorKind::ZeroMaxHeaderLength));
        }
        if let Some(types) = &self.allowed_types {
            if types.is_empty() {
                return Err(Error::new(ErrorKind::EmptyTypeEnum));
            }
            for ty in types {
                Type::parse(ty)?;
            }
        }
        Ok(())
    }

    pub(crate) fn is_enabled(&self, rule_id: &str) -> bool {
        !self.disabled_rules.contains(rule_id)
    }
}
