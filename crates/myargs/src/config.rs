//! Construction-time options for a [`Registry`](crate::Registry).

use serde::{Deserialize, Serialize};

pub const DEFAULT_PREFIX: char = '-';

/// Parser-wide settings.
///
/// Every field has a default, so a partially filled JSON object (or
/// `RegistryConfig::new("prog")` followed by a few builder calls) is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RegistryConfig {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub program: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub usage: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub epilog: String,
    pub prefix_character: char,
    /// Register a `help` / `h` flag when the registry is created.
    pub auto_help: bool,
    /// Accepted for compatibility; parsing never abbreviates names.
    pub allow_abbreviation: bool,
    /// Whether [`Registry::parse_or_exit`](crate::Registry::parse_or_exit)
    /// terminates the process on a failed parse.
    pub exit_on_error: bool,
    /// Fallback for keyword and positional arguments declared without a default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argument_default: Option<String>,
    /// Report tokens that match no declared argument instead of dropping them.
    pub strict: bool,
    /// Let positionals with arity > 1 collect one value per assignment.
    pub collect_multiple: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            program: String::new(),
            usage: String::new(),
            description: String::new(),
            epilog: String::new(),
            prefix_character: DEFAULT_PREFIX,
            auto_help: true,
            allow_abbreviation: true,
            exit_on_error: true,
            argument_default: None,
            strict: false,
            collect_multiple: false,
        }
    }
}

impl RegistryConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn epilog(mut self, epilog: impl Into<String>) -> Self {
        self.epilog = epilog.into();
        self
    }

    pub fn prefix_character(mut self, prefix: char) -> Self {
        self.prefix_character = prefix;
        self
    }

    pub fn auto_help(mut self, enabled: bool) -> Self {
        self.auto_help = enabled;
        self
    }

    pub fn allow_abbreviation(mut self, enabled: bool) -> Self {
        self.allow_abbreviation = enabled;
        self
    }

    pub fn exit_on_error(mut self, enabled: bool) -> Self {
        self.exit_on_error = enabled;
        self
    }

    pub fn argument_default(mut self, value: impl Into<String>) -> Self {
        self.argument_default = Some(value.into());
        self
    }

    pub fn strict(mut self, enabled: bool) -> Self {
        self.strict = enabled;
        self
    }

    pub fn collect_multiple(mut self, enabled: bool) -> Self {
        self.collect_multiple = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_parser() {
        let config = RegistryConfig::default();
        assert_eq!(config.prefix_character, '-');
        assert!(config.auto_help);
        assert!(config.allow_abbreviation);
        assert!(config.exit_on_error);
        assert!(!config.strict);
        assert!(!config.collect_multiple);
        assert_eq!(config.argument_default, None);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: RegistryConfig =
            serde_json::from_str(r#"{"program": "tool", "exit-on-error": false}"#).unwrap();
        assert_eq!(config.program, "tool");
        assert!(!config.exit_on_error);
        assert!(config.auto_help);
        assert_eq!(config.prefix_character, '-');
    }

    #[test]
    fn builder_sets_every_option() {
        let config = RegistryConfig::new("tool")
            .usage("tool [options]")
            .description("does things")
            .epilog("bye")
            .prefix_character('+')
            .auto_help(false)
            .allow_abbreviation(false)
            .exit_on_error(false)
            .argument_default("none")
            .strict(true)
            .collect_multiple(true);
        assert_eq!(config.usage, "tool [options]");
        assert_eq!(config.description, "does things");
        assert_eq!(config.epilog, "bye");
        assert_eq!(config.prefix_character, '+');
        assert!(!config.auto_help);
        assert!(!config.allow_abbreviation);
        assert!(!config.exit_on_error);
        assert_eq!(config.argument_default.as_deref(), Some("none"));
        assert!(config.strict);
        assert!(config.collect_multiple);
    }
}
