//! Declarative registry description, loadable from JSON.
//!
//! ```json
//! {
//!   "config": { "program": "tool", "exit-on-error": false },
//!   "args": [
//!     { "name": "verbose", "symbol": "v", "kind": "flag", "help": "Chatty output" },
//!     { "name": "count", "symbol": "c", "kind": "keyword", "default-value": "1" },
//!     { "name": "output", "kind": "positional", "required": true }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::config::RegistryConfig;
use crate::error::{ConfigError, SchemaError};
use crate::registry::{ArgKind, Registry};

fn default_arity() -> usize {
    1
}

fn is_one(n: &usize) -> bool {
    *n == 1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArgSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<char>,
    pub kind: ArgKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_arity", skip_serializing_if = "is_one")]
    pub arity: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegistrySchema {
    #[serde(default)]
    pub config: RegistryConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgSchema>,
}

impl RegistrySchema {
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Snapshot of a registry's declarations (parsed values are not included).
    pub fn from_registry(registry: &Registry) -> Self {
        let args = registry
            .specs()
            .filter(|spec| !(registry.config().auto_help && spec.name() == "help"))
            .map(|spec| ArgSchema {
                name: spec.name().to_string(),
                symbol: spec.symbol(),
                kind: spec.kind(),
                required: spec.required(),
                arity: spec.arity(),
                default_value: spec.default_value().map(str::to_string),
                help: spec.help().unwrap_or_default().to_string(),
            })
            .collect();
        Self {
            config: registry.config().clone(),
            args,
        }
    }
}

impl ArgSchema {
    /// Name of a field that is set but has no meaning for this kind.
    fn unused_field(&self) -> Option<&'static str> {
        match self.kind {
            ArgKind::Flag if self.required => Some("required"),
            ArgKind::Flag if self.default_value.is_some() => Some("default-value"),
            ArgKind::Flag | ArgKind::Keyword if self.arity != 1 => Some("arity"),
            _ => None,
        }
    }
}

impl Registry {
    pub fn from_schema(schema: &RegistrySchema) -> Result<Self, ConfigError> {
        let mut registry = Registry::new(schema.config.clone());
        for arg in &schema.args {
            if let Some(field) = arg.unused_field() {
                return Err(ConfigError::UnusedField {
                    name: arg.name.clone(),
                    field,
                });
            }
            let default_value = arg.default_value.as_deref();
            match arg.kind {
                ArgKind::Flag => registry.add_flag(arg.symbol, &arg.name, &arg.help)?,
                ArgKind::Keyword => registry.add_keyword(
                    arg.symbol,
                    &arg.name,
                    arg.required,
                    default_value,
                    &arg.help,
                )?,
                ArgKind::Positional => registry.add_positional(
                    arg.symbol,
                    &arg.name,
                    arg.required,
                    arg.arity,
                    default_value,
                    &arg.help,
                )?,
            }
        }
        Ok(registry)
    }

    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        let schema = RegistrySchema::from_json(text)?;
        Ok(Self::from_schema(&schema)?)
    }
}
