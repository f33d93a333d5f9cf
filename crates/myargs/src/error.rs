use thiserror::Error;

/// Invalid argument declaration, reported at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("argument name must not be empty")]
    EmptyName,

    #[error("argument '{name}' is already registered")]
    DuplicateName { name: String },

    #[error("symbol '-{symbol}' is already used by '{existing}'")]
    DuplicateSymbol { symbol: char, existing: String },

    #[error("symbol '{symbol}' cannot be matched on the command line")]
    InvalidSymbol { symbol: char },

    #[error("argument '{name}' does not use '{field}'")]
    UnusedField { name: String, field: &'static str },

    #[error("positional argument '{name}' must take at least one value")]
    ZeroArity { name: String },
}

/// Failure of a parse session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Missing required argument: {name}")]
    MissingRequired { name: String },

    /// Only produced when the registry is configured as strict.
    #[error("Unknown argument: {token}")]
    UnknownArgument { token: String },

    /// Only produced when multi-value collection is enabled.
    #[error("argument '{name}' takes at most {arity} values")]
    TooManyValues { name: String, arity: usize },
}

impl ParseError {
    /// Name of the argument (or raw token) the error refers to.
    pub fn subject(&self) -> &str {
        match self {
            Self::MissingRequired { name } | Self::TooManyValues { name, .. } => name,
            Self::UnknownArgument { token } => token,
        }
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid argument declaration: {0}")]
    Config(#[from] ConfigError),
}

pub type ParseResult<T> = Result<T, ParseError>;
