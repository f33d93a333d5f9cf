//! Argument registry and the argv scanner.
//!
//! Token grammar (shown with the default `-` prefix):
//! - `--name` / `--name=value`: long form, matched against declared names
//! - `-xyz` / `-xyz=value`: bundled short symbols; every keyword symbol in the
//!   bundle receives the same trailing value
//! - `name` / `name=value`: bare token, matched against declared names
//!
//! Tokens that match nothing are dropped unless the registry is strict.
//! There is no `--` end-of-options marker and no abbreviation matching.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::RegistryConfig;
use crate::error::{ConfigError, ParseError, ParseResult};

/// Value stored for a flag that was seen on the command line.
pub const FLAG_SET: &str = "true";

const HELP_NAME: &str = "help";
const HELP_SYMBOL: char = 'h';
const HELP_TEXT: &str = "Shows this help menu";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArgKind {
    /// Boolean presence switch.
    Flag,
    /// Named argument carrying one value.
    Keyword,
    /// Argument addressed by its bare name.
    Positional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Unset,
    /// Named on the command line without `=value`.
    Bare,
    One(String),
    Many(Vec<String>),
    /// Filled from a default after scanning.
    Defaulted(String),
}

impl Slot {
    fn first(&self) -> Option<&str> {
        match self {
            Self::One(v) | Self::Defaulted(v) => Some(v),
            Self::Many(vs) => vs.first().map(String::as_str),
            Self::Unset | Self::Bare => None,
        }
    }
}

/// One declared argument and its parsed state.
#[derive(Debug, Clone)]
pub struct ArgumentSpec {
    name: String,
    symbol: Option<char>,
    kind: ArgKind,
    required: bool,
    arity: usize,
    default_value: Option<String>,
    help: Option<String>,
    slot: Slot,
}

impl ArgumentSpec {
    fn new(name: &str, symbol: Option<char>, kind: ArgKind, help: &str) -> Self {
        Self {
            name: name.to_string(),
            // NUL means "no short form".
            symbol: symbol.filter(|c| *c != '\0'),
            kind,
            required: false,
            arity: 1,
            default_value: None,
            help: (!help.is_empty()).then(|| help.to_string()),
            slot: Slot::Unset,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> Option<char> {
        self.symbol
    }

    pub fn kind(&self) -> ArgKind {
        self.kind
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Current value, without falling back to any default.
    pub fn value(&self) -> Option<&str> {
        self.slot.first()
    }

    /// Whether the argument was named on the command line.
    pub fn is_present(&self) -> bool {
        matches!(self.slot, Slot::Bare | Slot::One(_) | Slot::Many(_))
    }

    fn set_flag(&mut self) {
        self.slot = Slot::One(FLAG_SET.to_string());
    }

    fn store(&mut self, value: Option<&str>, collect: bool) -> ParseResult<()> {
        let collecting = collect && self.kind == ArgKind::Positional && self.arity > 1;
        let Some(value) = value else {
            if !collecting || self.slot == Slot::Unset {
                self.slot = Slot::Bare;
            }
            return Ok(());
        };

        if !collecting {
            self.slot = Slot::One(value.to_string());
            return Ok(());
        }

        if let Slot::Many(values) = &mut self.slot {
            if values.len() >= self.arity {
                return Err(ParseError::TooManyValues {
                    name: self.name.clone(),
                    arity: self.arity,
                });
            }
            values.push(value.to_string());
        } else {
            self.slot = Slot::Many(vec![value.to_string()]);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Long { name: &'a str, value: Option<&'a str> },
    Short { symbols: &'a str, value: Option<&'a str> },
    Bare { name: &'a str, value: Option<&'a str> },
}

fn split_value(raw: &str) -> (&str, Option<&str>) {
    match raw.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (raw, None),
    }
}

fn classify(prefix: char, raw: &str) -> Token<'_> {
    match raw.strip_prefix(prefix) {
        Some(rest) => match rest.strip_prefix(prefix) {
            Some(long) => {
                let (name, value) = split_value(long);
                Token::Long { name, value }
            }
            None => {
                let (symbols, value) = split_value(rest);
                Token::Short { symbols, value }
            }
        },
        None => {
            let (name, value) = split_value(raw);
            Token::Bare { name, value }
        }
    }
}

/// Declared arguments plus parser settings.
///
/// Lifecycle: create, declare arguments, [`parse`](Self::parse) once, read
/// values. Everything is released when the registry is dropped.
#[derive(Debug, Clone)]
pub struct Registry {
    config: RegistryConfig,
    specs: IndexMap<String, ArgumentSpec>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl Registry {
    pub fn new(config: RegistryConfig) -> Self {
        let mut specs = IndexMap::new();
        if config.auto_help {
            let symbol = Some(HELP_SYMBOL).filter(|&s| s != config.prefix_character);
            specs.insert(
                HELP_NAME.to_string(),
                ArgumentSpec::new(HELP_NAME, symbol, ArgKind::Flag, HELP_TEXT),
            );
        }
        Self { config, specs }
    }

    /// Registry with the four display strings and every other option defaulted.
    pub fn create(
        program: impl Into<String>,
        usage: impl Into<String>,
        description: impl Into<String>,
        epilog: impl Into<String>,
    ) -> Self {
        Self::new(
            RegistryConfig::new(program)
                .usage(usage)
                .description(description)
                .epilog(epilog),
        )
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Declared arguments in registration order.
    pub fn specs(&self) -> impl Iterator<Item = &ArgumentSpec> {
        self.specs.values()
    }

    pub fn spec(&self, name: &str) -> Option<&ArgumentSpec> {
        self.specs.get(name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn add_flag(
        &mut self,
        symbol: impl Into<Option<char>>,
        name: &str,
        help: &str,
    ) -> Result<(), ConfigError> {
        self.register(ArgumentSpec::new(name, symbol.into(), ArgKind::Flag, help))
    }

    pub fn add_keyword(
        &mut self,
        symbol: impl Into<Option<char>>,
        name: &str,
        required: bool,
        default_value: Option<&str>,
        help: &str,
    ) -> Result<(), ConfigError> {
        let mut spec = ArgumentSpec::new(name, symbol.into(), ArgKind::Keyword, help);
        spec.required = required;
        spec.default_value = default_value.map(str::to_string);
        self.register(spec)
    }

    /// Declare a positional argument.
    ///
    /// `arity` is recorded as-is; only one value is kept per argument unless
    /// the registry collects multiple values. The symbol is stored but never
    /// matched: positionals are addressed by name only.
    pub fn add_positional(
        &mut self,
        symbol: impl Into<Option<char>>,
        name: &str,
        required: bool,
        arity: usize,
        default_value: Option<&str>,
        help: &str,
    ) -> Result<(), ConfigError> {
        if arity == 0 {
            return Err(ConfigError::ZeroArity {
                name: name.to_string(),
            });
        }
        let mut spec = ArgumentSpec::new(name, symbol.into(), ArgKind::Positional, help);
        spec.required = required;
        spec.arity = arity;
        spec.default_value = default_value.map(str::to_string);
        self.register(spec)
    }

    fn register(&mut self, spec: ArgumentSpec) -> Result<(), ConfigError> {
        if spec.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.specs.contains_key(&spec.name) {
            return Err(ConfigError::DuplicateName { name: spec.name });
        }
        if let Some(symbol) = spec.symbol {
            if symbol == '=' || symbol == self.config.prefix_character {
                return Err(ConfigError::InvalidSymbol { symbol });
            }
        }
        // Positional symbols are never resolved, so only flags and keywords
        // compete for a short form.
        if let Some(symbol) = spec.symbol.filter(|_| spec.kind != ArgKind::Positional) {
            if let Some(existing) = self
                .specs
                .values()
                .find(|s| s.kind != ArgKind::Positional && s.symbol == Some(symbol))
            {
                return Err(ConfigError::DuplicateSymbol {
                    symbol,
                    existing: existing.name.clone(),
                });
            }
        }
        trace!(name = %spec.name, kind = ?spec.kind, "registered argument");
        self.specs.insert(spec.name.clone(), spec);
        Ok(())
    }

    /// Scan `argv` (index 0 is the program name and is skipped), then check
    /// required arguments and fill defaults.
    ///
    /// Never terminates the process; see [`parse_or_exit`](Self::parse_or_exit).
    pub fn parse<I, S>(&mut self, argv: I) -> ParseResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefix = self.config.prefix_character;
        let mut scanned = 0usize;
        for raw in argv.into_iter().skip(1) {
            let raw = raw.as_ref();
            scanned += 1;
            let token = classify(prefix, raw);
            trace!(raw, ?token, "classified token");
            match token {
                Token::Long { name, value } | Token::Bare { name, value } => {
                    if !self.assign_by_name(name, value)? {
                        self.unmatched(raw)?;
                    }
                }
                Token::Short { symbols, value } => {
                    if symbols.is_empty() {
                        self.unmatched(raw)?;
                    }
                    for symbol in symbols.chars() {
                        if !self.assign_by_symbol(symbol, value)? {
                            self.unmatched(&format!("{prefix}{symbol}"))?;
                        }
                    }
                }
            }
        }
        debug!(tokens = scanned, specs = self.specs.len(), "scanned arguments");

        self.resolve()
    }

    /// Like [`parse`](Self::parse), but when `exit_on_error` is set a failure
    /// is printed to stderr and the process exits with status 1.
    pub fn parse_or_exit<I, S>(&mut self, argv: I) -> ParseResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.parse(argv) {
            Err(err) if self.config.exit_on_error => {
                eprintln!("{err}");
                std::process::exit(1);
            }
            other => other,
        }
    }

    /// [`parse_or_exit`](Self::parse_or_exit) over the current process arguments.
    pub fn parse_env(&mut self) -> ParseResult<()> {
        let argv: Vec<String> = std::env::args_os()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        self.parse_or_exit(argv)
    }

    fn assign_by_name(&mut self, name: &str, value: Option<&str>) -> ParseResult<bool> {
        let collect = self.config.collect_multiple;
        let Some(spec) = self.specs.get_mut(name) else {
            return Ok(false);
        };
        match spec.kind {
            ArgKind::Flag => spec.set_flag(),
            ArgKind::Keyword | ArgKind::Positional => spec.store(value, collect)?,
        }
        trace!(name, ?value, "assigned by name");
        Ok(true)
    }

    fn assign_by_symbol(&mut self, symbol: char, value: Option<&str>) -> ParseResult<bool> {
        let collect = self.config.collect_multiple;
        // Short symbols only address flags and keywords.
        let Some(spec) = self.specs.values_mut().find(|s| {
            s.symbol == Some(symbol) && matches!(s.kind, ArgKind::Flag | ArgKind::Keyword)
        }) else {
            return Ok(false);
        };
        match spec.kind {
            ArgKind::Flag => spec.set_flag(),
            _ => spec.store(value, collect)?,
        }
        trace!(%symbol, name = %spec.name, ?value, "assigned by symbol");
        Ok(true)
    }

    fn unmatched(&self, token: &str) -> ParseResult<()> {
        if self.config.strict {
            return Err(ParseError::UnknownArgument {
                token: token.to_string(),
            });
        }
        debug!(token, "ignoring unmatched argument");
        Ok(())
    }

    fn resolve(&mut self) -> ParseResult<()> {
        if let Some(missing) = self
            .specs
            .values()
            .find(|s| s.required && s.slot == Slot::Unset)
        {
            return Err(ParseError::MissingRequired {
                name: missing.name.clone(),
            });
        }

        let fallback = self.config.argument_default.clone();
        for spec in self.specs.values_mut() {
            if spec.slot != Slot::Unset || spec.kind == ArgKind::Flag {
                continue;
            }
            if let Some(value) = spec.default_value.clone().or_else(|| fallback.clone()) {
                debug!(name = %spec.name, %value, "applying default");
                spec.slot = Slot::Defaulted(value);
            }
        }
        Ok(())
    }

    fn lookup(&self, name: &str, kind: ArgKind) -> Option<&ArgumentSpec> {
        self.specs.get(name).filter(|s| s.kind == kind)
    }

    fn default_for<'s>(&'s self, spec: &'s ArgumentSpec) -> Option<&'s str> {
        spec.default_value
            .as_deref()
            .or(self.config.argument_default.as_deref())
    }

    fn value_of<'s>(&'s self, spec: &'s ArgumentSpec) -> Option<&'s str> {
        match spec.slot {
            Slot::Unset => self.default_for(spec),
            _ => spec.slot.first(),
        }
    }

    /// Value of a positional argument. `None` if no positional has this name.
    pub fn get_argument_value(&self, name: &str) -> Option<&str> {
        self.lookup(name, ArgKind::Positional)
            .and_then(|spec| self.value_of(spec))
    }

    /// Every value collected for a positional argument, in order.
    pub fn get_argument_values(&self, name: &str) -> Option<Vec<&str>> {
        let spec = self.lookup(name, ArgKind::Positional)?;
        let values: Vec<&str> = match &spec.slot {
            Slot::Many(values) => values.iter().map(String::as_str).collect(),
            Slot::Bare => Vec::new(),
            _ => self.value_of(spec).into_iter().collect(),
        };
        Some(values)
    }

    /// Value of a keyword argument. `None` if no keyword has this name.
    pub fn get_keyword_value(&self, name: &str) -> Option<&str> {
        self.lookup(name, ArgKind::Keyword)
            .and_then(|spec| self.value_of(spec))
    }

    /// Whether a flag was set. `false` if no flag has this name.
    pub fn get_flag_value(&self, name: &str) -> bool {
        self.lookup(name, ArgKind::Flag)
            .is_some_and(|spec| spec.slot != Slot::Unset)
    }

    /// Whether an argument of any kind was named on the command line.
    pub fn is_present(&self, name: &str) -> bool {
        self.specs.get(name).is_some_and(ArgumentSpec::is_present)
    }
}
