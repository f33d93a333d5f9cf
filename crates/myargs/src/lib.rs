//! Flag, keyword and positional argument declarations with `argv` parsing,
//! defaults, required-argument checks and help rendering.
//!
//! ```
//! use myargs::Registry;
//!
//! let mut parser = Registry::create(
//!     "my_program",
//!     "my_program [options]",
//!     "This is a sample program.",
//!     "Epilog message",
//! );
//! parser.add_flag('v', "verbose", "Enable verbose mode").unwrap();
//! parser.add_keyword('c', "count", false, Some("1"), "Number of times").unwrap();
//!
//! parser.parse(["my_program", "-v", "--count=5"]).unwrap();
//! assert!(parser.get_flag_value("verbose"));
//! assert_eq!(parser.get_keyword_value("count"), Some("5"));
//! ```

pub mod config;
pub mod error;
pub mod help;
pub mod registry;
pub mod schema;

pub use config::RegistryConfig;
pub use error::{ConfigError, ParseError, ParseResult, SchemaError};
pub use help::{HelpSections, HelpStyle, PlainStyle};
pub use registry::{ArgKind, ArgumentSpec, FLAG_SET, Registry};
pub use schema::{ArgSchema, RegistrySchema};
