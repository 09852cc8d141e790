//! Wiki Templates - structured data from `{{name|arg|key=value}}` markup
//!
//! Template markup is lexed into tokens, parsed into a nested [`TemplateNode`]
//! tree, and flattened into a [`TemplateReference`] holding the name, the
//! positional `args` and the keyword `kwargs`.
//!
//! # Example
//!
//! ```rust
//! use wiki_templates::{parse_reference, Value};
//!
//! let cite = parse_reference("{{cite web|url=http://x|accessdate=2011|U.S. Census}}").unwrap();
//! assert_eq!(cite.name_str(), Some("cite web"));
//! assert_eq!(cite.args, vec![Value::from("U.S. Census")]);
//! assert_eq!(cite.kwarg("accessdate"), Some(&Value::from(2011i64)));
//! ```

pub mod config;
pub mod error;
pub mod parser;
pub mod reference;

pub use config::{ConfigError, DuplicateKeys, ParserConfig};
pub use error::ParseError;
pub use parser::{parse, parse_with_config, Atom, Parameter, TemplateNode, Value};
pub use reference::TemplateReference;

/// Parse template markup into a reference with default configuration
///
/// This is the main entry point of the library.
///
/// # Example
///
/// ```rust
/// use wiki_templates::{parse_reference, ParseError};
///
/// let r = parse_reference("{{t|k=1|k=2}}").unwrap();
/// assert_eq!(r.kwarg("k").and_then(|v| v.as_int()), Some(2));
///
/// assert_eq!(parse_reference("plain text"), Err(ParseError::NoTemplateFound));
/// ```
pub fn parse_reference(text: &str) -> Result<TemplateReference, ParseError> {
    TemplateReference::parse(text)
}

/// Parse template markup into a reference with custom configuration
///
/// # Example
///
/// ```rust
/// use wiki_templates::{parse_reference_with_config, DuplicateKeys, ParserConfig};
///
/// let config = ParserConfig::new().with_duplicate_keys(DuplicateKeys::Reject);
/// let err = parse_reference_with_config("{{t|k=1|k=2}}", &config).unwrap_err();
/// assert_eq!(err.kind(), "DuplicateKey");
/// ```
pub fn parse_reference_with_config(
    text: &str,
    config: &ParserConfig,
) -> Result<TemplateReference, ParseError> {
    TemplateReference::parse_with_config(text, config)
}
