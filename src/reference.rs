//! Flattened, consumer-facing view of a parsed template

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::Serialize;

use crate::config::{DuplicateKeys, ParserConfig};
use crate::error::ParseError;
use crate::parser::ast::Slot;
use crate::parser::{parse_with_config, Parameter, TemplateNode, Value};

/// A template's name with its positional and keyword arguments split apart
///
/// Only the top level is flattened: nested templates inside `args` or `kwargs`
/// stay as `Value::Template` nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateReference {
    pub name: Value,
    pub args: Vec<Value>,
    /// Keyed by the rendered key text, so `|1=a` and `|1.0=b` are distinct keys
    pub kwargs: BTreeMap<String, Value>,
}

impl TemplateReference {
    pub fn new(name: Value, args: Vec<Value>, kwargs: BTreeMap<String, Value>) -> Self {
        Self { name, args, kwargs }
    }

    /// Parse markup into a reference with the default configuration
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Self::parse_with_config(text, &ParserConfig::default())
    }

    pub fn parse_with_config(text: &str, config: &ParserConfig) -> Result<Self, ParseError> {
        let parsed = parse_with_config(text, config)?;
        Self::build(parsed, config.duplicate_keys)
    }

    /// Build from a parse result; `None` (no template in the input) is an error
    pub fn build(parsed: Option<TemplateNode>, policy: DuplicateKeys) -> Result<Self, ParseError> {
        let node = parsed.ok_or(ParseError::NoTemplateFound)?;
        Self::from_node(node, policy)
    }

    /// Split a node's parameters into `args` and `kwargs`
    ///
    /// Keys are rendered to text, so `|1=a` lands under `"1"`.
    pub fn from_node(node: TemplateNode, policy: DuplicateKeys) -> Result<Self, ParseError> {
        let mut args = Vec::new();
        let mut kwargs = BTreeMap::new();

        for param in node.parameters {
            match param {
                Parameter::Positional { value } => args.push(value),
                Parameter::Keyword { key, value } => {
                    let key = key.to_string();
                    if kwargs.contains_key(&key) {
                        match policy {
                            DuplicateKeys::LastWins => {}
                            DuplicateKeys::FirstWins => continue,
                            DuplicateKeys::Reject => return Err(ParseError::DuplicateKey { key }),
                        }
                    }
                    kwargs.insert(key, value);
                }
            }
        }

        debug!(
            "built reference '{}': {} args, {} kwargs",
            node.name,
            args.len(),
            kwargs.len()
        );
        Ok(Self::new(node.name, args, kwargs))
    }

    pub fn name_str(&self) -> Option<&str> {
        self.name.as_str()
    }

    /// Positional argument by zero-based index
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    pub fn kwarg(&self, key: &str) -> Option<&Value> {
        self.kwargs.get(key)
    }
}

impl FromStr for TemplateReference {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<TemplateNode> for TemplateReference {
    type Error = ParseError;

    fn try_from(node: TemplateNode) -> Result<Self, Self::Error> {
        Self::from_node(node, DuplicateKeys::default())
    }
}

impl fmt::Display for TemplateReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{}", Slot(&self.name))?;
        for arg in &self.args {
            write!(f, "|{}", arg)?;
        }
        for (key, value) in &self.kwargs {
            let key = if key.is_empty() { " " } else { key.as_str() };
            write!(f, "|{}={}", key, Slot(value))?;
        }
        f.write_str("}}")
    }
}
