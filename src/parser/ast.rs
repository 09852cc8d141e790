//! Tree types produced by the template parser

use std::fmt;

use serde::Serialize;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A scalar literal after type coercion
///
/// Coercion is tried in order: integer, then float, then the trimmed text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Atom {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Atom {
    /// Coerce a raw run of template text into an atom
    ///
    /// Surrounding whitespace is stripped first. Coercion never fails: text that
    /// is not a finite number is kept as a string, so `inf` or `NaN` in a
    /// citation title stay words.
    ///
    /// Digit runs too large for `i64` also stay text rather than losing
    /// precision as a float.
    pub fn coerce(raw: &str) -> Self {
        let text = raw.trim();
        if let Ok(n) = text.parse::<i64>() {
            return Atom::Int(n);
        }
        let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return Atom::Text(text.to_string());
        }
        match text.parse::<f64>() {
            Ok(f) if f.is_finite() => Atom::Float(f),
            _ => Atom::Text(text.to_string()),
        }
    }

    /// The placeholder carried by a parameter that never received a value
    pub fn empty() -> Self {
        Atom::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Atom::Text(s) if s.is_empty())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Atom::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Atom::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view of the atom; integers widen to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Atom::Int(n) => Some(*n as f64),
            Atom::Float(f) => Some(*f),
            Atom::Text(_) => None,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Int(n) => write!(f, "{}", n),
            // Debug keeps the fractional part (`1.0`), so the text re-coerces to a float
            Atom::Float(x) => write!(f, "{:?}", x),
            Atom::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Atom {
    fn from(n: i64) -> Self {
        Atom::Int(n)
    }
}

impl From<f64> for Atom {
    fn from(x: f64) -> Self {
        Atom::Float(x)
    }
}

impl From<&str> for Atom {
    fn from(s: &str) -> Self {
        Atom::Text(s.to_string())
    }
}

impl From<String> for Atom {
    fn from(s: String) -> Self {
        Atom::Text(s)
    }
}

/// A template name or parameter value: either an atom or a nested template
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Atom(Atom),
    Template(Box<TemplateNode>),
}

impl Value {
    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Value::Atom(atom) => Some(atom),
            Value::Template(_) => None,
        }
    }

    pub fn as_template(&self) -> Option<&TemplateNode> {
        match self {
            Value::Template(node) => Some(node),
            Value::Atom(_) => None,
        }
    }

    /// Text of a string atom
    pub fn as_str(&self) -> Option<&str> {
        self.as_atom().and_then(Atom::as_str)
    }

    pub fn as_int(&self) -> Option<i64> {
        self.as_atom().and_then(Atom::as_int)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_atom().and_then(Atom::as_f64)
    }

    pub fn is_template(&self) -> bool {
        matches!(self, Value::Template(_))
    }

    fn is_empty_atom(&self) -> bool {
        matches!(self, Value::Atom(atom) if atom.is_empty())
    }
}

/// Renders a name, key or keyword value so that it keeps its slot on re-parse
///
/// An empty atom is written as a single space: `{{|a}}` or `k=|` would read
/// back as a missing name or a positional entry.
pub(crate) struct Slot<'a>(pub &'a Value);

impl fmt::Display for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty_atom() {
            f.write_str(" ")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Atom(atom) => write!(f, "{}", atom),
            Value::Template(node) => write!(f, "{}", node),
        }
    }
}

impl From<Atom> for Value {
    fn from(atom: Atom) -> Self {
        Value::Atom(atom)
    }
}

impl From<TemplateNode> for Value {
    fn from(node: TemplateNode) -> Self {
        Value::Template(Box::new(node))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Atom(n.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Atom(x.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Atom(s.into())
    }
}

/// One `|`-separated entry of a template
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Parameter {
    /// Unlabelled argument: `|value`
    Positional { value: Value },
    /// Labelled argument: `|key=value`
    Keyword { key: Value, value: Value },
}

impl Parameter {
    pub fn positional(value: impl Into<Value>) -> Self {
        Parameter::Positional {
            value: value.into(),
        }
    }

    pub fn keyword(key: impl Into<Value>, value: impl Into<Value>) -> Self {
        Parameter::Keyword {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            Parameter::Positional { value } | Parameter::Keyword { value, .. } => value,
        }
    }

    pub fn key(&self) -> Option<&Value> {
        match self {
            Parameter::Keyword { key, .. } => Some(key),
            Parameter::Positional { .. } => None,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Positional { value } => write!(f, "{}", value),
            Parameter::Keyword { key, value } => write!(f, "{}={}", Slot(key), Slot(value)),
        }
    }
}

/// Parse result of one `{{...}}` construct
///
/// Parameters keep source order, and repeated keys are all preserved here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateNode {
    pub name: Value,
    pub parameters: Vec<Parameter>,
}

impl TemplateNode {
    pub fn new(name: impl Into<Value>, parameters: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    /// Values of the positional entries, in order
    pub fn positional(&self) -> impl Iterator<Item = &Value> {
        self.parameters.iter().filter_map(|p| match p {
            Parameter::Positional { value } => Some(value),
            Parameter::Keyword { .. } => None,
        })
    }

    /// Key/value pairs of the keyword entries, in order, duplicates included
    pub fn keywords(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.parameters.iter().filter_map(|p| match p {
            Parameter::Keyword { key, value } => Some((key, value)),
            Parameter::Positional { .. } => None,
        })
    }
}

impl fmt::Display for TemplateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{}", Slot(&self.name))?;
        for param in &self.parameters {
            write!(f, "|{}", param)?;
        }
        f.write_str("}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_integer() {
        assert_eq!(Atom::coerce("2011"), Atom::Int(2011));
        assert_eq!(Atom::coerce(" -7 "), Atom::Int(-7));
    }

    #[test]
    fn test_coerce_float() {
        assert_eq!(Atom::coerce("4.5"), Atom::Float(4.5));
        assert_eq!(Atom::coerce("\n46.2"), Atom::Float(46.2));
    }

    #[test]
    fn test_coerce_text_is_trimmed() {
        assert_eq!(
            Atom::coerce(" US Census Bureau\n"),
            Atom::Text("US Census Bureau".to_string())
        );
    }

    #[test]
    fn test_non_finite_stays_text() {
        assert_eq!(Atom::coerce("inf"), Atom::Text("inf".to_string()));
        assert_eq!(Atom::coerce("NaN"), Atom::Text("NaN".to_string()));
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert!(Atom::coerce("  \n ").is_empty());
    }

    #[test]
    fn test_coercion_is_idempotent() {
        for raw in ["2011", "4.5", "1.0", "1e20", "-0.25", "US Census Bureau", "June 7, 2010"] {
            let once = Atom::coerce(raw);
            assert_eq!(Atom::coerce(&once.to_string()), once, "raw: {raw}");
        }
    }

    #[test]
    fn test_out_of_range_integer_keeps_digits() {
        assert_eq!(
            Atom::coerce("12345678901234567890"),
            Atom::Text("12345678901234567890".to_string())
        );
        assert_eq!(
            Atom::coerce(" -98765432109876543210 "),
            Atom::Text("-98765432109876543210".to_string())
        );
        let id = Atom::coerce("12345678901234567890");
        assert_eq!(id.to_string(), "12345678901234567890");
        assert_eq!(Atom::coerce(&id.to_string()), id);
    }

    #[test]
    fn test_empty_slots_render_as_space() {
        let node = TemplateNode::new(
            Atom::empty(),
            vec![
                Parameter::keyword("accessdate", Atom::empty()),
                Parameter::positional(Atom::empty()),
            ],
        );
        assert_eq!(node.to_string(), "{{ |accessdate= |}}");
    }

    #[test]
    fn test_float_display_keeps_fraction() {
        assert_eq!(Atom::Float(1.0).to_string(), "1.0");
        assert_eq!(Atom::Float(4.5).to_string(), "4.5");
    }

    #[test]
    fn test_node_display() {
        let inner = TemplateNode::new("x", vec![Parameter::positional(1i64)]);
        let node = TemplateNode::new(
            "outer",
            vec![
                Parameter::positional("a"),
                Parameter::keyword("inner", inner),
            ],
        );
        assert_eq!(node.to_string(), "{{outer|a|inner={{x|1}}}}");
    }

    #[test]
    fn test_positional_and_keywords_views() {
        let node = TemplateNode::new(
            "t",
            vec![
                Parameter::positional("a"),
                Parameter::keyword("k", 1i64),
                Parameter::keyword("k", 2i64),
            ],
        );
        assert_eq!(node.positional().collect::<Vec<_>>(), vec![&Value::from("a")]);
        assert_eq!(node.keywords().count(), 2);
    }
}
