//! Recursive-descent parser over the pushback token stream
//!
//! Four productions call each other; the call stack is the parser state:
//!
//! - `match_template`: `{{` name parameters `}}`, or nothing at all
//! - `match_atom`: a single atom, or nothing
//! - `match_parameters`: everything up to the closing `}}`
//! - `match_end`: the closing `}}`

use log::{debug, trace};

use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::parser::ast::{Atom, Parameter, Span, TemplateNode, Value};
use crate::parser::lexer::{lex, Token};
use crate::parser::stream::{Lookahead, TokenStream};

/// Parse template markup with the default configuration
///
/// Returns `Ok(None)` when the input does not start with `{{`. Anything after
/// the first complete template is ignored.
pub fn parse(input: &str) -> Result<Option<TemplateNode>, ParseError> {
    parse_with_config(input, &ParserConfig::default())
}

/// Parse template markup, bounding nesting by `config.max_depth`
pub fn parse_with_config(
    input: &str,
    config: &ParserConfig,
) -> Result<Option<TemplateNode>, ParseError> {
    let tokens = lex(input)?;
    trace!("lexed {} tokens", tokens.len());

    let mut parser = TemplateParser::new(TokenStream::new(tokens, input.len()), config);
    let template = parser.match_template()?;
    if template.is_some() && !parser.stream.is_exhausted() {
        debug!("ignoring input after the first template");
    }
    Ok(template)
}

struct TemplateParser<'c> {
    stream: TokenStream,
    config: &'c ParserConfig,
    depth: usize,
}

impl<'c> TemplateParser<'c> {
    fn new(stream: TokenStream, config: &'c ParserConfig) -> Self {
        Self {
            stream,
            config,
            depth: 0,
        }
    }

    fn advance(&mut self) -> Lookahead {
        let next = self.stream.advance();
        trace!("advance: {} at {:?}", next.describe(), next.span());
        next
    }

    fn match_template(&mut self) -> Result<Option<TemplateNode>, ParseError> {
        let open = match self.advance() {
            Lookahead::Token(Token::Begin, span) => span,
            other => {
                self.stream.push_back(other)?;
                return Ok(None);
            }
        };

        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.config.max_depth,
                span: open,
            });
        }

        let name = match self.match_atom()? {
            Some(atom) => Value::Atom(atom),
            None => match self.match_template()? {
                Some(node) => Value::from(node),
                None => return Err(self.missing_name(open)),
            },
        };

        let parameters = self.match_parameters()?;
        self.match_end(&open)?;
        self.depth -= 1;

        let node = TemplateNode::new(name, parameters);
        debug!(
            "parsed template '{}' with {} parameters",
            node.name,
            node.parameters.len()
        );
        Ok(Some(node))
    }

    /// Neither an atom nor a nested template follows `{{`
    fn missing_name(&mut self, open: Span) -> ParseError {
        match self.advance() {
            Lookahead::EndOfStream(_) => ParseError::UnterminatedTemplate { span: open },
            _ => ParseError::MissingName { span: open },
        }
    }

    fn match_atom(&mut self) -> Result<Option<Atom>, ParseError> {
        match self.advance() {
            Lookahead::Token(Token::Atom(atom), _) => Ok(Some(atom)),
            other => {
                self.stream.push_back(other)?;
                Ok(None)
            }
        }
    }

    fn match_parameters(&mut self) -> Result<Vec<Parameter>, ParseError> {
        let mut entries = EntryAssembler::default();
        loop {
            match self.advance() {
                Lookahead::Token(Token::Parameter, _) => entries.open(),
                Lookahead::Token(Token::Atom(atom), _) => entries.push(Value::Atom(atom)),
                Lookahead::Token(Token::Equal, _) => {}
                begin @ Lookahead::Token(Token::Begin, _) => {
                    self.stream.push_back(begin)?;
                    if let Some(node) = self.match_template()? {
                        entries.push(Value::from(node));
                    }
                }
                other => {
                    self.stream.push_back(other)?;
                    break;
                }
            }
        }
        Ok(entries.finish())
    }

    fn match_end(&mut self, open: &Span) -> Result<(), ParseError> {
        match self.advance() {
            Lookahead::Token(Token::End, _) => Ok(()),
            _ => Err(ParseError::UnterminatedTemplate { span: open.clone() }),
        }
    }
}

/// One parameter entry being filled between two `|`
///
/// Values alternate between the first slot (key or positional value) and the
/// second slot (keyword value).
#[derive(Debug)]
enum EntryState {
    /// Opened by `|`, nothing written yet
    Open,
    HaveFirst(Value),
    Complete(Value, Value),
}

impl EntryState {
    fn classify(self) -> Parameter {
        match self {
            EntryState::Open => Parameter::positional(Atom::empty()),
            EntryState::HaveFirst(value) => Parameter::Positional { value },
            EntryState::Complete(key, value) => Parameter::Keyword { key, value },
        }
    }
}

#[derive(Debug, Default)]
struct EntryAssembler {
    entries: Vec<Parameter>,
    current: Option<EntryState>,
}

impl EntryAssembler {
    /// A `|` closes the current entry and starts a fresh one
    fn open(&mut self) {
        self.close();
        self.current = Some(EntryState::Open);
    }

    fn push(&mut self, value: Value) {
        let next = match self.current.take() {
            None | Some(EntryState::Open) => EntryState::HaveFirst(value),
            Some(EntryState::HaveFirst(first)) => EntryState::Complete(first, value),
            // Third value wraps back to the first slot of a new entry
            Some(complete @ EntryState::Complete(..)) => {
                self.entries.push(complete.classify());
                EntryState::HaveFirst(value)
            }
        };
        self.current = Some(next);
    }

    fn close(&mut self) {
        if let Some(state) = self.current.take() {
            self.entries.push(state.classify());
        }
    }

    fn finish(mut self) -> Vec<Parameter> {
        self.close();
        self.entries
    }
}
