//! Lexer for template markup using logos

use logos::Logos;

use crate::error::ParseError;
use crate::parser::ast::{Atom, Span};

/// Template markup tokens
///
/// Delimiters never appear inside an atom, so the five patterns are disjoint.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    #[token("{{")]
    Begin,
    #[token("}}")]
    End,
    #[token("=")]
    Equal,
    #[token("|")]
    Parameter,

    /// Any run of non-delimiter text, coerced on the way out
    #[regex(r"[^|{}=]+", |lex| Atom::coerce(lex.slice()))]
    Atom(Atom),
}

impl Token {
    /// Human-readable form for logs and messages
    pub fn describe(&self) -> String {
        match self {
            Token::Begin => "'{{'".to_string(),
            Token::End => "'}}'".to_string(),
            Token::Equal => "'='".to_string(),
            Token::Parameter => "'|'".to_string(),
            Token::Atom(atom) => format!("atom {:?}", atom),
        }
    }
}

/// Lex input string into tokens with spans
///
/// Fails on the first character no pattern accepts, such as a lone `{`.
pub fn lex(input: &str) -> Result<Vec<(Token, Span)>, ParseError> {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| match tok {
            Ok(t) => Ok((t, span)),
            Err(()) => Err(ParseError::UnrecognizedInput {
                text: input[span.clone()].to_string(),
                span,
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input)
            .expect("should lex")
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    fn text(s: &str) -> Token {
        Token::Atom(Atom::Text(s.to_string()))
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            tokens("{{|=}}"),
            vec![Token::Begin, Token::Parameter, Token::Equal, Token::End]
        );
    }

    #[test]
    fn test_positional_template() {
        assert_eq!(
            tokens("{{cite|a|b}}"),
            vec![
                Token::Begin,
                text("cite"),
                Token::Parameter,
                text("a"),
                Token::Parameter,
                text("b"),
                Token::End,
            ]
        );
    }

    #[test]
    fn test_atoms_are_coerced_and_trimmed() {
        assert_eq!(
            tokens("| accessdate =2011\n| lat = 4.5 "),
            vec![
                Token::Parameter,
                text("accessdate"),
                Token::Equal,
                Token::Atom(Atom::Int(2011)),
                Token::Parameter,
                text("lat"),
                Token::Equal,
                Token::Atom(Atom::Float(4.5)),
            ]
        );
    }

    #[test]
    fn test_atom_spans_newlines() {
        assert_eq!(tokens("{{cite web\n}}"), vec![Token::Begin, text("cite web"), Token::End]);
    }

    #[test]
    fn test_nested_closers() {
        assert_eq!(
            tokens("{{a|{{b}}}}"),
            vec![
                Token::Begin,
                text("a"),
                Token::Parameter,
                Token::Begin,
                text("b"),
                Token::End,
                Token::End,
            ]
        );
    }

    #[test]
    fn test_spans_cover_input() {
        let spans: Vec<_> = lex("{{a|b}}").unwrap().into_iter().map(|(_, s)| s).collect();
        assert_eq!(spans, vec![0..2, 2..3, 3..4, 4..5, 5..7]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokens("").is_empty());
    }

    #[test]
    fn test_lone_brace_is_rejected() {
        let err = lex("{{a|{b}}").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnrecognizedInput {
                span: 4..5,
                text: "{".to_string()
            }
        );
    }
}
