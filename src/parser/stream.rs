//! Token stream with a single pushback slot

use crate::error::ParseError;
use crate::parser::ast::Span;
use crate::parser::lexer::Token;

/// What the parser sees when it advances: a token, or the end of input
#[derive(Debug, Clone, PartialEq)]
pub enum Lookahead {
    Token(Token, Span),
    EndOfStream(Span),
}

impl Lookahead {
    pub fn token(&self) -> Option<&Token> {
        match self {
            Lookahead::Token(tok, _) => Some(tok),
            Lookahead::EndOfStream(_) => None,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Lookahead::Token(_, span) | Lookahead::EndOfStream(span) => span,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Lookahead::Token(tok, _) => tok.describe(),
            Lookahead::EndOfStream(_) => "end of input".to_string(),
        }
    }
}

/// Materialized token list consumed front to back
///
/// At most one token may be pushed back between two advances.
#[derive(Debug)]
pub struct TokenStream {
    tokens: std::vec::IntoIter<(Token, Span)>,
    pushed: Option<Lookahead>,
    end: Span,
}

impl TokenStream {
    /// `source_len` places the end-of-stream marker just past the input
    pub fn new(tokens: Vec<(Token, Span)>, source_len: usize) -> Self {
        Self {
            tokens: tokens.into_iter(),
            pushed: None,
            end: source_len..source_len,
        }
    }

    /// Take the pushed-back token if there is one, else the next token
    ///
    /// Past the last token this keeps returning `EndOfStream`.
    pub fn advance(&mut self) -> Lookahead {
        if let Some(pushed) = self.pushed.take() {
            return pushed;
        }
        match self.tokens.next() {
            Some((tok, span)) => Lookahead::Token(tok, span),
            None => Lookahead::EndOfStream(self.end.clone()),
        }
    }

    /// Return a token so the next `advance` yields it again
    pub fn push_back(&mut self, next: Lookahead) -> Result<(), ParseError> {
        if self.pushed.is_some() {
            return Err(ParseError::StreamProtocolViolation);
        }
        self.pushed = Some(next);
        Ok(())
    }

    /// True once no real token is left, pushed back or otherwise
    pub fn is_exhausted(&self) -> bool {
        let pending = matches!(self.pushed, Some(Lookahead::Token(..)));
        !pending && self.tokens.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(input: &str) -> TokenStream {
        let tokens = crate::parser::lexer::lex(input).unwrap();
        TokenStream::new(tokens, input.len())
    }

    #[test]
    fn test_advance_in_order() {
        let mut s = stream("{{}}");
        assert_eq!(s.advance().token(), Some(&Token::Begin));
        assert_eq!(s.advance().token(), Some(&Token::End));
        assert_eq!(s.advance(), Lookahead::EndOfStream(4..4));
        assert_eq!(s.advance(), Lookahead::EndOfStream(4..4));
    }

    #[test]
    fn test_push_back_is_replayed() {
        let mut s = stream("{{|");
        let first = s.advance();
        s.push_back(first.clone()).unwrap();
        assert_eq!(s.advance(), first);
        assert_eq!(s.advance().token(), Some(&Token::Parameter));
    }

    #[test]
    fn test_push_back_end_of_stream() {
        let mut s = stream("");
        let end = s.advance();
        s.push_back(end.clone()).unwrap();
        assert_eq!(s.advance(), end);
        assert!(s.is_exhausted());
    }

    #[test]
    fn test_double_push_back_is_rejected() {
        let mut s = stream("{{}}");
        let a = s.advance();
        let b = s.advance();
        s.push_back(b).unwrap();
        assert_eq!(s.push_back(a), Err(ParseError::StreamProtocolViolation));
    }

    #[test]
    fn test_exhausted_tracks_pending_token() {
        let mut s = stream("{{");
        let begin = s.advance();
        s.push_back(begin).unwrap();
        assert!(!s.is_exhausted());
        s.advance();
        assert!(s.is_exhausted());
    }
}
