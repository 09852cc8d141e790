//! Error types for lexing, parsing and reference building

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::ast::Span;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A `{{` was never closed by a matching `}}`
    #[error("unterminated template: '{{{{' at {span:?} has no matching '}}}}'")]
    UnterminatedTemplate { span: Span },

    /// The input does not start with a template
    #[error("no template found: input does not start with '{{{{'")]
    NoTemplateFound,

    /// A `{{` followed by neither a name nor a nested template
    #[error("template opened at {span:?} has no name")]
    MissingName { span: Span },

    /// Templates nested past the configured limit
    #[error("templates nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize, span: Span },

    /// A keyword argument repeated while duplicates are rejected
    #[error("duplicate keyword argument '{key}'")]
    DuplicateKey { key: String },

    /// Text no token pattern accepts, e.g. a lone brace
    #[error("unrecognized input {text:?} at {span:?}")]
    UnrecognizedInput { span: Span, text: String },

    /// A token was pushed back while another one was still pending
    #[error("token pushed back while another token was pending")]
    StreamProtocolViolation,
}

impl ParseError {
    /// Short, stable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnterminatedTemplate { .. } => "UnterminatedTemplate",
            Self::NoTemplateFound => "NoTemplateFound",
            Self::MissingName { .. } => "MissingName",
            Self::NestingTooDeep { .. } => "NestingTooDeep",
            Self::DuplicateKey { .. } => "DuplicateKey",
            Self::UnrecognizedInput { .. } => "UnrecognizedInput",
            Self::StreamProtocolViolation => "StreamProtocolViolation",
        }
    }

    /// Get the source span if available
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::UnterminatedTemplate { span }
            | Self::MissingName { span }
            | Self::NestingTooDeep { span, .. }
            | Self::UnrecognizedInput { span, .. } => Some(span),
            _ => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span().cloned().unwrap_or(0..0);
        let label = match self {
            Self::UnterminatedTemplate { .. } => "this '{{' is never closed".to_string(),
            Self::MissingName { .. } => "expected a name or a nested template here".to_string(),
            Self::NestingTooDeep { limit, .. } => format!("nesting exceeds {} here", limit),
            _ => self.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        if written.is_err() {
            return format!("{}: {}", filename, self);
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}
