//! Lexer and recursive-descent parser for template markup

pub mod ast;
mod grammar;
pub mod lexer;
pub mod stream;

pub use ast::*;
pub use grammar::{parse, parse_with_config};
