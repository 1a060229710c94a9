//! FILENAME: parser/src/lib.rs
//! PURPOSE: Library root for the keytable formula parser.
//! CONTEXT: This module exposes the lexer, parser, and AST components
//! needed to convert cell formula strings into evaluatable expression trees.
//!
//! PIPELINE: Formula String --> Lexer --> Tokens --> Parser --> AST --> Evaluator
//!
//! SUPPORTED FEATURES:
//! - Arithmetic: +, -, *, /, ^ (power)
//! - Comparison: =, <>, <, >, <=, >=
//! - Cell references: $d[0, 1], $d[$r, 'Price']
//! - Slices on either axis: $d[0:3, $c], $d[:-1, 0], $d[$r, 1:]
//! - Current row / column symbols: $r, $c
//! - Function calls: sum($d[0:3, $c]), if($d[$r, 0] > 0, 1, 0)
//! - Parentheses for grouping
//! - Unary negation: -5
//!
//! Errors carry the byte offset of the token that could not be parsed.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

#[cfg(test)]
mod tests;

pub use ast::{Axis, BinaryOperator, Expression, UnaryOperator, Value, UNARY_PRECEDENCE};
pub use lexer::Lexer;
pub use parser::{parse, ParseError, ParseResult, Parser};
pub use token::{Spanned, Token};
