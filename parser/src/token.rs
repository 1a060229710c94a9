//! FILENAME: parser/src/token.rs
//! PURPOSE: Tokens produced by the lexer.

use crate::ast::BinaryOperator;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Integer(i64),
    Number(f64),
    String(String),
    Boolean(bool),
    /// Function name, upper-cased.
    Identifier(String),

    /// `$d`
    Data,
    /// `$r`
    CurrentRow,
    /// `$c`
    CurrentCol,

    Plus,
    Minus,
    Asterisk,
    Slash,
    Caret,
    Equals,
    NotEqual,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,

    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,

    EOF,
    Illegal(char),
}

/// A token and the byte offset where it starts.
#[derive(Debug, PartialEq, Clone)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

impl Token {
    /// The infix operator this token stands for, if any.
    pub fn binary_operator(&self) -> Option<BinaryOperator> {
        let op = match self {
            Token::Plus => BinaryOperator::Add,
            Token::Minus => BinaryOperator::Subtract,
            Token::Asterisk => BinaryOperator::Multiply,
            Token::Slash => BinaryOperator::Divide,
            Token::Caret => BinaryOperator::Power,
            Token::Equals => BinaryOperator::Equal,
            Token::NotEqual => BinaryOperator::NotEqual,
            Token::LessThan => BinaryOperator::LessThan,
            Token::GreaterThan => BinaryOperator::GreaterThan,
            Token::LessEqual => BinaryOperator::LessEqual,
            Token::GreaterEqual => BinaryOperator::GreaterEqual,
            _ => return None,
        };
        Some(op)
    }

    fn punctuation(&self) -> Option<&'static str> {
        let text = match self {
            Token::Data => "$d",
            Token::CurrentRow => "$r",
            Token::CurrentCol => "$c",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::Comma => ",",
            Token::Colon => ":",
            Token::EOF => "end of input",
            other => return other.binary_operator().map(BinaryOperator::symbol),
        };
        Some(text)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(text) = self.punctuation() {
            return f.write_str(text);
        }
        match self {
            Token::Integer(n) => write!(f, "{}", n),
            Token::Number(n) => write!(f, "{}", n),
            Token::String(s) => write!(f, "'{}'", s),
            Token::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Token::Identifier(s) => f.write_str(s),
            Token::Illegal(c) => write!(f, "illegal character '{}'", c),
            _ => Ok(()),
        }
    }
}
