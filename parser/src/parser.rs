//! FILENAME: parser/src/parser.rs
//! PURPOSE: Builds an `Expression` tree from the lexer's tokens.
//! CONTEXT: Binary operators are handled by precedence climbing over the
//! table in `BinaryOperator::precedence`; everything else is plain recursive
//! descent.
//!
//! GRAMMAR:
//!   formula    --> "="? expression EOF
//!   expression --> operand ( BINARY_OP operand )*       (by precedence)
//!   operand    --> "-" operand | primary
//!   primary    --> INTEGER | NUMBER | STRING | BOOLEAN | "$r" | "$c"
//!                | "$d" "[" axis "," axis "]"
//!                | IDENTIFIER "(" ( expression ( "," expression )* )? ")"
//!                | "(" expression ")"
//!   axis       --> expression? ":" expression? | expression
//!
//! Precedence, loosest first: comparisons, `+ -`, `* /`, prefix `-`, `^`.
//! `^` is right-associative, all others left-associative.

use crate::ast::{Axis, Expression, Value, UNARY_PRECEDENCE};
use crate::lexer::Lexer;
use crate::token::{Spanned, Token};

#[derive(Debug, PartialEq, Clone)]
pub struct ParseError {
    pub message: String,
    /// Byte offset of the offending token.
    pub offset: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        ParseError {
            message: message.into(),
            offset,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error at offset {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser {
    tokens: Vec<Spanned>,
    cursor: usize,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        Parser {
            tokens: Lexer::new(input).tokenize(),
            cursor: 0,
        }
    }

    /// Parses the whole input. A leading `=` is allowed.
    pub fn parse(&mut self) -> ParseResult<Expression> {
        if self.peek() == &Token::Equals {
            self.bump();
        }
        if self.peek() == &Token::EOF {
            return Err(self.error("Empty expression"));
        }

        let expr = self.expression(0)?;
        match self.peek() {
            Token::EOF => Ok(expr),
            other => Err(self.error(format!("Unexpected token after expression: {}", other))),
        }
    }

    fn peek(&self) -> &Token {
        // `tokenize` always ends with EOF and the cursor never passes it
        &self.tokens[self.cursor].token
    }

    fn offset(&self) -> usize {
        self.tokens[self.cursor].offset
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens[self.cursor].token.clone();
        if self.cursor + 1 < self.tokens.len() {
            self.cursor += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.offset())
    }

    fn expect(&mut self, expected: Token) -> ParseResult<()> {
        if self.peek() == &expected {
            self.bump();
            Ok(())
        } else {
            Err(self.error(format!("Expected {}, found {}", expected, self.peek())))
        }
    }

    /// Parses operators binding at least as tightly as `min_precedence`.
    fn expression(&mut self, min_precedence: u8) -> ParseResult<Expression> {
        let mut left = self.operand()?;

        while let Some(op) = self.peek().binary_operator() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.bump();
            let next_min = if op.is_right_associative() {
                precedence
            } else {
                precedence + 1
            };
            let right = self.expression(next_min)?;
            left = Expression::binary(left, op, right);
        }

        Ok(left)
    }

    fn operand(&mut self) -> ParseResult<Expression> {
        if self.peek() == &Token::Minus {
            self.bump();
            let operand = self.expression(UNARY_PRECEDENCE)?;
            return Ok(Expression::negate(operand));
        }
        self.primary()
    }

    fn primary(&mut self) -> ParseResult<Expression> {
        let offset = self.offset();
        let expr = match self.bump() {
            Token::Integer(n) => Expression::Literal(Value::Integer(n)),
            Token::Number(n) => Expression::Literal(Value::Number(n)),
            Token::String(s) => Expression::Literal(Value::String(s)),
            Token::Boolean(b) => Expression::Literal(Value::Boolean(b)),
            Token::CurrentRow => Expression::CurrentRow,
            Token::CurrentCol => Expression::CurrentColumn,
            Token::Data => self.reference()?,
            Token::Identifier(name) if self.peek() == &Token::LParen => self.call(name)?,
            Token::Identifier(name) => {
                return Err(ParseError::new(format!("Unknown identifier: {}", name), offset));
            }
            Token::LParen => {
                let inner = self.expression(0)?;
                self.expect(Token::RParen)?;
                inner
            }
            Token::EOF => return Err(ParseError::new("Unexpected end of expression", offset)),
            Token::Illegal(ch) => {
                return Err(ParseError::new(format!("Illegal character: {}", ch), offset));
            }
            token => return Err(ParseError::new(format!("Unexpected token: {}", token), offset)),
        };
        Ok(expr)
    }

    /// The bracketed part of `$d[row, col]`.
    fn reference(&mut self) -> ParseResult<Expression> {
        self.expect(Token::LBracket)?;
        let row = self.axis()?;
        self.expect(Token::Comma)?;
        let col = self.axis()?;
        self.expect(Token::RBracket)?;
        Ok(Expression::Reference { row, col })
    }

    fn axis(&mut self) -> ParseResult<Axis> {
        let ends_bound = |token: &Token| matches!(token, Token::Colon | Token::Comma | Token::RBracket);

        let start = if ends_bound(self.peek()) {
            None
        } else {
            Some(Box::new(self.expression(0)?))
        };
        if self.peek() != &Token::Colon {
            return start
                .map(Axis::Index)
                .ok_or_else(|| self.error("Empty reference axis"));
        }

        self.bump();
        let stop = if ends_bound(self.peek()) {
            None
        } else {
            Some(Box::new(self.expression(0)?))
        };
        Ok(Axis::Slice { start, stop })
    }

    /// Arguments of `name(...)`; the name has been consumed.
    fn call(&mut self, name: String) -> ParseResult<Expression> {
        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        if self.peek() != &Token::RParen {
            loop {
                args.push(self.expression(0)?);
                if self.peek() != &Token::Comma {
                    break;
                }
                self.bump();
            }
        }
        self.expect(Token::RParen)?;
        Ok(Expression::FunctionCall { name, args })
    }
}

pub fn parse(input: &str) -> ParseResult<Expression> {
    Parser::new(input).parse()
}
