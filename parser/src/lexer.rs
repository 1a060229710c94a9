//! FILENAME: parser/src/lexer.rs
//! PURPOSE: Splits a formula string into tokens.
//! CONTEXT: Recognizes `+ - * / ^ ( ) [ ] , : = < > <= >= <>`, the table
//! symbols `$d $r $c`, integer and decimal literals, `TRUE`/`FALSE`,
//! function names, and strings in single or double quotes (a doubled quote
//! inside a string stands for one quote character).

use crate::token::{Spanned, Token};
use std::iter::Peekable;
use std::str::CharIndices;

pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.next_spanned().token
    }

    /// The next token with its starting byte offset. At the end of input this
    /// keeps returning `EOF` at `source.len()`.
    pub fn next_spanned(&mut self) -> Spanned {
        while self.chars.next_if(|(_, ch)| ch.is_whitespace()).is_some() {}

        let Some((offset, ch)) = self.chars.next() else {
            return Spanned {
                token: Token::EOF,
                offset: self.source.len(),
            };
        };

        let token = match ch {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Asterisk,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '=' => Token::Equals,
            '<' if self.eat('=') => Token::LessEqual,
            '<' if self.eat('>') => Token::NotEqual,
            '<' => Token::LessThan,
            '>' if self.eat('=') => Token::GreaterEqual,
            '>' => Token::GreaterThan,
            '$' => self.table_symbol(),
            '"' | '\'' => self.string(ch),
            c if c.is_ascii_digit() || c == '.' => self.number(offset),
            c if c.is_ascii_alphabetic() || c == '_' => self.word(offset),
            other => Token::Illegal(other),
        };
        Spanned { token, offset }
    }

    /// Lexes the whole input, ending with one `EOF`.
    pub fn tokenize(mut self) -> Vec<Spanned> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_spanned();
            let done = spanned.token == Token::EOF;
            tokens.push(spanned);
            if done {
                return tokens;
            }
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.chars.next_if(|&(_, ch)| ch == expected).is_some()
    }

    /// Consumes characters while `keep` holds and returns the end offset.
    fn take_while(&mut self, mut keep: impl FnMut(char) -> bool) -> usize {
        while self.chars.next_if(|&(_, ch)| keep(ch)).is_some() {}
        self.chars.peek().map_or(self.source.len(), |&(i, _)| i)
    }

    fn table_symbol(&mut self) -> Token {
        let start = self.chars.peek().map_or(self.source.len(), |&(i, _)| i);
        let end = self.take_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        match &self.source[start..end] {
            "d" | "D" => Token::Data,
            "r" | "R" => Token::CurrentRow,
            "c" | "C" => Token::CurrentCol,
            _ => Token::Illegal('$'),
        }
    }

    /// An unterminated string runs to the end of input.
    fn string(&mut self, quote: char) -> Token {
        let mut text = String::new();
        while let Some((_, ch)) = self.chars.next() {
            if ch != quote {
                text.push(ch);
            } else if self.eat(quote) {
                text.push(quote);
            } else {
                break;
            }
        }
        Token::String(text)
    }

    fn number(&mut self, start: usize) -> Token {
        let mut seen_dot = self.source[start..].starts_with('.');
        let end = self.take_while(|ch| {
            if ch == '.' && !seen_dot {
                seen_dot = true;
                true
            } else {
                ch.is_ascii_digit()
            }
        });
        let text = &self.source[start..end];

        if !text.contains('.') {
            if let Ok(n) = text.parse::<i64>() {
                return Token::Integer(n);
            }
        }
        text.parse::<f64>()
            .map(Token::Number)
            .unwrap_or(Token::Illegal('.'))
    }

    fn word(&mut self, start: usize) -> Token {
        let end = self.take_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        let word = self.source[start..end].to_ascii_uppercase();
        match word.as_str() {
            "TRUE" => Token::Boolean(true),
            "FALSE" => Token::Boolean(false),
            _ => Token::Identifier(word),
        }
    }
}
