//! Splits a search string into [`Token`]s.
//!
//! A term is `<field><operator><value>`, e.g. `c>=wu` or `n:"lightning bolt"`. Everything between
//! terms is free text and skipped.

use crate::error::{Error, LexError, ValidationError};
use crate::field::{Field, Operator};
use std::collections::HashSet;
use std::iter::Peekable;
use std::str::CharIndices;

/// A single `<field><operator><value>` term of a search string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub field: Field,
    pub operator: Operator,
    /// The value with quotes removed. May be empty if it was quoted.
    pub value: String,
}

impl Token {
    pub fn new(field: Field, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field,
            operator,
            value: value.into(),
        }
    }

    /// Build a token from its textual parts, e.g. `("c", ">=", "wu")`.
    pub fn from_parts(
        field: &str,
        operator: &str,
        value: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(field.parse()?, operator.parse()?, value))
    }
}

/// Tokenize a search string.
///
/// ASCII letters are case-folded first, other characters are kept as they are, the same way
/// SQLite's `LIKE` compares. Positions in errors refer to the folded input.
pub fn tokenize(input: &str) -> Result<Vec<Token>, Error> {
    let input = input.to_ascii_lowercase();
    Lexer::new(&input).tokenize()
}

struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
    /// The last consumed character, to detect word boundaries.
    previous: Option<char>,
    /// Fields which already produced a token.
    seen: HashSet<Field>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            previous: None,
            seen: HashSet::new(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Scan forward to the next term and read it. `None` at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, Error> {
        loop {
            let at_boundary = self.previous.map_or(true, |c| !c.is_alphanumeric());
            let Some((position, c)) = self.advance() else {
                return Ok(None);
            };

            if !at_boundary || !self.peek_is(Operator::is_symbol) {
                continue;
            }
            let Some(field) = Field::from_code(c) else {
                continue;
            };

            if !self.seen.insert(field) {
                return Err(Error::DuplicateField(field));
            }

            let operator = self.read_operator()?;
            let value = self.read_value(field, operator, position)?;

            return Ok(Some(Token::new(field, operator, value)));
        }
    }

    fn read_operator(&mut self) -> Result<Operator, LexError> {
        let position = self.position();
        let mut symbols = String::new();
        while let Some(c) = self.next_if(Operator::is_symbol) {
            symbols.push(c);
        }

        Operator::from_symbols(&symbols).ok_or(LexError::InvalidOperator {
            operator: symbols,
            position,
        })
    }

    /// Read a value: a run of characters up to whitespace or `=`. Quoted parts may contain
    /// whitespace and are joined with their neighbours, `foo"bar baz"` reads as `foobar baz`.
    fn read_value(
        &mut self,
        field: Field,
        operator: Operator,
        start: usize,
    ) -> Result<String, LexError> {
        let mut value = String::new();
        let mut empty = true;

        loop {
            if self.peek_is(|c| c == '"') {
                value.push_str(&self.read_quoted()?);
            } else if let Some(c) = self.next_if(|c| !(c.is_whitespace() || c == '=')) {
                value.push(c);
            } else {
                break;
            }
            empty = false;
        }

        if empty {
            return Err(LexError::MissingValue {
                field: field.code(),
                operator: operator.symbol().to_string(),
                position: start,
            });
        }

        Ok(value)
    }

    /// Read a quoted value. `\"` and `\\` escape a quote and a backslash.
    fn read_quoted(&mut self) -> Result<String, LexError> {
        let position = self.position();
        self.advance();

        let mut value = String::new();
        loop {
            match self.advance() {
                Some((_, '"')) => return Ok(value),
                Some((_, '\\')) => match self.advance() {
                    Some((_, c)) => value.push(c),
                    None => return Err(LexError::UnterminatedQuote { position }),
                },
                Some((_, c)) => value.push(c),
                None => return Err(LexError::UnterminatedQuote { position }),
            }
        }
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((_, c)) = next {
            self.previous = Some(c);
        }
        next
    }

    fn next_if(&mut self, f: impl Fn(char) -> bool) -> Option<char> {
        if self.peek_is(f) {
            self.advance().map(|(_, c)| c)
        } else {
            None
        }
    }

    fn peek_is(&mut self, f: impl Fn(char) -> bool) -> bool {
        self.chars.peek().map_or(false, |&(_, c)| f(c))
    }

    /// Byte position of the next character, or the end of input.
    fn position(&mut self) -> usize {
        match self.chars.peek() {
            Some(&(position, _)) => position,
            None => usize::MAX,
        }
    }
}
