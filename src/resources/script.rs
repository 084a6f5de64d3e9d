//! Descriptor notation: tokenizer and value resolution.
//!
//! Descriptor files are a flat stream of values separated by whitespace or
//! semicolons, with `//` line comments:
//!
//! ```text
//! "Version" 3
//! 2 "road" "wall"   // texture names
//! 1 0 NULL NULL
//! ```
//!
//! The [`Lexer`] turns text into [`Token`]s, the [`ScriptEvaluator`] turns
//! tokens into [`Value`]s by resolving bare identifiers against a
//! [`ConstantEnvironment`] and offers typed accessors on top.

use std::collections::HashMap;

use crate::error::{DecodeError, Result, ValueKind};

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    String(String),
    Identifier(String),
    EndOfStream,
}

pub struct Lexer<'a> {
    text: &'a str,
    cursor: usize,
    token_start: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            cursor: 0,
            token_start: 0,
            finished: false,
        }
    }

    /// Byte offset of the most recently returned token.
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia();
        self.token_start = self.cursor;
        let rest = &self.text[self.cursor..];
        let Some(first) = rest.chars().next() else {
            return Ok(Token::EndOfStream);
        };

        if is_number_char(first) {
            let len = rest.find(|c: char| !is_number_char(c)).unwrap_or(rest.len());
            let literal = &rest[..len];
            let value = literal
                .parse::<f64>()
                .map_err(|_| self.error(format!("malformed number `{literal}`")))?;
            self.cursor += len;
            Ok(Token::Number(value))
        } else if first == '"' {
            let (value, len) = self.string_literal(rest)?;
            self.cursor += len;
            Ok(Token::String(value))
        } else if first.is_ascii_alphabetic() || first == '_' {
            let len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            self.cursor += len;
            Ok(Token::Identifier(rest[..len].to_string()))
        } else {
            Err(self.error(format!("unexpected character {first:?}")))
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = &self.text[self.cursor..];
            if rest.starts_with("//") {
                self.cursor += rest.find('\n').map_or(rest.len(), |eol| eol + 1);
            } else if let Some(c) = rest
                .chars()
                .next()
                .filter(|&c| matches!(c, ' ' | '\t' | '\r' | '\n' | ';'))
            {
                self.cursor += c.len_utf8();
            } else {
                break;
            }
        }
    }

    /// Parses a double-quoted literal at the start of `rest`, returning the
    /// unescaped value and the literal's length in bytes.
    fn string_literal(&self, rest: &str) -> Result<(String, usize)> {
        let mut value = String::new();
        let mut chars = rest.char_indices().skip(1);
        while let Some((at, c)) = chars.next() {
            match c {
                '"' => return Ok((value, at + 1)),
                '\\' => {
                    let Some((_, escaped)) = chars.next() else {
                        break;
                    };
                    let unescaped = match escaped {
                        '"' => '"',
                        '\\' => '\\',
                        '/' => '/',
                        'b' => '\u{8}',
                        'f' => '\u{c}',
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        'u' => {
                            let high = self.hex_escape(&mut chars)?;
                            let code = if (0xD800..0xDC00).contains(&high) {
                                let low = match (chars.next(), chars.next()) {
                                    (Some((_, '\\')), Some((_, 'u'))) => self.hex_escape(&mut chars)?,
                                    _ => return Err(self.error(format!("unpaired surrogate `\\u{high:04X}`"))),
                                };
                                if !(0xDC00..0xE000).contains(&low) {
                                    return Err(self.error(format!("unpaired surrogate `\\u{high:04X}`")));
                                }
                                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                            } else {
                                high
                            };
                            char::from_u32(code)
                                .ok_or_else(|| self.error(format!("bad unicode escape `\\u{code:04X}`")))?
                        }
                        other => return Err(self.error(format!("unknown escape `\\{other}`"))),
                    };
                    value.push(unescaped);
                }
                c => value.push(c),
            }
        }
        Err(self.error("unterminated string".to_string()))
    }

    /// The four hex digits following `\\u`.
    fn hex_escape(&self, chars: &mut impl Iterator<Item = (usize, char)>) -> Result<u32> {
        let digits: String = chars.take(4).map(|(_, c)| c).collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.error(format!("bad unicode escape `\\u{digits}`")));
        }
        u32::from_str_radix(&digits, 16).map_err(|_| self.error(format!("bad unicode escape `\\u{digits}`")))
    }

    fn error(&self, reason: String) -> DecodeError {
        DecodeError::Lex {
            offset: self.token_start,
            reason,
        }
    }
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | '+')
}

/// Yields tokens up to (not including) [`Token::EndOfStream`], or the first
/// error.
impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(Token::EndOfStream) => {
                self.finished = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// A resolved descriptor value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Null,
    Bool(bool),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::Text(_) => ValueKind::Text,
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
        }
    }
}

fn kind_of(value: &Option<Value>) -> ValueKind {
    value.as_ref().map_or(ValueKind::EndOfStream, Value::kind)
}

/// Named constants that bare identifiers resolve to.
#[derive(Clone, Debug)]
pub struct ConstantEnvironment {
    constants: HashMap<String, Value>,
}

impl ConstantEnvironment {
    pub fn new() -> Self {
        let constants = [
            ("NULL", Value::Null),
            ("true", Value::Bool(true)),
            ("false", Value::Bool(false)),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
        Self { constants }
    }

    pub fn with_constant(mut self, name: impl Into<String>, value: Value) -> Self {
        self.constants.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.constants.get(name)
    }
}

impl Default for ConstantEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads typed values from descriptor text.
///
/// Every accessor consumes exactly one token and fails fast on a value of the
/// wrong kind; errors carry the byte offset of the offending token.
pub struct ScriptEvaluator<'a> {
    tokens: Lexer<'a>,
    env: &'a ConstantEnvironment,
}

impl<'a> ScriptEvaluator<'a> {
    pub fn new(text: &'a str, env: &'a ConstantEnvironment) -> Self {
        Self {
            tokens: Lexer::new(text),
            env,
        }
    }

    /// Byte offset of the most recently read value.
    pub fn offset(&self) -> usize {
        self.tokens.token_start()
    }

    /// The next value, or `None` at end of stream.
    pub fn next_any(&mut self) -> Result<Option<Value>> {
        match self.tokens.next_token()? {
            Token::Number(n) => Ok(Some(Value::Number(n))),
            Token::String(s) => Ok(Some(Value::Text(s))),
            Token::EndOfStream => Ok(None),
            Token::Identifier(name) => match self.env.get(&name) {
                Some(value) => Ok(Some(value.clone())),
                None => Err(DecodeError::UndefinedName {
                    name,
                    offset: self.offset(),
                }),
            },
        }
    }

    fn mismatch(&self, expected: ValueKind, found: &Option<Value>) -> DecodeError {
        DecodeError::TypeMismatch {
            expected,
            found: kind_of(found),
            offset: self.offset(),
        }
    }

    pub fn next_string(&mut self) -> Result<String> {
        match self.next_any()? {
            Some(Value::Text(s)) => Ok(s),
            other => Err(self.mismatch(ValueKind::Text, &other)),
        }
    }

    pub fn next_number(&mut self) -> Result<f64> {
        match self.next_any()? {
            Some(Value::Number(n)) => Ok(n),
            other => Err(self.mismatch(ValueKind::Number, &other)),
        }
    }

    pub fn next_int(&mut self) -> Result<i64> {
        let value = self.next_number()?;
        self.integral(value)
    }

    pub fn next_eos(&mut self) -> Result<()> {
        match self.next_any()? {
            None => Ok(()),
            other => Err(self.mismatch(ValueKind::EndOfStream, &other)),
        }
    }

    pub fn next_number_array(&mut self, count: usize) -> Result<Vec<f64>> {
        (0..count).map(|_| self.next_number()).collect()
    }

    pub fn next_int_or_null(&mut self) -> Result<Option<i64>> {
        match self.next_any()? {
            Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => self.integral(n).map(Some),
            other => Err(self.mismatch(ValueKind::Number, &other)),
        }
    }

    fn integral(&self, value: f64) -> Result<i64> {
        // 2^63; anything at or beyond it would saturate in the cast
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        if value.fract() == 0.0 && (-LIMIT..LIMIT).contains(&value) {
            Ok(value as i64)
        } else {
            Err(DecodeError::NotInteger {
                value,
                offset: self.offset(),
            })
        }
    }
}
