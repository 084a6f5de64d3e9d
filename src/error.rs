//! Error kinds raised while decoding level assets.
//!
//! Every failure is fatal to the asset being decoded: nothing here is meant to
//! be recovered from locally. Each variant carries enough context (byte
//! offset, field name or node index) to find the broken spot in the file.

use std::fmt;

use thiserror::Error;

/// The kind of a descriptor value, used in type mismatch diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Text,
    Null,
    Bool,
    EndOfStream,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Number => "number",
            ValueKind::Text => "string",
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::EndOfStream => "end of stream",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    #[error("{table} index {index} out of range (length {len})")]
    OutOfRange {
        table: &'static str,
        index: usize,
        len: usize,
    },

    #[error("truncated mesh stream: record at byte {offset} needs {needed} bytes, {available} left")]
    TruncatedStream {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("geometry at byte {offset}: face {face} references vertex {index}, but only {vertex_count} vertices exist")]
    InvalidFaceIndex {
        offset: usize,
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("lex error at byte {offset}: {reason}")]
    Lex { offset: usize, reason: String },

    #[error("undefined name `{name}` at byte {offset}")]
    UndefinedName { name: String, offset: usize },

    #[error("expected {expected}, got {found} at byte {offset}")]
    TypeMismatch {
        expected: ValueKind,
        found: ValueKind,
        offset: usize,
    },

    #[error("expected an integer, got {value} at byte {offset}")]
    NotInteger { value: f64, offset: usize },

    #[error("malformed descriptor field `{field}`: expected {expected}, found {found}")]
    Format {
        field: &'static str,
        expected: String,
        found: String,
    },

    #[error("render node {node} has unknown type {code}")]
    UnknownNodeType { node: usize, code: i64 },

    #[error("render node {node} visited twice; the node graph has a cycle")]
    CycleDetected { node: usize },
}

impl DecodeError {
    pub(crate) fn format(
        field: &'static str,
        expected: impl fmt::Display,
        found: impl fmt::Display,
    ) -> Self {
        DecodeError::Format {
            field,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
