use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum GedcomError {
    /// A line does not match `level SP [pointer SP] tag [SP value] terminator`.
    #[error("Line {line} of document violates GEDCOM format ({reason}): {text:?}")]
    Grammar {
        line: usize,
        text: String,
        reason: String,
    },
    /// A line's level is more than one deeper than the line before it.
    #[error(
        "Line {line} of document violates GEDCOM format: level {level} follows level {previous}. \
        Lines must be no more than one level higher than the previous line"
    )]
    Structure {
        line: usize,
        level: u32,
        previous: i32,
    },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl GedcomError {
    /// The 1-based source line a parse failure points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            GedcomError::Grammar { line, .. } | GedcomError::Structure { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for GedcomError {
    fn from(src: toml::de::Error) -> GedcomError {
        GedcomError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for GedcomError {
    fn from(src: toml::ser::Error) -> GedcomError {
        GedcomError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for GedcomError {
    fn from(src: JsonError) -> GedcomError {
        GedcomError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<io::Error> for GedcomError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => GedcomError::NotFound(format!("{x}")),
            io::ErrorKind::InvalidData => {
                GedcomError::Io(format!("IOError: source is not valid UTF-8 text: {x}"))
            }
            _ => GedcomError::Io(format!("IOError: {}", x.kind())),
        }
    }
}
