//! Field enumeration
//!
//! Walks the searchable text fields of a decoded module in a fixed order:
//! the song message, then every sample name, then every instrument name.
//! Each field is fetched from the module only when the iterator reaches it,
//! and its text is owned by the yielded [`TextField`].

use crate::decoder::DecodedModule;
use std::fmt;
use std::iter::FusedIterator;
use thiserror::Error;

/// Identifies one searchable field; indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Song message
    Message,
    /// Sample name
    Sample(usize),
    /// Instrument name
    Instrument(usize),
}

impl FieldKind {
    /// 1-based ordinal shown in labels; `None` for the message.
    pub fn ordinal(&self) -> Option<usize> {
        match self {
            FieldKind::Message => None,
            FieldKind::Sample(index) | FieldKind::Instrument(index) => Some(index + 1),
        }
    }

    /// Field class without the ordinal.
    pub fn class(&self) -> &'static str {
        match self {
            FieldKind::Message => "message",
            FieldKind::Sample(_) => "sample",
            FieldKind::Instrument(_) => "instrument",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ordinal() {
            Some(ordinal) => write!(f, "{} {}", self.class(), ordinal),
            None => f.write_str(self.class()),
        }
    }
}

/// A retrieved field and its text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    /// Which field this is
    pub kind: FieldKind,
    /// Field text as returned by the decoder
    pub text: String,
}

/// The decoder could not hand out the text of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("could not retrieve {field}")]
pub struct RetrievalError {
    /// Field whose retrieval failed
    pub field: FieldKind,
}

#[derive(Debug, Clone, Copy)]
enum Cursor {
    Message,
    Samples { next: usize, count: usize },
    Instruments { next: usize, count: usize },
    Done,
}

/// Lazy iterator over the text fields of a module.
///
/// Yields `Err` at most once; iteration ends after the first failure.
pub struct Fields<'m, M: ?Sized> {
    module: &'m M,
    cursor: Cursor,
}

/// Enumerate the text fields of `module`.
pub fn fields<M: DecodedModule + ?Sized>(module: &M) -> Fields<'_, M> {
    Fields {
        module,
        cursor: Cursor::Message,
    }
}

impl<M: DecodedModule + ?Sized> Fields<'_, M> {
    fn fetch(&mut self, kind: FieldKind, text: Option<String>) -> Result<TextField, RetrievalError> {
        match text {
            Some(text) => Ok(TextField { kind, text }),
            None => {
                self.cursor = Cursor::Done;
                Err(RetrievalError { field: kind })
            }
        }
    }
}

impl<M: DecodedModule + ?Sized> Iterator for Fields<'_, M> {
    type Item = Result<TextField, RetrievalError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.cursor {
                Cursor::Message => {
                    self.cursor = Cursor::Samples {
                        next: 0,
                        count: self.module.sample_count(),
                    };
                    // A module without a message has nothing to scan here
                    if let Some(text) = self.module.message() {
                        return Some(Ok(TextField {
                            kind: FieldKind::Message,
                            text,
                        }));
                    }
                }
                Cursor::Samples { next, count } if next < count => {
                    self.cursor = Cursor::Samples {
                        next: next + 1,
                        count,
                    };
                    let text = self.module.sample_name(next);
                    return Some(self.fetch(FieldKind::Sample(next), text));
                }
                Cursor::Samples { .. } => {
                    self.cursor = Cursor::Instruments {
                        next: 0,
                        count: self.module.instrument_count(),
                    };
                }
                Cursor::Instruments { next, count } if next < count => {
                    self.cursor = Cursor::Instruments {
                        next: next + 1,
                        count,
                    };
                    let text = self.module.instrument_name(next);
                    return Some(self.fetch(FieldKind::Instrument(next), text));
                }
                Cursor::Instruments { .. } => self.cursor = Cursor::Done,
                Cursor::Done => return None,
            }
        }
    }
}

impl<M: DecodedModule + ?Sized> FusedIterator for Fields<'_, M> {}
