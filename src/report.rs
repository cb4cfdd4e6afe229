//! Report emission
//!
//! One line per (field, keyword) match, written and flushed as soon as the
//! match is found so that report lines interleave correctly with anything
//! written to the error stream.

use crate::config::ReportFormat;
use crate::fields::{FieldKind, TextField};
use serde::Serialize;
use std::io::{self, Write};

/// JSON Lines record for one match
#[derive(Debug, Serialize)]
struct MatchRecord<'a> {
    source: &'a str,
    field: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ordinal: Option<usize>,
    keyword: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

/// Format the text report line for a match, without the trailing newline.
///
/// ```
/// use modgrep::fields::{FieldKind, TextField};
/// use modgrep::report::format_line;
///
/// let field = TextField { kind: FieldKind::Sample(0), text: "kick_DRUM".into() };
/// assert_eq!(
///     format_line("song.xm", &field, "drum"),
///     "song.xm: found 'drum' in sample 1: kick_DRUM"
/// );
/// ```
pub fn format_line(source: &str, field: &TextField, keyword: &str) -> String {
    match field.kind {
        FieldKind::Message => format!("{}: found '{}' in message", source, keyword),
        kind => format!("{}: found '{}' in {}: {}", source, keyword, kind, field.text),
    }
}

/// Streams report lines to a writer
pub struct ReportEmitter<W: Write> {
    source: String,
    format: ReportFormat,
    out: W,
    emitted: usize,
}

impl<W: Write> ReportEmitter<W> {
    /// Create an emitter labelling every line with `source`.
    pub fn new(source: impl Into<String>, format: ReportFormat, out: W) -> Self {
        Self {
            source: source.into(),
            format,
            out,
            emitted: 0,
        }
    }

    /// Write and flush the line for one match.
    pub fn emit(&mut self, field: &TextField, keyword: &str) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => {
                writeln!(self.out, "{}", format_line(&self.source, field, keyword))?;
            }
            ReportFormat::Json => {
                let record = MatchRecord {
                    source: &self.source,
                    field: field.kind.class(),
                    ordinal: field.kind.ordinal(),
                    keyword,
                    name: field.kind.ordinal().map(|_| field.text.as_str()),
                };
                serde_json::to_writer(&mut self.out, &record)?;
                self.out.write_all(b"\n")?;
            }
        }
        self.out.flush()?;
        self.emitted += 1;
        Ok(())
    }

    /// Number of lines written so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}
