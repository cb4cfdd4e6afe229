//! Scan driver
//!
//! Runs one scan from start to finish:
//! load the file, decode it, walk its fields, match, report.
//! Each stage either hands its result to the next or ends the scan with a
//! [`ScanError`]. The file buffer is dropped as soon as the decoder is done
//! with it, and the module handle when the scan returns, whichever way it
//! returns.

use crate::config::ScanConfig;
use crate::decoder::ModuleDecoder;
use crate::fields::fields;
use crate::loader;
use crate::matcher::KeywordSet;
use crate::report::ReportEmitter;
use crate::{Result, ScanError};
use log::{debug, info, trace};
use std::io::Write;
use std::path::Path;

/// Counters for a completed scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Fields retrieved and searched
    pub fields: usize,
    /// Report lines written
    pub matches: usize,
}

/// Keyword scanner over decoded modules
pub struct Scanner<D> {
    decoder: D,
    config: ScanConfig,
}

impl<D: ModuleDecoder> Scanner<D> {
    /// Create a scanner using `decoder`.
    pub fn new(decoder: D, config: ScanConfig) -> Self {
        Self { decoder, config }
    }

    /// Scan the module file at `path`, writing report lines to `out`.
    ///
    /// The path as displayed is the source label of every report line and
    /// diagnostic.
    pub fn scan_file<W: Write>(&self, path: &Path, keywords: &KeywordSet, out: W) -> Result<ScanSummary> {
        let buffer = loader::load_buffer(path, self.config.max_file_size)?;
        self.scan_buffer(&path.display().to_string(), buffer, keywords, out)
    }

    /// Scan an in-memory module image labelled `source`.
    ///
    /// Takes ownership of `buffer` and releases it right after decoding.
    /// Report lines already written stay written if a later field fails.
    pub fn scan_buffer<W: Write>(
        &self,
        source: &str,
        buffer: Vec<u8>,
        keywords: &KeywordSet,
        out: W,
    ) -> Result<ScanSummary> {
        let decoded = self.decoder.decode(&buffer);
        drop(buffer);
        let module = decoded.map_err(|source_err| ScanError::Decode {
            path: source.to_string(),
            source: source_err,
        })?;
        debug!("{}: decoded, scanning for {} keywords", source, keywords.len());

        let mut emitter = ReportEmitter::new(source, self.config.format, out);
        let mut summary = ScanSummary::default();

        for field in fields(&module) {
            let field = field.map_err(|e| ScanError::Retrieval {
                path: source.to_string(),
                field: e.field,
            })?;
            trace!("{}: scanning {}", source, field.kind);
            summary.fields += 1;

            for keyword in keywords.matches(&field.text) {
                emitter
                    .emit(&field, keyword)
                    .map_err(|e| ScanError::Output {
                        path: source.to_string(),
                        source: e,
                    })?;
            }
        }

        summary.matches = emitter.emitted();
        info!(
            "{}: scanned {} fields, {} matches",
            source, summary.fields, summary.matches
        );
        Ok(summary)
    }
}
