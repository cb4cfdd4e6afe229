//! Keyword search over tracker module metadata
//!
//! Scans the textual metadata of a tracker music module (song message,
//! sample names, instrument names) for one or more keywords and reports
//! every field in which a keyword occurs. Matching is case-insensitive over
//! the ASCII range; output is streamed line by line as matches are found.
//!
//! # Pipeline
//! - [`loader`]: read the whole file into memory
//! - [`decoder`]: turn the buffer into a [`DecodedModule`] (MOD, S3M, XM, IT,
//!   optionally wrapped in an LHA archive)
//! - [`fields`]: walk message, samples, then instruments
//! - [`matcher`]: pick the keywords contained in each field
//! - [`report`]: write one line per (field, keyword) match
//! - [`scan`]: drive the above and release everything on every exit path
//!
//! # Quick start
//! ```no_run
//! use modgrep::{KeywordSet, NativeDecoder, ScanConfig, Scanner};
//!
//! let keywords = KeywordSet::new(["drum", "synth"]).unwrap();
//! let scanner = Scanner::new(NativeDecoder::default(), ScanConfig::default());
//! let summary = scanner
//!     .scan_file("song.xm".as_ref(), &keywords, std::io::stdout().lock())
//!     .unwrap();
//! eprintln!("{} matches", summary.matches);
//! ```

#![warn(missing_docs)]

pub mod compression; // LHA unwrapping
pub mod config; // Scan options
pub mod decoder; // Module decoding (collaborator)
pub mod fields; // Field enumeration
pub mod loader; // File I/O
pub mod matcher; // Keyword matching
pub mod report; // Report lines
pub mod scan; // Scan driver

use fields::FieldKind;

/// Exit status for a malformed invocation.
pub const EXIT_USAGE: u8 = 1;
/// Exit status when the input file cannot be opened.
pub const EXIT_OPEN: u8 = 2;
/// Exit status when the input file is empty, too large or unreadable.
pub const EXIT_SIZE: u8 = 3;
/// Exit status when the decoder rejects the buffer.
pub const EXIT_DECODE: u8 = 4;
/// Exit status when the report cannot be written.
pub const EXIT_OUTPUT: u8 = 5;
/// Exit status when a text field cannot be retrieved after decoding.
pub const EXIT_RETRIEVAL: u8 = 17;
/// Exit status when the file buffer cannot be allocated.
pub const EXIT_OUT_OF_MEMORY: u8 = 18;

/// Errors that terminate a scan
///
/// Every variant carries the label of the scanned source so that its
/// `Display` output is the complete one-line diagnostic.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Malformed invocation
    #[error("usage: {program} FILEPATH KEYWORD1 ...")]
    Usage {
        /// Program name as invoked
        program: String,
    },

    /// Input file could not be opened
    #[error("{path}: could not open file")]
    Open {
        /// Source label
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Input file has no content
    #[error("{path}: file is empty")]
    Empty {
        /// Source label
        path: String,
    },

    /// Input file exceeds the configured or addressable size
    #[error("{path}: file too large")]
    TooLarge {
        /// Source label
        path: String,
    },

    /// Input file could be opened but not read
    #[error("{path}: could not read file: {source}")]
    Read {
        /// Source label
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Buffer for the file contents could not be allocated
    #[error("{path}: not enough memory to read file")]
    OutOfMemory {
        /// Source label
        path: String,
    },

    /// Decoder rejected the buffer
    #[error("{path}: could not initialize: {source}")]
    Decode {
        /// Source label
        path: String,
        /// Decoder diagnostic
        #[source]
        source: decoder::DecodeError,
    },

    /// A text field could not be retrieved from the decoded module
    #[error("{path}: could not retrieve {field}")]
    Retrieval {
        /// Source label
        path: String,
        /// Field whose retrieval failed
        field: FieldKind,
    },

    /// Report output could not be written
    #[error("{path}: could not write report: {source}")]
    Output {
        /// Source label
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Process exit status associated with this failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            ScanError::Usage { .. } => EXIT_USAGE,
            ScanError::Open { .. } => EXIT_OPEN,
            ScanError::Empty { .. } | ScanError::TooLarge { .. } | ScanError::Read { .. } => {
                EXIT_SIZE
            }
            ScanError::OutOfMemory { .. } => EXIT_OUT_OF_MEMORY,
            ScanError::Decode { .. } => EXIT_DECODE,
            ScanError::Retrieval { .. } => EXIT_RETRIEVAL,
            ScanError::Output { .. } => EXIT_OUTPUT,
        }
    }
}

/// Result type for scan operations
pub type Result<T> = std::result::Result<T, ScanError>;

// Public API exports
pub use compression::{decompress_if_needed, is_lha_compressed};
pub use config::{ReportFormat, ScanConfig};
pub use decoder::{DecodeError, DecodedModule, ModuleDecoder, ModuleFormat, NativeDecoder, TrackerModule};
pub use fields::{fields, Fields, RetrievalError, TextField};
pub use loader::load_buffer;
pub use matcher::{contains_ci, EmptyKeyword, KeywordSet};
pub use report::ReportEmitter;
pub use scan::{ScanSummary, Scanner};
