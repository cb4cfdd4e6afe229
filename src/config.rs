//! Scan configuration
//!
//! Options that shape a scan without changing what is matched: the report
//! line format and the upper bound on the input file size.

/// Largest file the loader accepts by default (the addressable limit).
pub const DEFAULT_MAX_FILE_SIZE: u64 = isize::MAX as u64;

/// Shape of report lines written for each match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// `<source>: found '<keyword>' in <field>[: <name>]`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Scan options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Report line format
    pub format: ReportFormat,
    /// Files larger than this many bytes are rejected before reading
    pub max_file_size: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl ScanConfig {
    /// Set the report format.
    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the file size cap. Values above the addressable limit are clamped.
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes.min(DEFAULT_MAX_FILE_SIZE);
        self
    }
}
