use super::DecodedModule;
use std::fmt;

/// Tracker formats understood by [`NativeDecoder`](super::NativeDecoder)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleFormat {
    /// ProTracker MOD and 4-byte-tag compatibles
    ProTracker,
    /// Untagged 15-sample Soundtracker MOD
    Soundtracker,
    /// Scream Tracker 3 S3M
    ScreamTracker3,
    /// FastTracker 2 XM
    FastTracker2,
    /// Impulse Tracker IT
    ImpulseTracker,
}

impl ModuleFormat {
    /// Short identifier, as used for file extensions.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleFormat::ProTracker => "MOD",
            ModuleFormat::Soundtracker => "STK",
            ModuleFormat::ScreamTracker3 => "S3M",
            ModuleFormat::FastTracker2 => "XM",
            ModuleFormat::ImpulseTracker => "IT",
        }
    }
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata decoded from a tracker module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerModule {
    /// Detected format
    pub format: ModuleFormat,
    /// Song title (not a searchable field)
    pub title: String,
    /// Song message, if the format and file carry one
    pub message: Option<String>,
    /// Sample names in slot order
    pub samples: Vec<String>,
    /// Instrument names in slot order
    pub instruments: Vec<String>,
}

impl DecodedModule for TrackerModule {
    fn message(&self) -> Option<String> {
        self.message.clone()
    }

    fn sample_count(&self) -> usize {
        self.samples.len()
    }

    fn sample_name(&self, index: usize) -> Option<String> {
        self.samples.get(index).cloned()
    }

    fn instrument_count(&self) -> usize {
        self.instruments.len()
    }

    fn instrument_name(&self, index: usize) -> Option<String> {
        self.instruments.get(index).cloned()
    }
}
