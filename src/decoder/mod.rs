//! Module decoding
//!
//! The scan core only needs a handful of text retrieval operations from a
//! decoded module. They are expressed as two traits so that the driver can be
//! paired with any decoder:
//!
//! - [`ModuleDecoder`] turns a byte buffer into a module handle or a diagnostic
//! - [`DecodedModule`] exposes the message, sample names and instrument names
//!
//! [`NativeDecoder`] is the built-in implementation. It reads the metadata of
//! ProTracker and Soundtracker MOD, Scream Tracker 3 S3M, FastTracker 2 XM and
//! Impulse Tracker IT files, optionally unpacking an LHA archive first.

mod it;
mod module;
mod protracker;
mod s3m;
mod text;
mod xm;

pub use module::{ModuleFormat, TrackerModule};

use crate::compression;
use log::debug;
use std::borrow::Cow;
use thiserror::Error;

/// Errors reported by a decoder when it rejects a buffer
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No supported format signature was found.
    #[error("unrecognized module format")]
    UnrecognizedFormat,
    /// A structure extends past the end of the data.
    #[error("truncated module: {what} extends past end of data")]
    Truncated {
        /// Structure that could not be read
        what: &'static str,
    },
    /// A header field holds a value the format does not allow.
    #[error("invalid {what}: {value}")]
    InvalidHeader {
        /// Header field name
        what: &'static str,
        /// Offending value
        value: u64,
    },
    /// The LHA container could not be unpacked.
    #[error("{0}")]
    Archive(String),
}

/// Convenient result alias for decoders.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Read-only view of a decoded module.
///
/// Every retrieval hands out an owned copy of the text; the caller keeps it
/// only while it processes that one field.
pub trait DecodedModule {
    /// Song message.
    ///
    /// `None` means the module carries no message. This is not a failure:
    /// there is simply nothing to scan.
    fn message(&self) -> Option<String>;

    /// Number of sample slots.
    fn sample_count(&self) -> usize;

    /// Name of the sample at 0-based `index`.
    ///
    /// `None` signals a retrieval failure.
    fn sample_name(&self, index: usize) -> Option<String>;

    /// Number of instrument slots.
    fn instrument_count(&self) -> usize;

    /// Name of the instrument at 0-based `index`.
    ///
    /// `None` signals a retrieval failure.
    fn instrument_name(&self, index: usize) -> Option<String>;
}

/// Creates decoded module handles from raw bytes.
pub trait ModuleDecoder {
    /// Handle type produced by this decoder; released on drop.
    type Module: DecodedModule;

    /// Decode `buffer`. The returned handle does not borrow from it.
    fn decode(&self, buffer: &[u8]) -> DecodeResult<Self::Module>;
}

/// Built-in metadata decoder for MOD, S3M, XM and IT.
#[derive(Debug, Clone, Copy)]
pub struct NativeDecoder {
    unpack_archives: bool,
}

impl Default for NativeDecoder {
    fn default() -> Self {
        Self {
            unpack_archives: true,
        }
    }
}

impl NativeDecoder {
    /// Create a decoder that unpacks LHA archives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable LHA unpacking.
    pub fn with_unpack_archives(mut self, enabled: bool) -> Self {
        self.unpack_archives = enabled;
        self
    }

    /// Detect the format from magic bytes.
    pub fn detect_format(data: &[u8]) -> Option<ModuleFormat> {
        if it::is_it(data) {
            Some(ModuleFormat::ImpulseTracker)
        } else if xm::is_xm(data) {
            Some(ModuleFormat::FastTracker2)
        } else if s3m::is_s3m(data) {
            Some(ModuleFormat::ScreamTracker3)
        } else if protracker::is_protracker(data) {
            Some(ModuleFormat::ProTracker)
        } else if protracker::is_soundtracker(data) {
            Some(ModuleFormat::Soundtracker)
        } else {
            None
        }
    }

    /// Unpack `buffer` if it is an LHA archive.
    ///
    /// A buffer that is itself a recognised module is decoded as-is when the
    /// archive reading fails or yields no known format, so that module titles
    /// or names resembling an LHA header do not hide the module.
    fn unpack<'a>(&self, buffer: &'a [u8]) -> DecodeResult<Cow<'a, [u8]>> {
        if !self.unpack_archives {
            return Ok(Cow::Borrowed(buffer));
        }
        let plain = Self::detect_format(buffer).is_some();
        match compression::decompress_if_needed(buffer) {
            Ok(Cow::Owned(unpacked)) if plain && Self::detect_format(&unpacked).is_none() => {
                debug!("archive member is not a module, decoding the buffer as-is");
                Ok(Cow::Borrowed(buffer))
            }
            Ok(data) => Ok(data),
            Err(e) if plain => {
                debug!("{}, decoding the buffer as-is", e);
                Ok(Cow::Borrowed(buffer))
            }
            Err(e) => Err(e),
        }
    }
}

impl ModuleDecoder for NativeDecoder {
    type Module = TrackerModule;

    fn decode(&self, buffer: &[u8]) -> DecodeResult<TrackerModule> {
        let data = self.unpack(buffer)?;

        let format = Self::detect_format(&data).ok_or(DecodeError::UnrecognizedFormat)?;
        debug!("detected {} module", format);

        let module = match format {
            ModuleFormat::ProTracker => protracker::parse(&data)?,
            ModuleFormat::Soundtracker => protracker::parse_soundtracker(&data)?,
            ModuleFormat::ScreamTracker3 => s3m::parse(&data)?,
            ModuleFormat::FastTracker2 => xm::parse(&data)?,
            ModuleFormat::ImpulseTracker => it::parse(&data)?,
        };

        debug!(
            "decoded {} '{}': {} samples, {} instruments, message: {}",
            module.format,
            module.title,
            module.samples.len(),
            module.instruments.len(),
            if module.message.is_some() { "yes" } else { "no" }
        );
        Ok(module)
    }
}
