//! LHA/LZH unwrapping for archived modules
//!
//! Modules from Amiga-era collections are frequently distributed as LHA
//! archives. This module recognises an LHA header by its `-lh?-` method ID,
//! header level and (for levels 0 and 1) header checksum, and extracts the
//! first archive member with the `delharc` crate. Anything else passes through
//! unchanged and uncopied.

use crate::decoder::DecodeError;
use delharc::LhaDecodeReader;
use log::debug;
use std::borrow::Cow;
use std::io::Read;

/// Offset of the `-lh?-` method ID, the same for every header level
const LHA_METHOD_OFFSET: usize = 2;

/// Offset of the header level byte
const LHA_LEVEL_OFFSET: usize = 20;

/// Length of the `-lh?-` pattern
const LHA_SIGNATURE_LENGTH: usize = 5;

/// Maximum unpacked size: 100MB
///
/// Modules are rarely above a few megabytes. The cap stops decompression bombs.
const MAX_DECOMPRESSED_SIZE: usize = 100 * 1024 * 1024;

const LHA_MIN_VALID_LEVEL: u8 = b'0';
const LHA_MAX_VALID_LEVEL: u8 = b'7';

/// Unpack `data` if it is an LHA archive, otherwise borrow it as-is.
///
/// Only the first member of the archive is returned.
///
/// # Errors
/// [`DecodeError::Archive`] if the archive header cannot be parsed, the member
/// cannot be decompressed, its checksum does not match, or the output exceeds
/// the size cap.
pub fn decompress_if_needed(data: &[u8]) -> Result<Cow<'_, [u8]>, DecodeError> {
    if !is_lha_compressed(data) {
        return Ok(Cow::Borrowed(data));
    }
    debug!("LHA archive header, level {}", data[LHA_LEVEL_OFFSET]);

    let mut reader = LhaDecodeReader::new(data)
        .map_err(|e| DecodeError::Archive(format!("failed to parse LHA archive: {}", e)))?;

    if !reader.is_decoder_supported() {
        return Err(DecodeError::Archive(
            "unsupported LHA compression method".to_string(),
        ));
    }

    let mut unpacked = Vec::new();
    (&mut reader)
        .take(MAX_DECOMPRESSED_SIZE as u64)
        .read_to_end(&mut unpacked)
        .map_err(|e| DecodeError::Archive(format!("LHA decompression failed: {}", e)))?;

    if unpacked.len() >= MAX_DECOMPRESSED_SIZE {
        return Err(DecodeError::Archive(
            "unpacked data exceeded maximum size (100MB)".to_string(),
        ));
    }

    reader
        .crc_check()
        .map_err(|e| DecodeError::Archive(format!("LHA checksum mismatch: {}", e)))?;

    debug!("unpacked {} -> {} bytes", data.len(), unpacked.len());
    Ok(Cow::Owned(unpacked))
}

/// Level 0 and 1 headers: byte 0 is the header size, byte 1 the byte sum
/// of the header that follows it.
fn header_checksum_matches(data: &[u8]) -> bool {
    let size = data[0] as usize;
    data.get(LHA_METHOD_OFFSET..LHA_METHOD_OFFSET + size)
        .is_some_and(|header| header.iter().fold(0u8, |sum, &b| sum.wrapping_add(b)) == data[1])
}

#[inline]
fn is_valid_compression_level(byte: u8) -> bool {
    (LHA_MIN_VALID_LEVEL..=LHA_MAX_VALID_LEVEL).contains(&byte)
}

/// Detect an LHA archive by its header.
///
/// ```
/// use modgrep::compression::is_lha_compressed;
///
/// // Level 2 header start
/// assert!(is_lha_compressed(b"\x20\x00-lh5-\0\0\0\0\0\0\0\0\0\0\0\0\0\x02"));
/// assert!(!is_lha_compressed(b"IMPM"));
/// ```
pub fn is_lha_compressed(data: &[u8]) -> bool {
    let method = match data.get(LHA_METHOD_OFFSET..LHA_METHOD_OFFSET + LHA_SIGNATURE_LENGTH) {
        Some([b'-', b'l', b'h', method, b'-']) => *method,
        _ => return false,
    };
    if !is_valid_compression_level(method) {
        return false;
    }
    match data.get(LHA_LEVEL_OFFSET) {
        Some(0 | 1) => header_checksum_matches(data),
        Some(2 | 3) => true,
        _ => false,
    }
}
