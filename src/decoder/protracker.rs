//! ProTracker MOD reader
//!
//! Layout:
//! - 20-byte song title
//! - 31 sample headers of 30 bytes (22-byte name, length, finetune, volume, loop)
//! - song length, restart byte, 128-byte order table
//! - 4-byte format tag at offset 1080
//!
//! The older 15-sample Soundtracker layout has no tag: the order table starts
//! at offset 470 and patterns at 600. It is recognised by plausibility checks
//! on the header.
//!
//! MOD has no instruments and no song message.

use super::text::{fixed_name, parse_with, section};
use super::{DecodeResult, ModuleFormat, TrackerModule};
use nom::bytes::complete::take;
use nom::multi::count;
use nom::sequence::terminated;

const TITLE_LEN: usize = 20;
const SAMPLE_COUNT: usize = 31;
const SAMPLE_NAME_LEN: usize = 22;
const SAMPLE_HEADER_LEN: usize = 30;
const TAG_OFFSET: usize = 1080;

const SOUNDTRACKER_SAMPLES: usize = 15;
const SOUNDTRACKER_ORDERS: usize = TITLE_LEN + SOUNDTRACKER_SAMPLES * SAMPLE_HEADER_LEN;
const SOUNDTRACKER_PATTERNS: usize = SOUNDTRACKER_ORDERS + 2 + 128;
const PATTERN_LEN: usize = 1024;
const MAX_VOLUME: u8 = 64;
const MAX_SAMPLE_WORDS: u16 = 0x8000;

/// Check for a known 4-byte format tag at offset 1080.
pub(super) fn is_protracker(data: &[u8]) -> bool {
    data.get(TAG_OFFSET..TAG_OFFSET + 4)
        .is_some_and(|tag| channel_count(tag).is_some())
}

/// Channel count implied by the format tag.
fn channel_count(tag: &[u8]) -> Option<u8> {
    let digit = |b: u8| b.is_ascii_digit().then(|| b - b'0');
    match tag {
        b"M.K." | b"M!K!" | b"M&K!" | b"N.T." | b"FLT4" => Some(4),
        b"FLT8" | b"CD81" | b"OKTA" | b"OCTA" => Some(8),
        // xCHN
        [n, b'C', b'H', b'N'] => digit(*n).filter(|&n| n > 0),
        // xxCH, xxCN
        [hi, lo, b'C', b'H' | b'N'] => {
            let n = digit(*hi)? * 10 + digit(*lo)?;
            (n > 0 && n <= 32).then_some(n)
        }
        _ => None,
    }
}

fn is_text(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == 0 || (0x20..0x7F).contains(&b))
}

/// Check an untagged buffer for a plausible 15-sample Soundtracker header.
///
/// Text fields must be printable ASCII, volumes and lengths in range, every
/// order a valid pattern, and the file long enough to hold the patterns.
pub(super) fn is_soundtracker(data: &[u8]) -> bool {
    if data.len() < SOUNDTRACKER_PATTERNS || !is_text(&data[..TITLE_LEN]) {
        return false;
    }

    let headers = &data[TITLE_LEN..SOUNDTRACKER_ORDERS];
    let samples_ok = headers.chunks_exact(SAMPLE_HEADER_LEN).all(|header| {
        let words = u16::from_be_bytes([header[22], header[23]]);
        is_text(&header[..SAMPLE_NAME_LEN]) && words <= MAX_SAMPLE_WORDS && header[25] <= MAX_VOLUME
    });
    if !samples_ok {
        return false;
    }

    let song_length = data[SOUNDTRACKER_ORDERS];
    let orders = &data[SOUNDTRACKER_ORDERS + 2..SOUNDTRACKER_PATTERNS];
    if song_length == 0 || song_length > 128 || orders.iter().any(|&p| p >= 64) {
        return false;
    }
    let patterns = orders.iter().copied().max().unwrap_or(0) as usize + 1;
    data.len() >= SOUNDTRACKER_PATTERNS + patterns * PATTERN_LEN
}

pub(super) fn parse(data: &[u8]) -> DecodeResult<TrackerModule> {
    read_module(data, SAMPLE_COUNT, ModuleFormat::ProTracker)
}

pub(super) fn parse_soundtracker(data: &[u8]) -> DecodeResult<TrackerModule> {
    read_module(data, SOUNDTRACKER_SAMPLES, ModuleFormat::Soundtracker)
}

fn read_module(data: &[u8], sample_count: usize, format: ModuleFormat) -> DecodeResult<TrackerModule> {
    let title = parse_with(data, "song title", fixed_name(TITLE_LEN))?;

    let samples = parse_with(
        section(data, TITLE_LEN, "sample headers")?,
        "sample headers",
        count(
            terminated(
                fixed_name(SAMPLE_NAME_LEN),
                take(SAMPLE_HEADER_LEN - SAMPLE_NAME_LEN),
            ),
            sample_count,
        ),
    )?;

    Ok(TrackerModule {
        format,
        title,
        message: None,
        samples,
        instruments: Vec::new(),
    })
}
