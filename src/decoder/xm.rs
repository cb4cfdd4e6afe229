//! FastTracker 2 XM reader
//!
//! Layout:
//! - `Extended Module: ` signature, 20-byte module name, 0x1A, tracker name
//! - offset 60: header size (u32 LE, counted from offset 60), then song length,
//!   restart position, channel, pattern and instrument counts (u16 LE)
//! - pattern blocks: header length (u32), packing type, rows, packed size (u16)
//! - instrument blocks: header size (u32), 22-byte name, type, sample count,
//!   sample header size; then the sample headers (22-byte name at +18) and
//!   the sample data of that instrument
//!
//! Samples are numbered across instruments in file order. XM has no song
//! message.

use super::text::{fixed_name, name_at, parse_with, section};
use super::{DecodeError, DecodeResult, ModuleFormat, TrackerModule};
use log::trace;
use nom::bytes::complete::take;
use nom::number::complete::{le_u16, le_u32};
use nom::sequence::{preceded, tuple};

const SIGNATURE: &[u8] = b"Extended Module: ";
const TITLE_OFFSET: usize = 17;
const TITLE_LEN: usize = 20;
const HEADER_SIZE_OFFSET: usize = 60;
const INSTRUMENT_NAME_OFFSET: usize = 4;
const INSTRUMENT_NAME_LEN: usize = 22;
/// Header size up to and including the sample count field
const INSTRUMENT_MIN_HEADER: usize = 29;
/// Header size up to and including the sample header size field
const INSTRUMENT_FULL_HEADER: usize = 33;
const SAMPLE_NAME_OFFSET: usize = 18;
const SAMPLE_NAME_LEN: usize = 22;
const DEFAULT_SAMPLE_HEADER_LEN: usize = 40;
const MAX_INSTRUMENTS: u16 = 256;

pub(super) fn is_xm(data: &[u8]) -> bool {
    data.len() > HEADER_SIZE_OFFSET && data.starts_with(SIGNATURE)
}

struct SongHeader {
    header_size: u32,
    pattern_count: u16,
    instrument_count: u16,
}

fn song_header(data: &[u8]) -> DecodeResult<SongHeader> {
    let (header_size, _song_length, _restart, _channels, pattern_count, instrument_count) =
        parse_with(
            section(data, HEADER_SIZE_OFFSET, "song header")?,
            "song header",
            tuple((le_u32, le_u16, le_u16, le_u16, le_u16, le_u16)),
        )?;
    Ok(SongHeader {
        header_size,
        pattern_count,
        instrument_count,
    })
}

pub(super) fn parse(data: &[u8]) -> DecodeResult<TrackerModule> {
    let title = name_at(data, TITLE_OFFSET, TITLE_LEN, "module name")?;
    let header = song_header(data)?;

    if header.instrument_count > MAX_INSTRUMENTS {
        return Err(DecodeError::InvalidHeader {
            what: "instrument count",
            value: header.instrument_count as u64,
        });
    }

    let mut offset = advance(HEADER_SIZE_OFFSET, header.header_size as usize, "song header")?;

    for _ in 0..header.pattern_count {
        let (header_len, packed_size) = parse_with(
            section(data, offset, "pattern header")?,
            "pattern header",
            tuple((le_u32, preceded(take(3usize), le_u16))),
        )?;
        offset = advance(offset, header_len as usize, "pattern header")?;
        offset = advance(offset, packed_size as usize, "pattern data")?;
    }

    let mut instruments = Vec::with_capacity(header.instrument_count as usize);
    let mut samples = Vec::new();
    for index in 0..header.instrument_count as usize {
        offset = read_instrument(data, offset, &mut instruments, &mut samples)?;
        trace!("XM instrument {} ends at offset {:#x}", index + 1, offset);
    }

    Ok(TrackerModule {
        format: ModuleFormat::FastTracker2,
        title,
        message: None,
        samples,
        instruments,
    })
}

/// Read one instrument block starting at `offset`; returns the offset after it.
fn read_instrument(
    data: &[u8],
    offset: usize,
    instruments: &mut Vec<String>,
    samples: &mut Vec<String>,
) -> DecodeResult<usize> {
    let header_len = parse_with(section(data, offset, "instrument header")?, "instrument header", le_u32)?
        as usize;
    instruments.push(name_at(
        data,
        offset.saturating_add(INSTRUMENT_NAME_OFFSET),
        INSTRUMENT_NAME_LEN,
        "instrument name",
    )?);

    // Short headers omit the trailing fields; they read as zero
    let sample_count = if header_len >= INSTRUMENT_MIN_HEADER {
        parse_with(
            section(data, offset.saturating_add(27), "instrument header")?,
            "instrument header",
            le_u16,
        )? as usize
    } else {
        0
    };
    let sample_header_len = if sample_count > 0 && header_len >= INSTRUMENT_FULL_HEADER {
        match parse_with(
            section(data, offset.saturating_add(29), "instrument header")?,
            "instrument header",
            le_u32,
        )? as usize
        {
            0 => DEFAULT_SAMPLE_HEADER_LEN,
            len => len,
        }
    } else {
        DEFAULT_SAMPLE_HEADER_LEN
    };

    let mut cursor = advance(offset, header_len, "instrument header")?;
    let mut data_len = 0usize;
    for _ in 0..sample_count {
        let (length, name) = parse_with(
            section(data, cursor, "sample header")?,
            "sample header",
            tuple((
                le_u32,
                preceded(take(SAMPLE_NAME_OFFSET - 4), fixed_name(SAMPLE_NAME_LEN)),
            )),
        )?;
        samples.push(name);
        data_len = data_len
            .checked_add(length as usize)
            .ok_or(DecodeError::Truncated { what: "sample data" })?;
        cursor = advance(cursor, sample_header_len, "sample header")?;
    }

    advance(cursor, data_len, "sample data")
}

fn advance(offset: usize, by: usize, what: &'static str) -> DecodeResult<usize> {
    offset.checked_add(by).ok_or(DecodeError::Truncated { what })
}
