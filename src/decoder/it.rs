//! Impulse Tracker IT reader
//!
//! Layout:
//! - 0x00: `IMPM`, 26-byte song name
//! - 0x20: order, instrument, sample and pattern counts, tracker versions,
//!   flags, special flags (u16 LE)
//! - 0x36: message length (u16 LE) and offset (u32 LE)
//! - 0xC0: order list, then instrument and sample header pointers (u32 LE)
//!
//! Instrument headers (`IMPI`) carry a 26-byte name at 0x20, sample headers
//! (`IMPS`) a 26-byte name at 0x14. Instruments only exist in instrument
//! mode. The song message is stored with CR line ends.

use super::text::{name_at, parse_with, section};
use super::{DecodeResult, ModuleFormat, TrackerModule};
use log::debug;
use nom::multi::count;
use nom::number::complete::{le_u16, le_u32};
use nom::sequence::tuple;

const NAME_OFFSET: usize = 4;
const NAME_LEN: usize = 26;
const COUNTS_OFFSET: usize = 0x20;
const ORDERS_OFFSET: usize = 0xC0;
const INSTRUMENT_NAME_OFFSET: usize = 0x20;
const SAMPLE_NAME_OFFSET: usize = 0x14;

/// Instruments are used (header flags)
const FLAG_INSTRUMENT_MODE: u16 = 0x04;
/// Song message attached (special flags)
const SPECIAL_MESSAGE: u16 = 0x01;

pub(super) fn is_it(data: &[u8]) -> bool {
    data.len() >= ORDERS_OFFSET && data.starts_with(b"IMPM")
}

#[derive(Debug)]
struct SongHeader {
    order_count: u16,
    instrument_count: u16,
    sample_count: u16,
    flags: u16,
    special: u16,
    message_length: u16,
    message_offset: u32,
}

fn song_header(data: &[u8]) -> DecodeResult<SongHeader> {
    let (order_count, instrument_count, sample_count, _patterns, _cwt, _cmwt, flags, special) =
        parse_with(
            section(data, COUNTS_OFFSET, "song header")?,
            "song header",
            tuple((le_u16, le_u16, le_u16, le_u16, le_u16, le_u16, le_u16, le_u16)),
        )?;
    let (message_length, message_offset) = parse_with(
        section(data, 0x36, "song header")?,
        "song header",
        tuple((le_u16, le_u32)),
    )?;
    Ok(SongHeader {
        order_count,
        instrument_count,
        sample_count,
        flags,
        special,
        message_length,
        message_offset,
    })
}

pub(super) fn parse(data: &[u8]) -> DecodeResult<TrackerModule> {
    let title = name_at(data, NAME_OFFSET, NAME_LEN, "song name")?;
    let header = song_header(data)?;

    let table = ORDERS_OFFSET + header.order_count as usize;
    let (instrument_pointers, sample_pointers) = parse_with(
        section(data, table, "header pointer table")?,
        "header pointer table",
        tuple((
            count(le_u32, header.instrument_count as usize),
            count(le_u32, header.sample_count as usize),
        )),
    )?;

    let instruments = if header.flags & FLAG_INSTRUMENT_MODE != 0 {
        read_names(data, &instrument_pointers, INSTRUMENT_NAME_OFFSET, "instrument name")?
    } else {
        debug!("IT module in sample mode, ignoring {} instrument headers", instrument_pointers.len());
        Vec::new()
    };
    let samples = read_names(data, &sample_pointers, SAMPLE_NAME_OFFSET, "sample name")?;

    Ok(TrackerModule {
        format: ModuleFormat::ImpulseTracker,
        title,
        message: read_message(data, &header),
        samples,
        instruments,
    })
}

fn read_names(
    data: &[u8],
    pointers: &[u32],
    name_offset: usize,
    what: &'static str,
) -> DecodeResult<Vec<String>> {
    pointers
        .iter()
        .map(|&ptr| match ptr {
            0 => Ok(String::new()),
            ptr => name_at(data, (ptr as usize).saturating_add(name_offset), NAME_LEN, what),
        })
        .collect()
}

/// Song message with line ends normalized to LF, if one is attached.
fn read_message(data: &[u8], header: &SongHeader) -> Option<String> {
    if header.special & SPECIAL_MESSAGE == 0 || header.message_length == 0 {
        return None;
    }
    let start = header.message_offset as usize;
    let Some(raw) = start
        .checked_add(header.message_length as usize)
        .and_then(|end| data.get(start..end))
    else {
        debug!(
            "IT song message at {:#x} (+{}) lies outside the file",
            start, header.message_length
        );
        return None;
    };

    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let text: String = raw[..end].iter().map(|&b| b as char).collect();
    Some(text.replace("\r\n", "\n").replace('\r', "\n"))
}
