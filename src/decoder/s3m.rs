//! Scream Tracker 3 S3M reader
//!
//! Layout:
//! - 0x00: 28-byte song title
//! - 0x20: order count, sample count, pattern count (u16 LE)
//! - 0x2C: `SCRM` signature
//! - 0x60: order list, then one paragraph pointer (u16 LE, x16) per sample
//!
//! Each sample header carries its 28-byte name at 0x30. A null pointer is an
//! empty slot. S3M has no instruments and no song message.

use super::text::{fixed_name, name_at, parse_with, section};
use super::{DecodeError, DecodeResult, ModuleFormat, TrackerModule};
use log::trace;
use nom::bytes::complete::take;
use nom::multi::count;
use nom::number::complete::le_u16;
use nom::sequence::{preceded, tuple};

const TITLE_LEN: usize = 28;
const SIGNATURE_OFFSET: usize = 0x2C;
const ORDERS_OFFSET: usize = 0x60;
const SAMPLE_NAME_OFFSET: usize = 0x30;
const SAMPLE_NAME_LEN: usize = 28;
const SAMPLE_HEADER_LEN: usize = 0x50;

pub(super) fn is_s3m(data: &[u8]) -> bool {
    data.len() >= ORDERS_OFFSET && &data[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 4] == b"SCRM"
}

pub(super) fn parse(data: &[u8]) -> DecodeResult<TrackerModule> {
    let title = parse_with(data, "song title", fixed_name(TITLE_LEN))?;
    let (order_count, sample_count) =
        parse_with(data, "song header", preceded(take(0x20usize), tuple((le_u16, le_u16))))?;

    let pointer_table = ORDERS_OFFSET + order_count as usize;
    let pointers = parse_with(
        section(data, pointer_table, "sample pointer table")?,
        "sample pointer table",
        count(le_u16, sample_count as usize),
    )?;

    let samples = pointers
        .into_iter()
        .enumerate()
        .map(|(index, paragraph)| sample_name(data, index, paragraph))
        .collect::<DecodeResult<Vec<_>>>()?;

    Ok(TrackerModule {
        format: ModuleFormat::ScreamTracker3,
        title,
        message: None,
        samples,
        instruments: Vec::new(),
    })
}

fn sample_name(data: &[u8], index: usize, paragraph: u16) -> DecodeResult<String> {
    if paragraph == 0 {
        trace!("S3M sample {} has no header", index + 1);
        return Ok(String::new());
    }
    let offset = paragraph as usize * 16;
    if offset + SAMPLE_HEADER_LEN > data.len() {
        return Err(DecodeError::Truncated {
            what: "sample header",
        });
    }
    name_at(data, offset + SAMPLE_NAME_OFFSET, SAMPLE_NAME_LEN, "sample name")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_s3m(title: &str, names: &[&str]) -> Vec<u8> {
        let orders = 2usize;
        let table = ORDERS_OFFSET + orders;
        let first_header = (table + names.len() * 2).div_ceil(16) * 16;

        let mut data = vec![0u8; first_header + names.len() * SAMPLE_HEADER_LEN];
        data[..title.len()].copy_from_slice(title.as_bytes());
        data[0x1C] = 0x1A;
        data[0x1D] = 16;
        data[0x20..0x22].copy_from_slice(&(orders as u16).to_le_bytes());
        data[0x22..0x24].copy_from_slice(&(names.len() as u16).to_le_bytes());
        data[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 4].copy_from_slice(b"SCRM");
        data[ORDERS_OFFSET] = 0;
        data[ORDERS_OFFSET + 1] = 0xFF;

        for (i, name) in names.iter().enumerate() {
            let header = first_header + i * SAMPLE_HEADER_LEN;
            let paragraph = (header / 16) as u16;
            data[table + i * 2..table + i * 2 + 2].copy_from_slice(&paragraph.to_le_bytes());
            data[header] = 1;
            let at = header + SAMPLE_NAME_OFFSET;
            data[at..at + name.len()].copy_from_slice(name.as_bytes());
            data[header + 0x4C..header + 0x50].copy_from_slice(b"SCRS");
        }
        data
    }

    #[test]
    fn test_parse_sample_names() {
        let data = build_s3m("second reality", &["Piano", "Strings hi"]);
        assert!(is_s3m(&data));

        let module = parse(&data).unwrap();
        assert_eq!(module.title, "second reality");
        assert_eq!(module.samples, vec!["Piano", "Strings hi"]);
        assert!(module.instruments.is_empty());
    }

    #[test]
    fn test_null_pointer_is_empty_slot() {
        let mut data = build_s3m("t", &["a", "b"]);
        let table = ORDERS_OFFSET + 2;
        data[table..table + 2].copy_from_slice(&0u16.to_le_bytes());

        let module = parse(&data).unwrap();
        assert_eq!(module.samples, vec!["", "b"]);
    }

    #[test]
    fn test_truncated_sample_header() {
        let mut data = build_s3m("t", &["a"]);
        data.truncate(data.len() - 1);
        assert!(matches!(
            parse(&data),
            Err(DecodeError::Truncated { what: "sample header" })
        ));
    }
}
