//! Shared byte-level helpers for the format readers.

use super::{DecodeError, DecodeResult};
use nom::bytes::complete::take;
use nom::combinator::map;
use nom::IResult;

/// Decode a NUL/space padded name. Bytes map 1:1 onto Latin-1 code points.
pub(crate) fn latin1_name(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let name: String = raw[..end].iter().map(|&b| b as char).collect();
    name.trim_end_matches(' ').to_string()
}

/// Parser for a fixed-width name field.
pub(crate) fn fixed_name<'a>(width: usize) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], String> {
    map(take(width), latin1_name)
}

/// Slice `data` from `offset` on.
pub(crate) fn section<'a>(data: &'a [u8], offset: usize, what: &'static str) -> DecodeResult<&'a [u8]> {
    data.get(offset..).ok_or(DecodeError::Truncated { what })
}

/// Run `parser` on `input`, reporting any failure as truncation of `what`.
pub(crate) fn parse_with<'a, T>(
    input: &'a [u8],
    what: &'static str,
    mut parser: impl FnMut(&'a [u8]) -> IResult<&'a [u8], T>,
) -> DecodeResult<T> {
    parser(input)
        .map(|(_, value)| value)
        .map_err(|_| DecodeError::Truncated { what })
}

/// Read a fixed-width name at `offset`.
pub(crate) fn name_at(data: &[u8], offset: usize, width: usize, what: &'static str) -> DecodeResult<String> {
    parse_with(section(data, offset, what)?, what, fixed_name(width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_name_trims_padding() {
        assert_eq!(latin1_name(b"kick\0\0\0\0"), "kick");
        assert_eq!(latin1_name(b"snare   "), "snare");
        assert_eq!(latin1_name(b"  lead  \0junk"), "  lead");
        assert_eq!(latin1_name(b""), "");
    }

    #[test]
    fn test_latin1_name_maps_high_bytes() {
        assert_eq!(latin1_name(b"caf\xe9"), "caf\u{e9}");
    }

    #[test]
    fn test_name_at_bounds() {
        let data = b"xxhello\0\0\0";
        assert_eq!(name_at(data, 2, 8, "name").unwrap(), "hello");
        assert!(matches!(
            name_at(data, 4, 8, "name"),
            Err(DecodeError::Truncated { what: "name" })
        ));
        assert!(name_at(data, 32, 1, "name").is_err());
    }
}
