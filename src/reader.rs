//! Pure big-endian decoding helpers over `&[u8]`.
//!
//! Every wire field in NetFlow v9 is network byte order regardless of the
//! host's own endianness, so all multi-byte reads are centralized here on
//! top of `nom`'s big-endian integer parsers. The only failure mode is
//! [`ErrorKind::Truncated`] (not enough bytes) or, for the fixed-width
//! shape helpers, [`ErrorKind::FieldLength`] (wrong-sized slice).

use crate::error::ErrorKind;
use nom::number::complete::{be_u16, be_u32, be_u64, be_u8};

type ReadResult<T> = Result<(T, usize), ErrorKind>;

fn consumed(input: &[u8], rest: &[u8]) -> usize {
    input.len() - rest.len()
}

/// Reads one big-endian `u8` from `input`, returning the value and the
/// number of bytes consumed (always 1).
pub fn read_u8(input: &[u8]) -> ReadResult<u8> {
    let (rest, value) = be_u8::<_, nom::error::Error<&[u8]>>(input).map_err(|_| ErrorKind::Truncated)?;
    Ok((value, consumed(input, rest)))
}

/// Reads one big-endian `u16`.
pub fn read_u16(input: &[u8]) -> ReadResult<u16> {
    let (rest, value) =
        be_u16::<_, nom::error::Error<&[u8]>>(input).map_err(|_| ErrorKind::Truncated)?;
    Ok((value, consumed(input, rest)))
}

/// Reads one big-endian `u32`.
pub fn read_u32(input: &[u8]) -> ReadResult<u32> {
    let (rest, value) =
        be_u32::<_, nom::error::Error<&[u8]>>(input).map_err(|_| ErrorKind::Truncated)?;
    Ok((value, consumed(input, rest)))
}

/// Reads one big-endian `u64`.
pub fn read_u64(input: &[u8]) -> ReadResult<u64> {
    let (rest, value) =
        be_u64::<_, nom::error::Error<&[u8]>>(input).map_err(|_| ErrorKind::Truncated)?;
    Ok((value, consumed(input, rest)))
}

/// Formats a 4-byte slice as a dotted-quad IPv4 address.
pub fn to_ipv4(bytes: &[u8]) -> Result<String, ErrorKind> {
    let [a, b, c, d]: [u8; 4] = bytes.try_into().map_err(|_| ErrorKind::FieldLength)?;
    Ok(format!("{a}.{b}.{c}.{d}"))
}

/// Formats a 16-byte slice as a canonical IPv6 address.
pub fn to_ipv6(bytes: &[u8]) -> Result<String, ErrorKind> {
    let raw: [u8; 16] = bytes.try_into().map_err(|_| ErrorKind::FieldLength)?;
    Ok(std::net::Ipv6Addr::from(raw).to_string())
}

/// Formats a 6-byte slice as a colon-separated lowercase MAC address.
pub fn to_mac(bytes: &[u8]) -> Result<String, ErrorKind> {
    let raw: [u8; 6] = bytes.try_into().map_err(|_| ErrorKind::FieldLength)?;
    Ok(raw.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(":"))
}

/// Formats a slice as uppercase hex bytes joined by `-`. Total: never fails.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join("-")
}
