//! The 20-byte packet header and the 4-byte FlowSet header.
//!
//! Both are fixed-layout, so they're declared with `nom_derive` the way
//! the rest of the wire-format corpus declares its static structs —
//! Data FlowSet records, by contrast, are template-shaped at runtime and
//! can't be; see [`crate::flowset`] for those.

use crate::error::ErrorKind;
use nom::IResult;
use nom_derive::Nom;
use serde::Serialize;
use std::time::{Duration, SystemTime};

pub const NETFLOW_V9_VERSION: u16 = 9;
pub const PACKET_HEADER_LEN: usize = 20;
pub const FLOWSET_HEADER_LEN: usize = 4;

/// The 20-byte NetFlow v9 packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Nom)]
pub struct PacketHeader {
    pub version: u16,
    /// Advisory count of FlowSets/records; not used for control flow (see
    /// [`crate::packet`]).
    pub count: u16,
    pub sys_uptime_ms: u32,
    pub unix_seconds: u32,
    pub sequence_number: u32,
    pub source_id: u32,
}

impl PacketHeader {
    /// Wall-clock time this packet claims to have been sent at.
    pub fn timestamp(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(self.unix_seconds as u64)
    }

    /// Parses the 20-byte header and enforces `version == 9`, `count != 0`.
    pub fn decode(input: &[u8]) -> Result<(Self, &[u8]), ErrorKind> {
        let (rest, header) =
            Self::parse_be(input).map_err(|_| ErrorKind::Truncated)?;
        if header.version != NETFLOW_V9_VERSION || header.count == 0 {
            return Err(ErrorKind::InvalidHeader);
        }
        Ok((header, rest))
    }
}

/// Cheap precheck used to reject non-v9 datagrams without a full decode.
pub fn is_v9(input: &[u8]) -> bool {
    if input.len() < PACKET_HEADER_LEN {
        return false;
    }
    u16::from_be_bytes([input[0], input[1]]) == NETFLOW_V9_VERSION
}

/// The 4-byte header that begins every FlowSet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Nom)]
pub struct FlowSetHeader {
    pub flowset_id: u16,
    /// Total bytes of the FlowSet including this header; must be `>= 4`.
    pub length: u16,
}

impl FlowSetHeader {
    pub fn decode(input: &[u8]) -> IResult<&[u8], Self> {
        Self::parse_be(input)
    }
}
