//! The top-level driver: validates and decodes the 20-byte packet header,
//! then walks the tail of the datagram FlowSet-by-FlowSet.
//!
//! ```text
//!         START  -- header ok -->  HEADER_DONE -- tail >= 4 --> IN_FLOWSET
//!           |                                                      |
//!      header bad                                          length ok/bad
//!           v                                                      v
//!        FAILED                                           DISPATCH_FS / DONE
//! ```
//!
//! `header.count` is deliberately never consulted for control flow — only
//! the length-prefixed FlowSet walk is. Real exporters have been observed
//! to disagree on what `count` even means (FlowSets vs. individual
//! records), so the length fields are treated as the sole authority.

use crate::cache::TemplateCache;
use crate::config::Config;
use crate::error::{Diagnostic, DecodeError, ErrorKind};
use crate::flowset;
use crate::header::{self, PacketHeader};
use crate::record::NetflowRecord;
use log::{error, warn};
use std::sync::Arc;

/// Result of decoding one datagram: whatever records were produced, plus
/// any recoverable conditions encountered along the way. Decoding never
/// panics and never loses records already produced before a stopping
/// condition was hit.
#[derive(Debug, Clone, Default)]
pub struct DecodeOutcome {
    pub records: Vec<NetflowRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DecodeOutcome {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Re-exported precheck: cheaply rejects non-v9 datagrams before a full
/// decode is attempted.
pub use crate::header::is_v9;

/// Decodes NetFlow v9 datagrams against a shared [`TemplateCache`].
///
/// One decoder may be shared across threads (it holds no per-call mutable
/// state of its own); the cache it wraps is what actually needs
/// synchronized access, and it already provides that.
pub struct PacketDecoder {
    cache: Arc<TemplateCache>,
    config: Config,
}

impl PacketDecoder {
    pub fn new(cache: Arc<TemplateCache>) -> Self {
        PacketDecoder {
            cache,
            config: Config::default(),
        }
    }

    pub fn with_config(cache: Arc<TemplateCache>, config: Config) -> Self {
        PacketDecoder { cache, config }
    }

    pub fn cache(&self) -> &Arc<TemplateCache> {
        &self.cache
    }

    /// Decodes one NetFlow v9 datagram body.
    ///
    /// Always returns — there is no `Result` here because a rejected
    /// header still yields a `DecodeOutcome` (with zero records and one
    /// diagnostic) rather than aborting the caller's loop over multiple
    /// datagrams.
    pub fn decode(&self, datagram: &[u8]) -> DecodeOutcome {
        let mut outcome = DecodeOutcome::default();

        let (header, mut tail) = match PacketHeader::decode(datagram) {
            Ok(pair) => pair,
            Err(kind) => {
                error!("rejecting netflow v9 datagram: {kind}");
                outcome.diagnostics.push(Diagnostic::new(kind, 0));
                return outcome;
            }
        };

        let source_id = header.source_id;
        outcome.records.push(NetflowRecord::Header(header));

        let mut offset = header::PACKET_HEADER_LEN;
        while tail.len() >= 4 {
            let length = u16::from_be_bytes([tail[2], tail[3]]) as usize;

            if length < 4 {
                warn!("flowset at offset {offset} declares length {length} < 4; stopping datagram");
                outcome
                    .diagnostics
                    .push(Diagnostic::new(ErrorKind::MalformedFlowSet, offset).with_source(source_id));
                break;
            }
            if length > tail.len() {
                warn!(
                    "flowset at offset {offset} declares length {length} but only {} bytes remain",
                    tail.len()
                );
                outcome
                    .diagnostics
                    .push(Diagnostic::new(ErrorKind::Truncated, offset).with_source(source_id));
                break;
            }

            let flowset_bytes = &tail[..length];
            let (records, diagnostics) =
                flowset::decode(flowset_bytes, source_id, &self.cache, &self.config, offset);
            outcome.records.extend(records);
            outcome.diagnostics.extend(diagnostics);

            tail = &tail[length..];
            offset += length;
        }

        outcome
    }

    /// Decodes one datagram like [`Self::decode`], but surfaces the one
    /// packet-fatal condition — an invalid header — as a [`DecodeError`]
    /// instead of a diagnostic on an empty outcome, for callers that want
    /// `?`-propagation rather than inspecting `diagnostics` themselves.
    /// Mirrors the teacher's `Result`-returning parse functions.
    pub fn try_decode(&self, datagram: &[u8]) -> Result<DecodeOutcome, DecodeError> {
        if let Err(kind) = PacketHeader::decode(datagram) {
            error!("rejecting netflow v9 datagram: {kind}");
            return Err(DecodeError::new(kind, 0));
        }
        Ok(self.decode(datagram))
    }
}
