//! Error and diagnostic types for the NetFlow v9 decoder.
//!
//! The decoder never panics on malformed input. Structural failures that
//! force a whole packet to be rejected are represented by [`DecodeError`]
//! (it implements [`std::error::Error`] so callers can `?`-propagate it).
//! Everything recoverable — a missing template, a truncated FlowSet, a
//! mis-sized field — is instead reported as a [`Diagnostic`] alongside
//! whatever records were still successfully decoded.

use serde::Serialize;

/// Distinguishes the failure modes the decoder can report.
///
/// Scope and recovery policy for each variant are fixed by the wire-format
/// contract: see the module-level docs on [`crate::flowset`] and
/// [`crate::packet`] for where each kind is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Fewer bytes remain than a declared structure requires.
    Truncated,
    /// `version != 9` or `count == 0` in the packet header.
    InvalidHeader,
    /// A FlowSet declared `length < 4`.
    MalformedFlowSet,
    /// A Data FlowSet referenced a `(source_id, template_id)` not in the cache.
    UnknownTemplate,
    /// A cached template has `record_length == 0`.
    InvalidTemplate,
    /// A fixed-width helper (IPv4/MAC) was handed a mis-sized slice.
    FieldLength,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ErrorKind::Truncated => "truncated input",
            ErrorKind::InvalidHeader => "invalid packet header",
            ErrorKind::MalformedFlowSet => "malformed flowset",
            ErrorKind::UnknownTemplate => "unknown template",
            ErrorKind::InvalidTemplate => "invalid template",
            ErrorKind::FieldLength => "field length mismatch",
        };
        f.write_str(text)
    }
}

/// A recoverable condition encountered while decoding one datagram.
///
/// Diagnostics never stop the packet decode by themselves (that's what
/// [`DecodeError`] is for) — they accompany whatever records were
/// produced, so a caller can log or surface them without losing data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    /// Byte offset into the datagram where the condition was observed.
    pub offset: usize,
    /// The exporter's `source_id`, when known at the point of failure.
    pub source_id: Option<u32>,
    /// The template id involved, when relevant (e.g. `UnknownTemplate`).
    pub template_id: Option<u16>,
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, offset: usize) -> Self {
        Diagnostic {
            kind,
            offset,
            source_id: None,
            template_id: None,
        }
    }

    pub fn with_source(mut self, source_id: u32) -> Self {
        self.source_id = Some(source_id);
        self
    }

    pub fn with_template(mut self, template_id: u16) -> Self {
        self.template_id = Some(template_id);
        self
    }
}

/// A packet-level failure: the whole datagram is rejected, no records emitted.
///
/// This is the only error that aborts a decode outright; everything else
/// degrades to a [`Diagnostic`] attached to a partial result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeError {
    pub kind: ErrorKind,
    pub offset: usize,
}

impl DecodeError {
    pub fn new(kind: ErrorKind, offset: usize) -> Self {
        DecodeError { kind, offset }
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.offset)
    }
}

impl std::error::Error for DecodeError {}
