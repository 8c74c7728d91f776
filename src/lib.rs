#![doc = include_str!("../README.md")]

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod flowset;
pub mod header;
pub mod packet;
pub mod reader;
pub mod record;
pub mod template;

pub use cache::TemplateCache;
pub use config::Config;
pub use error::{Diagnostic, DecodeError, ErrorKind};
pub use header::{FlowSetHeader, PacketHeader};
pub use packet::{is_v9, DecodeOutcome, PacketDecoder};
pub use record::{DataRecord, NetflowRecord};
pub use template::{TemplateField, TemplateRecord};
