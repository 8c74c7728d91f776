//! The decoded output: a tagged sequence of header, template, and data
//! records in wire order.

use crate::header::PacketHeader;
use crate::template::TemplateRecord;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One decoded data record: the template it was decoded with, plus its
/// field values in template-field order.
///
/// `values` is a `Vec` rather than a `HashMap` specifically so insertion
/// order — and therefore iteration and JSON key order — mirrors the
/// template's field order, per the decoder's ordering invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRecord {
    pub template_id: u16,
    pub values: Vec<(String, String)>,
}

impl DataRecord {
    pub fn new(template_id: u16) -> Self {
        DataRecord {
            template_id,
            values: Vec::new(),
        }
    }

    pub fn push(&mut self, key: String, value: String) {
        self.values.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl Serialize for DataRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in &self.values {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One entry in a decoded datagram's output sequence.
///
/// A tagged variant rather than a marker-interface hierarchy: exactly one
/// `Header` is emitted per datagram, followed by the concatenation of
/// `Template` and `Data` records from each FlowSet in wire order.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum NetflowRecord {
    Header(PacketHeader),
    Template(TemplateRecord),
    Data(DataRecord),
}
