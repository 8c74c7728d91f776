//! Template definitions learned from Template FlowSets.

use serde::Serialize;

/// One `(field type, field length)` pair inside a template, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateField {
    pub field_type: u16,
    pub length: u16,
}

/// A template record: the schema a later Data FlowSet will be decoded with.
///
/// `fields` order is significant — it dictates wire order in data records,
/// and the output `DataRecord`'s key insertion order mirrors it exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateRecord {
    pub template_id: u16,
    pub fields: Vec<TemplateField>,
}

impl TemplateRecord {
    pub fn new(template_id: u16, fields: Vec<TemplateField>) -> Self {
        TemplateRecord { template_id, fields }
    }

    /// The stride of one data record decoded with this template: the sum
    /// of all field lengths.
    pub fn record_length(&self) -> usize {
        self.fields.iter().map(|f| f.length as usize).sum()
    }
}
