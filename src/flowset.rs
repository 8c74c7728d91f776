//! Per-FlowSet dispatch: classify a FlowSet as Template, Options-Template,
//! reserved, or Data, and decode it accordingly.
//!
//! The packet decoder has already validated that `flowset_bytes` is
//! exactly one FlowSet's worth of bytes (header included) before handing
//! it here — see [`crate::packet`] for the truncation/malformed-length
//! checks that make that guarantee. This module only has to dispatch and
//! decode; it never needs to re-derive how many bytes belong to it.

use crate::cache::TemplateCache;
use crate::catalog;
use crate::config::Config;
use crate::error::{Diagnostic, ErrorKind};
use crate::header::FlowSetHeader;
use crate::reader::read_u16;
use crate::record::{DataRecord, NetflowRecord};
use crate::template::{TemplateField, TemplateRecord};
use log::{trace, warn};

const TEMPLATE_FLOWSET_ID: u16 = 0;
const OPTIONS_TEMPLATE_FLOWSET_ID: u16 = 1;
const DATA_FLOWSET_MIN_ID: u16 = 256;

/// Decodes one FlowSet, installing any learned templates into `cache` as
/// a side effect. `offset` is this FlowSet's byte offset within the
/// datagram, used only to annotate diagnostics.
pub fn decode(
    flowset_bytes: &[u8],
    source_id: u32,
    cache: &TemplateCache,
    config: &Config,
    offset: usize,
) -> (Vec<NetflowRecord>, Vec<Diagnostic>) {
    let Ok((header, _)) = FlowSetHeader::decode(flowset_bytes) else {
        return (vec![], vec![Diagnostic::new(ErrorKind::Truncated, offset)]);
    };
    let content = &flowset_bytes[4..];

    match header.flowset_id {
        TEMPLATE_FLOWSET_ID => decode_templates(content, source_id, cache, config),
        OPTIONS_TEMPLATE_FLOWSET_ID => {
            trace!("skipping options-template flowset from source {source_id}");
            (vec![], vec![])
        }
        2..=255 => {
            trace!("skipping reserved flowset id {} from source {source_id}", header.flowset_id);
            (vec![], vec![])
        }
        template_id => decode_data(content, source_id, template_id, cache, offset),
    }
}

fn decode_templates(
    mut content: &[u8],
    source_id: u32,
    cache: &TemplateCache,
    config: &Config,
) -> (Vec<NetflowRecord>, Vec<Diagnostic>) {
    let mut records = Vec::new();

    while content.len() >= 4 {
        let (template_id, _) = read_u16(content).expect("checked len >= 4 above");
        let (field_count, _) = read_u16(&content[2..]).expect("checked len >= 4 above");
        let field_count = field_count as usize;

        if field_count > config.max_fields_per_template {
            warn!(
                "template {template_id} from source {source_id} declares {field_count} fields, \
                 exceeding the cap of {}; stopping this flowset",
                config.max_fields_per_template
            );
            break;
        }

        let after_header = &content[4..];
        let needed = field_count * 4;
        if after_header.len() < needed {
            // Partial trailing tuple: ends the FlowSet without error.
            break;
        }

        let mut fields = Vec::with_capacity(field_count);
        let mut cursor = after_header;
        for _ in 0..field_count {
            let (field_type, _) = read_u16(cursor).expect("checked len >= needed above");
            let (length, _) = read_u16(&cursor[2..]).expect("checked len >= needed above");
            fields.push(TemplateField { field_type, length });
            cursor = &cursor[4..];
        }

        let template = TemplateRecord::new(template_id, fields);
        cache.put(source_id, template.clone());
        records.push(NetflowRecord::Template(template));
        content = cursor;
    }

    (records, vec![])
}

fn decode_data(
    content: &[u8],
    source_id: u32,
    template_id: u16,
    cache: &TemplateCache,
    offset: usize,
) -> (Vec<NetflowRecord>, Vec<Diagnostic>) {
    let Some(template) = cache.get(source_id, template_id) else {
        warn!("no cached template {template_id} for source {source_id}; dropping data flowset");
        let diag = Diagnostic::new(ErrorKind::UnknownTemplate, offset)
            .with_source(source_id)
            .with_template(template_id);
        return (vec![], vec![diag]);
    };

    let record_length = template.record_length();
    if record_length == 0 {
        let diag = Diagnostic::new(ErrorKind::InvalidTemplate, offset)
            .with_source(source_id)
            .with_template(template_id);
        return (vec![], vec![diag]);
    }

    let mut records = Vec::new();
    let mut remaining = content;
    while remaining.len() >= record_length {
        let mut record = DataRecord::new(template_id);
        let mut cursor = remaining;
        for field in &template.fields {
            let width = field.length as usize;
            let bytes = &cursor[..width];
            record.push(catalog::key_for(field.field_type), catalog::decode_field(field.field_type, bytes));
            cursor = &cursor[width..];
        }
        records.push(NetflowRecord::Data(record));
        remaining = &remaining[record_length..];
    }
    // Trailing bytes shorter than one record's stride are padding, discarded silently.

    (records, vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateField as TF;

    fn flowset_header(flowset_id: u16, length: u16) -> Vec<u8> {
        let mut v = flowset_id.to_be_bytes().to_vec();
        v.extend_from_slice(&length.to_be_bytes());
        v
    }

    #[test]
    fn empty_flowset_yields_no_records() {
        let cache = TemplateCache::new();
        let config = Config::default();
        let bytes = flowset_header(256, 4);
        let (records, diags) = decode(&bytes, 0, &cache, &config, 20);
        assert!(records.is_empty());
        // Unknown template (256 was never installed) -> one diagnostic.
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn options_template_flowset_is_skipped_without_error() {
        let cache = TemplateCache::new();
        let config = Config::default();
        let mut bytes = flowset_header(1, 8);
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        let (records, diags) = decode(&bytes, 0, &cache, &config, 20);
        assert!(records.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn reserved_flowset_is_skipped_without_error() {
        let cache = TemplateCache::new();
        let config = Config::default();
        let mut bytes = flowset_header(42, 8);
        bytes.extend_from_slice(&[1, 2, 3, 4]);
        let (records, diags) = decode(&bytes, 0, &cache, &config, 20);
        assert!(records.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn template_then_data_single_record() {
        let cache = TemplateCache::new();
        let config = Config::default();

        // Template FlowSet: id 256, fields (8,4) (12,4) (4,1).
        let mut template_bytes = flowset_header(0, 24);
        template_bytes.extend_from_slice(&[0x01, 0x00]); // template_id 256
        template_bytes.extend_from_slice(&[0x00, 0x03]); // field_count 3
        template_bytes.extend_from_slice(&[0x00, 0x08, 0x00, 0x04]);
        template_bytes.extend_from_slice(&[0x00, 0x0C, 0x00, 0x04]);
        template_bytes.extend_from_slice(&[0x00, 0x04, 0x00, 0x01]);

        let (records, diags) = decode(&template_bytes, 0, &cache, &config, 20);
        assert!(diags.is_empty());
        assert_eq!(records.len(), 1);
        match &records[0] {
            NetflowRecord::Template(t) => {
                assert_eq!(t.template_id, 256);
                assert_eq!(
                    t.fields,
                    vec![
                        TF { field_type: 8, length: 4 },
                        TF { field_type: 12, length: 4 },
                        TF { field_type: 4, length: 1 },
                    ]
                );
            }
            _ => panic!("expected a template record"),
        }

        // Data FlowSet: id 256, one record.
        let mut data_bytes = flowset_header(256, 13);
        data_bytes.extend_from_slice(&[0xC0, 0xA8, 0x01, 0x64]); // 192.168.1.100
        data_bytes.extend_from_slice(&[0x0A, 0x00, 0x00, 0x32]); // 10.0.0.50
        data_bytes.push(0x06); // protocol 6

        let (records, diags) = decode(&data_bytes, 0, &cache, &config, 44);
        assert!(diags.is_empty());
        assert_eq!(records.len(), 1);
        match &records[0] {
            NetflowRecord::Data(d) => {
                assert_eq!(d.template_id, 256);
                assert_eq!(d.get("Src IP"), Some("192.168.1.100"));
                assert_eq!(d.get("Dst IP"), Some("10.0.0.50"));
                assert_eq!(d.get("Protocol"), Some("6"));
                let keys: Vec<&str> = d.values.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, ["Src IP", "Dst IP", "Protocol"]);
            }
            _ => panic!("expected a data record"),
        }
    }

    #[test]
    fn data_before_template_reports_unknown_template() {
        let cache = TemplateCache::new();
        let config = Config::default();
        let mut data_bytes = flowset_header(256, 13);
        data_bytes.extend_from_slice(&[0xC0, 0xA8, 0x01, 0x64]);
        data_bytes.extend_from_slice(&[0x0A, 0x00, 0x00, 0x32]);
        data_bytes.push(0x06);

        let (records, diags) = decode(&data_bytes, 0, &cache, &config, 20);
        assert!(records.is_empty());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, ErrorKind::UnknownTemplate);
        assert_eq!(diags[0].template_id, Some(256));
    }

    #[test]
    fn record_length_larger_than_content_yields_no_records() {
        let cache = TemplateCache::new();
        let config = Config::default();
        cache.put(0, TemplateRecord::new(256, vec![TF { field_type: 1, length: 4 }]));

        let mut data_bytes = flowset_header(256, 6);
        data_bytes.extend_from_slice(&[0, 1]); // only 2 bytes of payload, stride is 4

        let (records, diags) = decode(&data_bytes, 0, &cache, &config, 20);
        assert!(records.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn zero_field_template_is_invalid_when_referenced() {
        let cache = TemplateCache::new();
        let config = Config::default();
        cache.put(0, TemplateRecord::new(256, vec![]));

        let data_bytes = flowset_header(256, 8);
        let (records, diags) = decode(&data_bytes, 0, &cache, &config, 20);
        assert!(records.is_empty());
        assert_eq!(diags[0].kind, ErrorKind::InvalidTemplate);
    }

    #[test]
    fn zero_width_field_consumes_no_bytes() {
        let cache = TemplateCache::new();
        let config = Config::default();
        cache.put(
            0,
            TemplateRecord::new(
                256,
                vec![TF { field_type: 1, length: 0 }, TF { field_type: 2, length: 4 }],
            ),
        );

        let mut data_bytes = flowset_header(256, 8);
        data_bytes.extend_from_slice(&[0, 0, 0, 5]);

        let (records, _diags) = decode(&data_bytes, 0, &cache, &config, 20);
        assert_eq!(records.len(), 1);
        match &records[0] {
            NetflowRecord::Data(d) => {
                assert_eq!(d.get("Bytes"), Some(""));
                assert_eq!(d.get("Packets"), Some("5"));
            }
            _ => panic!("expected a data record"),
        }
    }

    #[test]
    fn unknown_field_type_renders_hex() {
        let cache = TemplateCache::new();
        let config = Config::default();
        cache.put(0, TemplateRecord::new(256, vec![TF { field_type: 999, length: 3 }]));

        let mut data_bytes = flowset_header(256, 7);
        data_bytes.extend_from_slice(&[0xAA, 0xBB, 0xCC]);

        let (records, _diags) = decode(&data_bytes, 0, &cache, &config, 20);
        match &records[0] {
            NetflowRecord::Data(d) => assert_eq!(d.get("Field_999"), Some("AA-BB-CC")),
            _ => panic!("expected a data record"),
        }
    }

    #[test]
    fn partial_trailing_template_tuple_ends_flowset_without_error() {
        let cache = TemplateCache::new();
        let config = Config::default();
        let mut bytes = flowset_header(0, 10);
        bytes.extend_from_slice(&[0x01, 0x00]); // template_id
        bytes.extend_from_slice(&[0x00, 0x02]); // field_count 2, but only one pair follows
        bytes.extend_from_slice(&[0x00, 0x08, 0x00, 0x04]);

        let (records, diags) = decode(&bytes, 0, &cache, &config, 20);
        assert!(records.is_empty());
        assert!(diags.is_empty());
    }
}
