//! JSON rendering for the external dashboard: the `{version, exportTime,
//! packets, templates}` shape the downstream consumer expects.
//!
//! Built on `serde_json`'s `preserve_order` feature so the `Map` this
//! module constructs keeps insertion order — a `DataRecord`'s key order
//! must mirror its template's field order in the rendered JSON, the same
//! invariant the custom [`crate::record::DataRecord`] `Serialize` impl
//! upholds when serializing directly rather than through a `Value`.

use crate::cache::TemplateCache;
use crate::record::{DataRecord, NetflowRecord};
use serde_json::{json, Map, Value};

/// Renders one decoded datagram's records as the dashboard's per-packet
/// object: header fields plus a `flowSets` array, where each entry is
/// either a run of templates or a run of data records belonging to one
/// FlowSet.
///
/// `records` is expected to start with exactly one `Header`, as
/// [`crate::packet::PacketDecoder::decode`] always produces for an
/// accepted datagram. Returns `None` if it doesn't.
pub fn packet_to_json(records: &[NetflowRecord]) -> Option<Value> {
    let (header, rest) = match records.split_first()? {
        (NetflowRecord::Header(h), rest) => (h, rest),
        _ => return None,
    };

    Some(json!({
        "version": header.version,
        "count": header.count,
        "sysUptime": header.sys_uptime_ms,
        "unixSeconds": header.unix_seconds,
        "sequenceNumber": header.sequence_number,
        "sourceId": header.source_id,
        "flowSets": group_flow_sets(rest),
    }))
}

/// Collapses a flat `Template`/`Data` run back into per-FlowSet groups.
/// Consecutive `Template` records came from one Template FlowSet;
/// consecutive `Data` records sharing a `template_id` came from one Data
/// FlowSet — [`crate::flowset::decode`] never interleaves the two.
fn group_flow_sets(records: &[NetflowRecord]) -> Vec<Value> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < records.len() {
        match &records[i] {
            NetflowRecord::Template(_) => {
                let mut templates = Vec::new();
                while let Some(NetflowRecord::Template(t)) = records.get(i) {
                    templates.push(json!(t));
                    i += 1;
                }
                groups.push(json!({ "templates": templates }));
            }
            NetflowRecord::Data(first) => {
                let template_id = first.template_id;
                let mut data = Vec::new();
                while let Some(NetflowRecord::Data(d)) = records.get(i) {
                    if d.template_id != template_id {
                        break;
                    }
                    data.push(data_record_to_json(d));
                    i += 1;
                }
                groups.push(json!({ "records": data }));
            }
            NetflowRecord::Header(_) => i += 1,
        }
    }
    groups
}

fn data_record_to_json(record: &DataRecord) -> Value {
    let mut map = Map::with_capacity(record.values.len());
    for (key, value) in &record.values {
        map.insert(key.clone(), Value::String(value.clone()));
    }
    Value::Object(map)
}

/// Renders the cache's learned templates as the dashboard's top-level
/// `templates` map: `source_id -> template_id -> {TemplateId, Fields}`.
pub fn templates_to_json(cache: &TemplateCache) -> Value {
    let snapshot = cache.snapshot();
    let mut by_source = Map::with_capacity(snapshot.len());
    for (source_id, templates) in snapshot {
        let mut by_template = Map::with_capacity(templates.len());
        for (template_id, template) in templates {
            let fields: Vec<Value> = template
                .fields
                .iter()
                .map(|f| json!({ "Type": f.field_type, "Length": f.length }))
                .collect();
            by_template.insert(
                template_id.to_string(),
                json!({ "TemplateId": template.template_id, "Fields": fields }),
            );
        }
        by_source.insert(source_id.to_string(), Value::Object(by_template));
    }
    Value::Object(by_source)
}

/// Renders the dashboard's top-level export object for a batch of decoded
/// datagrams sharing one [`TemplateCache`].
///
/// `export_time` is the ISO-8601 UTC time the caller wants attached to
/// this export; the crate has no clock dependency of its own, so it is
/// passed in rather than read internally.
pub fn export(packets: &[Vec<NetflowRecord>], cache: &TemplateCache, export_time: &str) -> Value {
    let packets: Vec<Value> = packets.iter().filter_map(|r| packet_to_json(r)).collect();
    json!({
        "version": 9,
        "exportTime": export_time,
        "packets": packets,
        "templates": templates_to_json(cache),
    })
}
