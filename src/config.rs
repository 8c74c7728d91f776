//! Tunables that are local policy rather than part of the wire protocol.
//!
//! RFC 3954 imposes no cache size or field-count limit; the defaults here
//! reflect that (unbounded cache, a generous field-count ceiling purely to
//! stop a hostile template from driving an unbounded allocation).

/// Configuration for a [`crate::cache::TemplateCache`] and the FlowSet
/// decoder that feeds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of templates retained per `source_id` before the
    /// oldest-installed template for that source is evicted. `None`
    /// (the default) imposes no cap, matching the spec's default policy.
    pub max_templates_per_source: Option<usize>,
    /// Maximum `field_count` a single template definition may declare.
    /// A template claiming more fields than this is treated like a
    /// partial trailing tuple: parsing of that FlowSet stops without error.
    pub max_fields_per_template: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_templates_per_source: None,
            max_fields_per_template: 1024,
        }
    }
}

impl Config {
    pub fn new(max_templates_per_source: Option<usize>, max_fields_per_template: usize) -> Self {
        Config {
            max_templates_per_source,
            max_fields_per_template,
        }
    }
}
