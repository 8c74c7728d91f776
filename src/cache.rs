//! Concurrency-safe template cache keyed by `(source_id, template_id)`.
//!
//! Two exporters may legally reuse the same `template_id` for different
//! layouts, so the cache key always carries `source_id` — unlike the
//! single global `HashMap<TemplateId, Template>` a one-exporter-at-a-time
//! parser could get away with. A single `RwLock` around the outer map is
//! enough per the concurrency model: readers (`get`, `snapshot`) never
//! block each other, and writers (`put`, `clear`) never leave a reader
//! observing a half-installed template.

use crate::config::Config;
use crate::template::TemplateRecord;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type CacheKey = (u32, u16);

#[derive(Default)]
struct Inner {
    templates: HashMap<CacheKey, Arc<TemplateRecord>>,
    /// Per-source install order, oldest first; only populated when the
    /// cache is configured with `max_templates_per_source`.
    install_order: HashMap<u32, Vec<u16>>,
}

/// The per-exporter template cache shared between a packet decoder and
/// whoever else needs to inspect learned templates (e.g. an exporter UI).
pub struct TemplateCache {
    inner: RwLock<Inner>,
    config: Config,
}

impl Default for TemplateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        TemplateCache {
            inner: RwLock::new(Inner::default()),
            config,
        }
    }

    /// Stores `template` under `(source_id, template.template_id)`,
    /// overwriting any prior entry (late-arriving redefinitions are
    /// honored, matching exporter-initiated template refresh).
    pub fn put(&self, source_id: u32, template: TemplateRecord) {
        let template_id = template.template_id;
        let mut inner = self.inner.write().expect("template cache lock poisoned");

        let is_redefinition = inner.templates.contains_key(&(source_id, template_id));
        inner
            .templates
            .insert((source_id, template_id), Arc::new(template));

        if let Some(max) = self.config.max_templates_per_source {
            let order = inner.install_order.entry(source_id).or_default();
            if !is_redefinition {
                order.push(template_id);
                while order.len() > max {
                    let evicted = order.remove(0);
                    inner.templates.remove(&(source_id, evicted));
                    warn!(
                        "evicted template {evicted} for source {source_id}: per-source cache cap {max} reached"
                    );
                }
            }
        }
        debug!("installed template {template_id} for source {source_id}");
    }

    /// Returns a shared, read-only view of the template, or `None` if this
    /// exporter has not (yet) sent it. Absence is an expected, recoverable
    /// condition, not an error.
    pub fn get(&self, source_id: u32, template_id: u16) -> Option<Arc<TemplateRecord>> {
        self.inner
            .read()
            .expect("template cache lock poisoned")
            .templates
            .get(&(source_id, template_id))
            .cloned()
    }

    /// A stable, point-in-time copy of every cached template, grouped by
    /// source. Does not alias the cache's internal mutable state.
    pub fn snapshot(&self) -> HashMap<u32, HashMap<u16, TemplateRecord>> {
        let inner = self.inner.read().expect("template cache lock poisoned");
        let mut by_source: HashMap<u32, HashMap<u16, TemplateRecord>> = HashMap::new();
        for ((source_id, template_id), template) in inner.templates.iter() {
            by_source
                .entry(*source_id)
                .or_default()
                .insert(*template_id, (**template).clone());
        }
        by_source
    }

    /// Drops every cached template.
    pub fn clear(&self) {
        let mut inner = self.inner.write().expect("template cache lock poisoned");
        inner.templates.clear();
        inner.install_order.clear();
    }
}
