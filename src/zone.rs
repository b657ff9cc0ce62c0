//! The in-memory zone index: canonical owner name to the ordered list of
//! records declared there, with single-level wildcard fallback. Built once
//! at startup and read-only thereafter, replacing the teacher's
//! `PatriciaMap`-backed `zones.rs` (closest-encloser search this design
//! does not need — see DESIGN.md).

use std::collections::HashMap;

use crate::record::ZoneRecord;
use crate::utils::{has_leading_wildcard_label, labels, substitute_wildcard_target, wildcard_key};

#[derive(Debug, Default)]
pub struct Zone {
    records: HashMap<String, Vec<ZoneRecord>>,
}

impl Zone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ZoneRecord>) -> Self {
        let mut zone = Zone::new();
        for record in records {
            zone.records
                .entry(record.owner().to_string())
                .or_default()
                .push(record);
        }
        zone
    }

    /// Looks up the records to consider for a canonical query name: an
    /// exact match first, then a single-level wildcard projection.
    pub fn lookup(&self, canonical_query: &str) -> Vec<ZoneRecord> {
        if let Some(hit) = self.records.get(canonical_query) {
            return hit.clone();
        }
        let Some(key) = wildcard_key(canonical_query) else {
            return Vec::new();
        };
        let Some(hit) = self.records.get(&key) else {
            return Vec::new();
        };
        let Some(first_label) = labels(canonical_query).first().copied() else {
            return Vec::new();
        };
        hit.iter()
            .map(|record| project_wildcard(record, first_label))
            .collect()
    }
}

fn project_wildcard(record: &ZoneRecord, first_label: &str) -> ZoneRecord {
    match record {
        ZoneRecord::Cname { owner, target, ttl } if has_leading_wildcard_label(target) => {
            ZoneRecord::Cname {
                owner: owner.clone(),
                target: substitute_wildcard_target(target, first_label),
                ttl: *ttl,
            }
        }
        other => other.clone(),
    }
}
