//! Flatten the region -> location -> entries document into a list of annotated records.

use crate::catalog::record::{FlatRecord, RawDataset};

/// Flatten in traversal order (region, then location, then entry). Entries without data or
/// without a name are skipped, as are entries keyed under an empty region or location.
pub fn normalize(dataset: &RawDataset) -> Vec<FlatRecord> {
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (region, locations) in dataset {
        for (location, entries) in locations {
            for entry in entries {
                let Some(data) = entry.data.as_ref() else {
                    dropped += 1;
                    continue;
                };
                if data.name.is_empty() || region.is_empty() || location.is_empty() {
                    dropped += 1;
                    continue;
                }
                records.push(FlatRecord {
                    data: data.clone(),
                    region: region.clone(),
                    location: location.clone(),
                });
            }
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, kept = records.len(), "skipped entries without a name");
    }
    records
}
