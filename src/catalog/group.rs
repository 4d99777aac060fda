//! Deterministic ordering and the two grouping modes.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::record::{EntityData, FlatRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupMode {
    /// One group per entity name; members span regions and locations.
    ByName,
    /// One group per `"region - location"` pair.
    #[default]
    ByLocation,
}

impl GroupMode {
    /// Accepts `name`/`by_name`/`pokemon` and `location`/`by_location`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" | "by_name" | "pokemon" => Some(GroupMode::ByName),
            "location" | "by_location" | "" => Some(GroupMode::ByLocation),
            _ => None,
        }
    }

    pub fn key_for(self, record: &FlatRecord) -> String {
        match self {
            GroupMode::ByName => record.data.name.clone(),
            GroupMode::ByLocation => record.region_location(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a> {
    pub key: String,
    pub members: Vec<&'a FlatRecord>,
}

impl Group<'_> {
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Accordion header text, e.g. `"Kanto - Route 1 (3)"`.
    pub fn title(&self) -> String {
        format!("{} ({})", self.key, self.count())
    }
}

/// Region, then location, then name. The remaining fields break ties so that duplicate names
/// at one location still order the same regardless of input order.
pub fn compare_records(a: &FlatRecord, b: &FlatRecord) -> Ordering {
    a.region
        .cmp(&b.region)
        .then_with(|| a.location.cmp(&b.location))
        .then_with(|| a.data.name.cmp(&b.data.name))
        .then_with(|| detail_key(&a.data).cmp(&detail_key(&b.data)))
}

fn detail_key(data: &EntityData) -> [&str; 8] {
    [
        data.full_location.as_str(),
        data.map_link.as_deref().unwrap_or(""),
        data.hms.as_str(),
        data.egg_group.as_str(),
        data.gender.as_str(),
        data.ability.as_str(),
        data.moveset.as_str(),
        data.notes.as_deref().unwrap_or(""),
    ]
}

pub fn sort_records(records: &mut [&FlatRecord]) {
    records.sort_by(|a, b| compare_records(a, b));
}

/// Sort, then partition into groups emitted in lexicographic key order.
pub fn sort_and_group<'a>(records: &[&'a FlatRecord], mode: GroupMode) -> Vec<Group<'a>> {
    let mut sorted = records.to_vec();
    sort_records(&mut sorted);

    let mut grouped: BTreeMap<String, Vec<&'a FlatRecord>> = BTreeMap::new();
    for record in sorted {
        grouped.entry(mode.key_for(record)).or_default().push(record);
    }

    grouped
        .into_iter()
        .map(|(key, members)| Group { key, members })
        .collect()
}
