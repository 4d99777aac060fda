//! Conjunctive name/region/location filtering over flat records.

use serde::{Deserialize, Serialize};

use crate::catalog::record::FlatRecord;

/// Region selector value meaning "every region".
pub const ALL_REGIONS: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionFilter {
    #[default]
    All,
    Only(String),
}

impl RegionFilter {
    /// `"all"` and the empty string select every region; anything else is an exact region name.
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value == ALL_REGIONS {
            RegionFilter::All
        } else {
            RegionFilter::Only(value.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, RegionFilter::All)
    }

    pub fn admits(&self, region: &str) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Only(selected) => selected == region,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RegionFilter::All => ALL_REGIONS,
            RegionFilter::Only(region) => region,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_term: String,
    pub region: RegionFilter,
    pub location: String,
}

impl FilterCriteria {
    pub fn new(search_term: &str, region: &str, location: &str) -> Self {
        FilterCriteria {
            search_term: search_term.to_string(),
            region: RegionFilter::parse(region),
            location: location.to_string(),
        }
    }
}

/// `"[K]"` for `"Kanto"`: the upper-cased first character in brackets.
pub fn region_tag(region: &str) -> String {
    let letter: String = region.chars().next().into_iter().flat_map(char::to_uppercase).collect();
    format!("[{letter}]")
}

/// Location label used when every region is listed, e.g. `"[K] Route 1"`.
pub fn composite_location_label(region: &str, location: &str) -> String {
    format!("{} {location}", region_tag(region))
}

pub fn matches(record: &FlatRecord, criteria: &FilterCriteria) -> bool {
    let search = criteria.search_term.to_lowercase();
    if !record.data.name.to_lowercase().contains(&search) {
        return false;
    }
    if !criteria.region.admits(&record.region) {
        return false;
    }
    location_matches(record, criteria)
}

fn location_matches(record: &FlatRecord, criteria: &FilterCriteria) -> bool {
    if criteria.location.is_empty() {
        return true;
    }
    let needle = criteria.location.to_lowercase();
    let haystack = if criteria.region.is_all() {
        composite_location_label(&record.region, &record.location)
    } else {
        record.location.clone()
    };
    haystack.to_lowercase().contains(&needle)
}

/// Records matching every active criterion, in their original relative order.
pub fn filter<'a>(records: &'a [FlatRecord], criteria: &FilterCriteria) -> Vec<&'a FlatRecord> {
    records
        .iter()
        .filter(|record| matches(record, criteria))
        .collect()
}
