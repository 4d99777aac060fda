//! Region list and location suggestions for the current region selection.

use serde::Serialize;

use crate::catalog::filter::{composite_location_label, RegionFilter};
use crate::catalog::record::RawDataset;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationOption {
    pub region: String,
    pub location: String,
    /// Value offered to the location filter: bare location for one region, `"[R] location"` for all.
    pub label: String,
}

/// Region names in dataset order.
pub fn regions(dataset: &RawDataset) -> Vec<String> {
    dataset.keys().cloned().collect()
}

pub fn location_options(dataset: &RawDataset, region: &RegionFilter) -> Vec<LocationOption> {
    match region {
        RegionFilter::Only(name) => {
            let Some(locations) = dataset.get(name) else {
                return Vec::new();
            };
            let mut names: Vec<&String> = locations.keys().collect();
            names.sort();
            names
                .into_iter()
                .map(|location| LocationOption {
                    region: name.clone(),
                    location: location.clone(),
                    label: location.clone(),
                })
                .collect()
        }
        RegionFilter::All => {
            let mut options: Vec<(usize, LocationOption)> = dataset
                .iter()
                .enumerate()
                .flat_map(|(position, (region, locations))| {
                    locations.keys().map(move |location| {
                        (
                            position,
                            LocationOption {
                                region: region.clone(),
                                location: location.clone(),
                                label: composite_location_label(region, location),
                            },
                        )
                    })
                })
                .collect();
            options.sort_by(|(pa, a), (pb, b)| pa.cmp(pb).then_with(|| a.location.cmp(&b.location)));
            options.into_iter().map(|(_, option)| option).collect()
        }
    }
}
