//! Load-once catalog shared read-only by the server and CLI.

use std::path::Path;
use std::sync::Arc;

use crate::catalog::filter::{FilterCriteria, RegionFilter};
use crate::catalog::group::GroupMode;
use crate::catalog::loader::{load_dataset, CatalogError};
use crate::catalog::locations::{location_options, regions, LocationOption};
use crate::catalog::normalize::normalize;
use crate::catalog::pipeline::{render, RenderOutput};
use crate::catalog::record::{FlatRecord, RawDataset};

/// The authored dataset (kept for region and location ordering) plus its flattened records.
#[derive(Debug)]
pub struct Catalog {
    dataset: RawDataset,
    records: Vec<FlatRecord>,
}

impl Catalog {
    pub fn from_dataset(dataset: RawDataset) -> Self {
        let records = normalize(&dataset);
        Catalog { dataset, records }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Arc<Catalog>, CatalogError> {
        let catalog = Catalog::from_dataset(load_dataset(path)?);
        tracing::info!(records = catalog.records.len(), "catalog ready");
        Ok(Arc::new(catalog))
    }

    pub fn dataset(&self) -> &RawDataset {
        &self.dataset
    }

    pub fn records(&self) -> &[FlatRecord] {
        &self.records
    }

    pub fn regions(&self) -> Vec<String> {
        regions(&self.dataset)
    }

    pub fn location_options(&self, region: &RegionFilter) -> Vec<LocationOption> {
        location_options(&self.dataset, region)
    }

    pub fn render(&self, criteria: &FilterCriteria, mode: GroupMode) -> RenderOutput {
        render(&self.records, criteria, mode)
    }

    /// First record with this exact region, location and name.
    pub fn find(&self, region: &str, location: &str, name: &str) -> Option<&FlatRecord> {
        self.records
            .iter()
            .find(|r| r.region == region && r.location == location && r.data.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::loader::parse_dataset;

    #[test]
    fn find_requires_exact_coordinates() {
        let catalog = Catalog::from_dataset(
            parse_dataset(r#"{"Kanto": {"Route 1": [{"data": {"Name": "Rattata"}}]}}"#)
                .expect("dataset should parse"),
        );
        assert!(catalog.find("Kanto", "Route 1", "Rattata").is_some());
        assert!(catalog.find("Kanto", "Route 1", "rattata").is_none());
        assert!(catalog.find("Johto", "Route 1", "Rattata").is_none());
        assert_eq!(catalog.regions(), vec!["Kanto"]);
    }
}
