use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::export::export_markdown;
use crate::catalog::filter::{FilterCriteria, RegionFilter};
use crate::catalog::group::GroupMode;
use crate::catalog::locations::LocationOption;
use crate::catalog::Catalog;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown grouping '{0}', expected 'name' or 'location'")]
    InvalidGroupMode(String),
    #[error("no entry named '{name}' at {region} - {location}")]
    NotFound {
        region: String,
        location: String,
        name: String,
    },
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub group: String,
}

impl CatalogQuery {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(&self.search, &self.region, &self.location)
    }

    pub fn mode(&self) -> Result<GroupMode, ApiError> {
        GroupMode::parse(&self.group).ok_or_else(|| ApiError::InvalidGroupMode(self.group.clone()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationsQuery {
    #[serde(default)]
    pub region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportQuery {
    pub region: String,
    pub location: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationsResponse {
    pub region: String,
    pub locations: Vec<LocationOption>,
}

pub fn health_payload(catalog: Option<&Catalog>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "alphalist",
        "version": env!("CARGO_PKG_VERSION"),
        "catalog": if catalog.is_some() { "ready" } else { "unavailable" },
        "records": catalog.map_or(0, |c| c.records().len()),
    }))
}

pub fn regions_payload(catalog: &Catalog) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({ "regions": catalog.regions() }))
}

pub fn locations_payload(catalog: &Catalog, query: &LocationsQuery) -> Result<String, serde_json::Error> {
    let region = RegionFilter::parse(&query.region);
    serde_json::to_string_pretty(&LocationsResponse {
        region: region.as_str().to_string(),
        locations: catalog.location_options(&region),
    })
}

pub fn catalog_payload(catalog: &Catalog, query: &CatalogQuery) -> Result<String, ApiError> {
    let mode = query.mode()?;
    let output = catalog.render(&query.criteria(), mode);
    Ok(serde_json::to_string_pretty(&output)?)
}

pub fn export_text(catalog: &Catalog, query: &ExportQuery, now: DateTime<Utc>) -> Result<String, ApiError> {
    let record = catalog
        .find(&query.region, &query.location, &query.name)
        .ok_or_else(|| ApiError::NotFound {
            region: query.region.clone(),
            location: query.location.clone(),
            name: query.name.clone(),
        })?;
    Ok(export_markdown(&record.data, now))
}
