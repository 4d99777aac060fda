//! Catalog pipeline: normalize the authored dataset, filter, group, and project for display.

pub mod export;
pub mod filter;
pub mod group;
pub mod loader;
pub mod locations;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod registry;
pub mod render;
pub mod validate;

pub use filter::{filter, FilterCriteria, RegionFilter, ALL_REGIONS};
pub use group::{sort_and_group, Group, GroupMode};
pub use loader::{load_dataset, parse_dataset, CatalogError};
pub use normalize::normalize;
pub use pipeline::{render, RenderOutput, RenderedGroup};
pub use record::{EntityData, FlatRecord, RawDataset, RawEntry};
pub use registry::Catalog;
pub use render::{project, LocationDisplay, RenderRecord};
