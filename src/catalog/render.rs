//! Display-ready projection of one record. Pure: output depends only on the record and mode.

use serde::Serialize;

use crate::catalog::group::GroupMode;
use crate::catalog::record::FlatRecord;

/// Joins location lines on one display line.
pub const LOCATION_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationDisplay {
    /// All `Full Location` lines joined with the separator.
    Plain { text: String },
    /// First line plain, second line opens the map preview, then the remaining non-blank lines.
    WithMap {
        first_line: String,
        map_label: String,
        map_url: String,
        rest: Vec<String>,
    },
}

impl LocationDisplay {
    pub fn to_text(&self) -> String {
        match self {
            LocationDisplay::Plain { text } => text.clone(),
            LocationDisplay::WithMap {
                first_line,
                map_label,
                rest,
                ..
            } => std::iter::once(first_line.as_str())
                .chain(std::iter::once(map_label.as_str()))
                .chain(rest.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join(LOCATION_SEPARATOR),
        }
    }

    pub fn map_url(&self) -> Option<&str> {
        match self {
            LocationDisplay::WithMap { map_url, .. } => Some(map_url),
            LocationDisplay::Plain { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderRecord {
    /// Whichever of name / `"region - location"` is not the group key.
    pub title: String,
    pub name: String,
    pub region: String,
    pub location_name: String,
    pub location: LocationDisplay,
    pub hms: String,
    pub egg_group: String,
    pub gender: String,
    pub ability: String,
    pub moveset_items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub fn project(record: &FlatRecord, mode: GroupMode) -> RenderRecord {
    let data = &record.data;
    let title = match mode {
        GroupMode::ByName => record.region_location(),
        GroupMode::ByLocation => data.name.clone(),
    };

    RenderRecord {
        title,
        name: data.name.clone(),
        region: record.region.clone(),
        location_name: record.location.clone(),
        location: location_display(record),
        hms: data.hms.clone(),
        egg_group: data.egg_group.clone(),
        gender: data.gender.clone(),
        ability: data.ability.clone(),
        moveset_items: data.moveset_items(),
        notes: data.notes().map(str::to_string),
    }
}

fn location_display(record: &FlatRecord) -> LocationDisplay {
    let lines = record.data.location_lines();
    match record.data.map_link() {
        Some(map_url) if lines.len() >= 2 => LocationDisplay::WithMap {
            first_line: lines[0].to_string(),
            map_label: lines[1].to_string(),
            map_url: map_url.to_string(),
            rest: lines[2..]
                .iter()
                .filter(|line| !line.trim().is_empty())
                .map(|line| line.to_string())
                .collect(),
        },
        _ => LocationDisplay::Plain {
            text: lines.join(LOCATION_SEPARATOR),
        },
    }
}
