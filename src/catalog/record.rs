//! Dataset shapes: the nested authored document and the flat per-entry records derived from it.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Region -> location -> entries, in authored key order.
pub type RawDataset = IndexMap<String, IndexMap<String, Vec<RawEntry>>>;

/// One authored entry. Anything that is not `{ "data": { ... } }` keeps `data` as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct RawEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<EntityData>,
}

impl From<Value> for RawEntry {
    fn from(value: Value) -> Self {
        let data = match value {
            Value::Object(mut object) => match object.remove("data") {
                Some(data @ Value::Object(_)) => serde_json::from_value(data).ok(),
                _ => None,
            },
            _ => None,
        };
        RawEntry { data }
    }
}

/// Per-entity fields. Missing or null values read as empty; numbers and bools are stringified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    #[serde(rename = "Name", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "Full Location", default, deserialize_with = "lenient_string")]
    pub full_location: String,
    #[serde(
        rename = "Map Link",
        default,
        deserialize_with = "lenient_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub map_link: Option<String>,
    #[serde(rename = "HMs", default, deserialize_with = "lenient_string")]
    pub hms: String,
    #[serde(rename = "Egg Group", default, deserialize_with = "lenient_string")]
    pub egg_group: String,
    #[serde(rename = "Gender", default, deserialize_with = "lenient_string")]
    pub gender: String,
    #[serde(rename = "Ability", default, deserialize_with = "lenient_string")]
    pub ability: String,
    #[serde(rename = "Moveset", default, deserialize_with = "lenient_string")]
    pub moveset: String,
    #[serde(
        rename = "Notes",
        default,
        deserialize_with = "lenient_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    /// Authored keys this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EntityData {
    pub fn named(name: impl Into<String>) -> Self {
        EntityData {
            name: name.into(),
            ..EntityData::default()
        }
    }

    /// `Full Location` split on line breaks. Empty input yields no lines.
    pub fn location_lines(&self) -> Vec<&str> {
        if self.full_location.is_empty() {
            Vec::new()
        } else {
            self.full_location.split('\n').collect()
        }
    }

    pub fn map_link(&self) -> Option<&str> {
        self.map_link.as_deref().filter(|link| !link.is_empty())
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref().filter(|notes| !notes.is_empty())
    }

    /// Non-blank moveset lines with surrounding whitespace and a leading dash removed.
    pub fn moveset_items(&self) -> Vec<String> {
        self.moveset
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.strip_prefix('-').unwrap_or(line).trim().to_string())
            .collect()
    }
}

/// One entity annotated with where it was authored. Never mutated after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatRecord {
    pub data: EntityData,
    pub region: String,
    pub location: String,
}

impl FlatRecord {
    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// `"region - location"`, the location-mode group key.
    pub fn region_location(&self) -> String {
        format!("{} - {}", self.region, self.location)
    }
}

fn stringify(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .map(stringify)
        .unwrap_or_default())
}

fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .map(stringify)
        .filter(|text| !text.is_empty()))
}
