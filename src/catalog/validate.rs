//! Structural checks on an authored dataset file, reported as severity-tagged diagnostics.

use std::fmt;
use std::fs;

use serde::Serialize;
use serde_json::Value;

use crate::catalog::record::RawEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub entries_checked: usize,
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

pub fn validate_dataset_file(path: &str) -> Result<ValidationReport, String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("unable to read '{path}': {err}"))?;
    let payload: Value = serde_json::from_str(&raw)
        .map_err(|err| format!("unable to parse json '{path}': {err}"))?;
    Ok(validate_dataset(&payload))
}

pub fn validate_dataset(payload: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(regions) = payload.as_object() else {
        report.push(
            ValidationSeverity::Error,
            "dataset",
            "expected top-level object keyed by region",
        );
        return report;
    };

    for (region, locations) in regions {
        if region.trim().is_empty() {
            report.push(ValidationSeverity::Error, "dataset", "empty region name");
        }
        let Some(locations) = locations.as_object() else {
            report.push(
                ValidationSeverity::Error,
                region.as_str(),
                "expected object keyed by location",
            );
            continue;
        };

        for (location, entries) in locations {
            let context = format!("{region}/{location}");
            if location.trim().is_empty() {
                report.push(ValidationSeverity::Error, region.as_str(), "empty location name");
            }
            let Some(entries) = entries.as_array() else {
                report.push(ValidationSeverity::Error, context, "expected array of entries");
                continue;
            };
            for (index, entry) in entries.iter().enumerate() {
                report.entries_checked += 1;
                validate_entry(&mut report, &format!("{context}[{index}]"), entry);
            }
        }
    }

    report
}

fn validate_entry(report: &mut ValidationReport, context: &str, entry: &Value) {
    // Decoded exactly as normalization decodes it.
    let Some(data) = RawEntry::from(entry.clone()).data else {
        report.push(
            ValidationSeverity::Warning,
            context,
            "missing or unreadable 'data' object; entry will be skipped",
        );
        return;
    };

    if data.name.is_empty() {
        report.push(
            ValidationSeverity::Warning,
            context,
            "missing 'Name'; entry will be skipped",
        );
        return;
    }
    let context = format!("{context} ({})", data.name);

    if let Some(map_link) = data.map_link() {
        if !(map_link.starts_with("http://") || map_link.starts_with("https://")) {
            report.push(
                ValidationSeverity::Warning,
                context.as_str(),
                format!("'Map Link' is not an http(s) URL: '{map_link}'"),
            );
        }
        if data.location_lines().len() < 2 {
            report.push(
                ValidationSeverity::Info,
                context.as_str(),
                "'Map Link' is ignored because 'Full Location' has fewer than two lines",
            );
        }
    }

    if data.moveset_items().is_empty() {
        report.push(ValidationSeverity::Info, context, "missing 'Moveset'");
    }
}
