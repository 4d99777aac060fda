//! `render(records, criteria, mode)`: filter, group, and project in one pass.

use serde::Serialize;

use crate::catalog::filter::{filter, FilterCriteria};
use crate::catalog::group::{sort_and_group, GroupMode};
use crate::catalog::record::FlatRecord;
use crate::catalog::render::{project, RenderRecord};

pub const EMPTY_RESULT_MESSAGE: &str = "No entries found matching your criteria.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedGroup {
    pub key: String,
    pub title: String,
    pub count: usize,
    pub records: Vec<RenderRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenderOutput {
    Groups {
        mode: GroupMode,
        total: usize,
        groups: Vec<RenderedGroup>,
    },
    Empty {
        message: &'static str,
    },
}

impl RenderOutput {
    pub fn is_empty(&self) -> bool {
        matches!(self, RenderOutput::Empty { .. })
    }

    pub fn groups(&self) -> &[RenderedGroup] {
        match self {
            RenderOutput::Groups { groups, .. } => groups,
            RenderOutput::Empty { .. } => &[],
        }
    }
}

pub fn render(records: &[FlatRecord], criteria: &FilterCriteria, mode: GroupMode) -> RenderOutput {
    let matched = filter(records, criteria);
    if matched.is_empty() {
        return RenderOutput::Empty {
            message: EMPTY_RESULT_MESSAGE,
        };
    }

    let total = matched.len();
    let groups = sort_and_group(&matched, mode)
        .into_iter()
        .map(|group| RenderedGroup {
            title: group.title(),
            count: group.count(),
            records: group.members.iter().map(|record| project(record, mode)).collect(),
            key: group.key,
        })
        .collect();

    RenderOutput::Groups { mode, total, groups }
}
