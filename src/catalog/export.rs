//! Markdown text block for sharing one entry, ending with a relative despawn timestamp.

use std::fmt::Write as _;

use chrono::{DateTime, Duration, Utc};

use crate::catalog::record::EntityData;

/// Entries are assumed to despawn this long after being shared.
pub const DESPAWN_OFFSET_MINUTES: i64 = 75;

pub fn despawn_timestamp(now: DateTime<Utc>) -> i64 {
    (now + Duration::minutes(DESPAWN_OFFSET_MINUTES)).timestamp()
}

pub fn export_markdown(data: &EntityData, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "**{}**", data.name);

    let lines = data.location_lines();
    match data.map_link() {
        Some(map_link) if lines.len() >= 2 => {
            let _ = writeln!(out, "_{}_", lines[0]);
            let _ = writeln!(out, "_[{}]({map_link}) _", lines[1]);
            for line in lines[2..].iter().filter(|line| !line.trim().is_empty()) {
                let _ = writeln!(out, "_{line}_");
            }
        }
        _ => {
            let _ = writeln!(out, "_{}_", data.full_location.split('\n').collect::<Vec<_>>().join("_\n_"));
        }
    }
    if !data.hms.is_empty() {
        let _ = writeln!(out, "_{}_", data.hms);
    }

    let _ = write!(out, "\n`Egg group: {}`\n", data.egg_group);
    let _ = writeln!(out, "`Gender: {}`", data.gender);
    let _ = write!(out, "`Ability: {}`\n\n", data.ability);

    out.push_str("**MOVESET**\n");
    for item in data.moveset_items() {
        let _ = writeln!(out, "- {item}");
    }

    if let Some(notes) = data.notes() {
        out.push('\n');
        out.push_str(notes);
    }

    let _ = write!(
        out,
        "\n# -= Despawns approximately <t:{}:R> =- # ",
        despawn_timestamp(now)
    );
    out
}
