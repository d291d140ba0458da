use std::fmt::Write as _;

use eldensave_core::core_api::{BackupEntry, FlagBatchOutcome, FlagCatalog, FlagState, SlotSummary};
use eldensave_core::sl2::checksum::ValidationReport;
use serde_json::{Map as JsonMap, Value as JsonValue};

const EMPTY_SLOT_LABEL: &str = "(empty)";
const UNNAMED_FLAG_LABEL: &str = "(undocumented)";

pub fn render_slots_json(slots: &[SlotSummary]) -> JsonValue {
    JsonValue::Array(
        slots
            .iter()
            .map(|slot| {
                let mut m = JsonMap::new();
                m.insert("slot".to_string(), JsonValue::from(slot.index + 1));
                m.insert("occupied".to_string(), JsonValue::Bool(slot.occupied));
                if slot.occupied {
                    m.insert("name".to_string(), JsonValue::String(slot.name.clone()));
                    m.insert("level".to_string(), JsonValue::from(slot.level));
                }
                JsonValue::Object(m)
            })
            .collect(),
    )
}

pub fn render_slots_text(slots: &[SlotSummary]) -> String {
    let mut out = String::new();
    writeln!(&mut out, "Slot  Character            Level").expect("writing to String cannot fail");
    for slot in slots {
        if slot.occupied {
            writeln!(
                &mut out,
                "{:>4}  {:<20} {:>5}",
                slot.index + 1,
                fit_column(&slot.name, 20),
                slot.level
            )
            .expect("writing to String cannot fail");
        } else {
            writeln!(&mut out, "{:>4}  {EMPTY_SLOT_LABEL}", slot.index + 1)
                .expect("writing to String cannot fail");
        }
    }
    out
}

pub fn render_flags_json(flags: &[FlagState], catalog: &FlagCatalog) -> JsonValue {
    JsonValue::Array(
        flags
            .iter()
            .map(|flag| {
                let mut m = JsonMap::new();
                m.insert("flag_id".to_string(), JsonValue::from(flag.flag_id));
                m.insert(
                    "value".to_string(),
                    match flag.value {
                        Some(v) => JsonValue::Bool(v),
                        None => JsonValue::Null,
                    },
                );
                if let Some(name) = catalog.name(flag.flag_id) {
                    m.insert("name".to_string(), JsonValue::String(name.to_string()));
                }
                JsonValue::Object(m)
            })
            .collect(),
    )
}

pub fn render_flags_text(flags: &[FlagState], catalog: &FlagCatalog) -> String {
    let mut out = String::new();
    for flag in flags {
        let state = match flag.value {
            Some(true) => "ON",
            Some(false) => "OFF",
            None => "OUT OF RANGE",
        };
        let name = catalog.name(flag.flag_id).unwrap_or(UNNAMED_FLAG_LABEL);
        writeln!(&mut out, "{}: [{state}] {name}", flag.flag_id)
            .expect("writing to String cannot fail");
    }
    out
}

pub fn render_validation_json(report: &ValidationReport) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert(
        "all_match".to_string(),
        JsonValue::Bool(report.all_match()),
    );
    m.insert(
        "regions".to_string(),
        JsonValue::Array(
            report
                .regions
                .iter()
                .map(|region| {
                    let mut r = JsonMap::new();
                    r.insert(
                        "region".to_string(),
                        JsonValue::String(region.region.label()),
                    );
                    r.insert("matches".to_string(), JsonValue::Bool(region.matches));
                    r.insert("stored".to_string(), JsonValue::String(region.stored.clone()));
                    r.insert(
                        "computed".to_string(),
                        JsonValue::String(region.computed.clone()),
                    );
                    JsonValue::Object(r)
                })
                .collect(),
        ),
    );
    JsonValue::Object(m)
}

pub fn render_validation_text(report: &ValidationReport) -> String {
    let mut out = String::new();
    for region in &report.regions {
        if region.matches {
            writeln!(&mut out, "{}: ok", region.region.label())
                .expect("writing to String cannot fail");
        } else {
            writeln!(
                &mut out,
                "{}: MISMATCH (stored {}, computed {})",
                region.region.label(),
                region.stored,
                region.computed
            )
            .expect("writing to String cannot fail");
        }
    }
    if report.all_match() {
        writeln!(&mut out, "all checksums match").expect("writing to String cannot fail");
    }
    out
}

pub fn render_backups_json(backups: &[BackupEntry]) -> JsonValue {
    JsonValue::Array(
        backups
            .iter()
            .map(|backup| {
                let mut m = JsonMap::new();
                m.insert(
                    "timestamp".to_string(),
                    JsonValue::String(backup.timestamp.to_string()),
                );
                m.insert(
                    "description".to_string(),
                    JsonValue::String(backup.description.clone()),
                );
                m.insert(
                    "operation".to_string(),
                    JsonValue::String(backup.operation.clone()),
                );
                m.insert(
                    "source_path".to_string(),
                    JsonValue::String(backup.source_path.clone()),
                );
                m.insert(
                    "original_len".to_string(),
                    JsonValue::from(backup.original_len),
                );
                JsonValue::Object(m)
            })
            .collect(),
    )
}

pub fn render_backups_text(backups: &[BackupEntry]) -> String {
    if backups.is_empty() {
        return "no backups\n".to_string();
    }

    let mut out = String::new();
    for backup in backups {
        writeln!(
            &mut out,
            "{}  {:<28} {}",
            backup.timestamp,
            fit_column(&backup.operation, 28),
            backup.description
        )
        .expect("writing to String cannot fail");
    }
    out
}

pub fn render_outcome_json(outcome: &FlagBatchOutcome) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("requested".to_string(), JsonValue::from(outcome.requested));
    m.insert("applied".to_string(), JsonValue::from(outcome.applied));
    m.insert(
        "skipped".to_string(),
        JsonValue::Array(outcome.skipped.iter().map(|&id| JsonValue::from(id)).collect()),
    );
    JsonValue::Object(m)
}

pub fn render_outcome_text(outcome: &FlagBatchOutcome) -> String {
    if outcome.all_applied() {
        return format!("applied {}/{} flags\n", outcome.applied, outcome.requested);
    }

    let skipped: Vec<String> = outcome.skipped.iter().map(|id| id.to_string()).collect();
    format!(
        "applied {}/{} flags (out of range: {})\n",
        outcome.applied,
        outcome.requested,
        skipped.join(", ")
    )
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut out = String::with_capacity(width);
    for ch in value.chars().take(width - 3) {
        out.push(ch);
    }
    out.push_str("...");
    out
}
