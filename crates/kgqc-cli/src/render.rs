//! Plain-text rendering of a QC report.

use kgqc_core::{QcReport, Record};
use serde_json::Value;

fn count(record: &Record, field: &str) -> Option<u64> {
    record.get(field).and_then(Value::as_u64)
}

fn label(record: &Record, field: &str) -> String {
    match record.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "?".to_string(),
    }
}

/// Records of a nested container, whichever storage mode produced it.
fn nested_records(value: Option<&Value>) -> Vec<&Record> {
    match value {
        Some(Value::Object(map)) => map.values().filter_map(Value::as_object).collect(),
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
        _ => Vec::new(),
    }
}

fn group_line(record: &Record) -> String {
    let mut line = format!(
        "  {}  total={}",
        label(record, "name"),
        count(record, "total_number").unwrap_or(0)
    );
    if let Some(missing) = count(record, "missing") {
        line.push_str(&format!("  missing={missing}"));
    }
    if let Some(Value::Array(ns)) = record.get("namespaces") {
        let ns: Vec<&str> = ns.iter().filter_map(Value::as_str).collect();
        line.push_str(&format!("  namespaces=[{}]", ns.join(", ")));
    }
    line
}

pub fn render_report_text(report: &QcReport) -> String {
    let mut out = String::new();
    for (section, container) in report.sections() {
        let n = container.len();
        out.push_str(&format!(
            "{section} ({n} group{})\n",
            if n == 1 { "" } else { "s" }
        ));
        for record in container.records() {
            out.push_str(&group_line(record));
            out.push('\n');
            for predicate in nested_records(record.get("predicates")) {
                out.push_str(&format!(
                    "    predicate {}  total={}  missing_subjects={}  missing_objects={}\n",
                    label(predicate, "uri"),
                    count(predicate, "total_number").unwrap_or(0),
                    count(predicate, "missing_subjects").unwrap_or(0),
                    count(predicate, "missing_objects").unwrap_or(0),
                ));
            }
        }
    }
    out
}
