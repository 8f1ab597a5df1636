//! QC report orchestration over a merged graph and its merge-stage QC tables.

use serde::{Deserialize, Serialize};

use crate::container::{ReportContainer, StorageMode};
use crate::error::Result;
use crate::model::{MergeQc, MergedKg};
use crate::report::columns::{CATEGORY, IN_TAXON, PROVIDED_BY};
use crate::report::{build_edge_report, build_node_report};
use crate::table::Table;

pub const MISSING_TAXON: &str = "missing taxon";
pub const MISSING_CATEGORY: &str = "missing category";

/// Options for [`build_qc_report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QcReportOptions {
    /// Storage mode of every container in the report, nested ones included.
    pub storage_mode: StorageMode,
    /// Column used to group nodes and edges.
    pub group_by: String,
}

impl Default for QcReportOptions {
    fn default() -> Self {
        Self {
            storage_mode: StorageMode::Keyed,
            group_by: PROVIDED_BY.to_string(),
        }
    }
}

/// The five report sections, serialized under fixed keys.
#[derive(Debug, Clone, Serialize)]
pub struct QcReport {
    pub nodes: ReportContainer,
    pub duplicate_nodes: ReportContainer,
    pub edges: ReportContainer,
    pub dangling_edges: ReportContainer,
    pub duplicate_edges: ReportContainer,
}

impl QcReport {
    /// Sections in serialization order.
    pub fn sections(&self) -> [(&'static str, &ReportContainer); 5] {
        [
            ("nodes", &self.nodes),
            ("duplicate_nodes", &self.duplicate_nodes),
            ("edges", &self.edges),
            ("dangling_edges", &self.dangling_edges),
            ("duplicate_edges", &self.duplicate_edges),
        ]
    }

    /// Summed `missing` endpoint counts of each edge section.
    pub fn missing_endpoints(&self) -> [(&'static str, u64); 3] {
        let total = |c: &ReportContainer| -> u64 {
            c.records()
                .filter_map(|r| r.get("missing").and_then(|v| v.as_u64()))
                .sum()
        };
        [
            ("edges", total(&self.edges)),
            ("dangling_edges", total(&self.dangling_edges)),
            ("duplicate_edges", total(&self.duplicate_edges)),
        ]
    }
}

/// Working copy of `nodes` with absent `in_taxon` / `category` cells filled.
pub fn fill_missing_node_values(nodes: &Table) -> Table {
    nodes.fill_nulls(&[(IN_TAXON, MISSING_TAXON), (CATEGORY, MISSING_CATEGORY)])
}

/// Build the full QC report. The caller's tables are never modified.
pub fn build_qc_report(kg: &MergedKg, qc: &MergeQc, options: &QcReportOptions) -> Result<QcReport> {
    let mode = options.storage_mode;
    let group_by = options.group_by.as_str();
    tracing::info!(
        nodes = kg.nodes.height(),
        edges = kg.edges.height(),
        duplicate_nodes = qc.duplicate_nodes.height(),
        duplicate_edges = qc.duplicate_edges.height(),
        dangling_edges = qc.dangling_edges.height(),
        %mode,
        group_by,
        "building qc report"
    );

    let nodes = fill_missing_node_values(&kg.nodes);

    let report = QcReport {
        nodes: build_node_report(&nodes, None, mode, group_by)?,
        duplicate_nodes: build_node_report(&qc.duplicate_nodes, None, mode, group_by)?,
        edges: build_edge_report(&kg.edges, &nodes, mode, group_by)?,
        dangling_edges: build_edge_report(&qc.dangling_edges, &nodes, mode, group_by)?,
        duplicate_edges: build_edge_report(&qc.duplicate_edges, &nodes, mode, group_by)?,
    };

    let [edges, dangling_edges, duplicate_edges] = report.missing_endpoints().map(|(_, n)| n);
    if edges + dangling_edges + duplicate_edges > 0 {
        tracing::warn!(
            edges,
            dangling_edges,
            duplicate_edges,
            "edge sections reference node ids absent from the node table"
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fills_nulls_on_a_copy() {
        let nodes = Table::from_rows(
            &["id", "category", "in_taxon", "provided_by"],
            &[vec![Some("A:1"), None, None, Some("src1")]],
        )
        .unwrap();
        let filled = fill_missing_node_values(&nodes);
        assert_eq!(filled.column("category").unwrap().get(0), Some(MISSING_CATEGORY));
        assert_eq!(filled.column("in_taxon").unwrap().get(0), Some(MISSING_TAXON));
        assert_eq!(nodes.column("category").unwrap().get(0), None);
    }

    #[test]
    fn filled_values_reach_the_node_report() {
        let nodes = Table::from_rows(
            &["id", "category", "in_taxon", "provided_by"],
            &[vec![Some("A:1"), None, None, Some("src1")]],
        )
        .unwrap();
        let kg = MergedKg::new(nodes, Table::default());
        let report = build_qc_report(&kg, &MergeQc::default(), &QcReportOptions::default()).unwrap();
        let src1 = report.nodes.get("src1").unwrap();
        assert_eq!(src1["categories"], json!([MISSING_CATEGORY]));
        assert_eq!(src1["taxon"], json!([MISSING_TAXON]));
    }

    #[test]
    fn duplicate_nodes_are_not_filled() {
        let dups = Table::from_rows(
            &["id", "category", "provided_by"],
            &[vec![Some("A:1"), None, Some("src1")]],
        )
        .unwrap();
        let qc = MergeQc::new(dups, Table::default(), Table::default());
        let report = build_qc_report(&MergedKg::default(), &qc, &QcReportOptions::default()).unwrap();
        assert_eq!(report.duplicate_nodes.get("src1").unwrap()["categories"], json!([]));
    }

    #[test]
    fn missing_endpoints_are_counted_per_edge_section() {
        let nodes = Table::from_rows(&["id", "provided_by"], &[vec![Some("A:1"), Some("src1")]])
            .unwrap();
        let edge_cols = ["id", "subject", "object", "predicate", "provided_by"];
        let edges = Table::from_rows(
            &edge_cols,
            &[vec![Some("e1"), Some("A:1"), Some("A:1"), Some("p"), Some("src1")]],
        )
        .unwrap();
        let dangling = Table::from_rows(
            &edge_cols,
            &[
                vec![Some("e2"), Some("A:1"), Some("B:1"), Some("p"), Some("src1")],
                vec![Some("e3"), Some("B:2"), Some("B:1"), Some("p"), Some("src2")],
            ],
        )
        .unwrap();
        let kg = MergedKg::new(nodes, edges);
        let qc = MergeQc::new(Table::default(), Table::default(), dangling);
        let report = build_qc_report(&kg, &qc, &QcReportOptions::default()).unwrap();
        assert_eq!(
            report.missing_endpoints(),
            [("edges", 0), ("dangling_edges", 3), ("duplicate_edges", 0)]
        );
    }

    #[test]
    fn storage_mode_reaches_every_section() {
        let nodes = Table::from_rows(&["id", "provided_by"], &[vec![Some("A:1"), Some("src1")]])
            .unwrap();
        let edges = Table::from_rows(
            &["id", "subject", "object", "predicate", "provided_by"],
            &[vec![Some("e1"), Some("A:1"), Some("A:1"), Some("p"), Some("src1")]],
        )
        .unwrap();
        let kg = MergedKg::new(nodes, edges);
        let options = QcReportOptions {
            storage_mode: StorageMode::Sequence,
            ..QcReportOptions::default()
        };
        let report = build_qc_report(&kg, &MergeQc::default(), &options).unwrap();
        for (_, section) in report.sections() {
            assert_eq!(section.mode(), StorageMode::Sequence);
        }
        let group = report.edges.records().next().unwrap();
        assert!(group["predicates"].is_array());
        assert!(group["node_types"].is_array());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: QcReportOptions = serde_json::from_str(r#"{"storage_mode": "list"}"#).unwrap();
        assert_eq!(opts.storage_mode, StorageMode::Sequence);
        assert_eq!(opts.group_by, "provided_by");
    }

    #[test]
    fn report_serializes_fixed_top_level_keys() {
        let report =
            build_qc_report(&MergedKg::default(), &MergeQc::default(), &QcReportOptions::default())
                .unwrap();
        let value = serde_json::to_value(&report).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        let mut expected = vec![
            "dangling_edges",
            "duplicate_edges",
            "duplicate_nodes",
            "edges",
            "nodes",
        ];
        expected.sort();
        assert_eq!(keys, expected);
    }
}
