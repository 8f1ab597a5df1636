//! Inputs of a QC run: the merged graph and the merge-stage QC tables.

use crate::table::Table;

/// Merged knowledge graph: one node table and one edge table.
#[derive(Debug, Clone, Default)]
pub struct MergedKg {
    pub nodes: Table,
    pub edges: Table,
}

impl MergedKg {
    pub fn new(nodes: Table, edges: Table) -> Self {
        Self { nodes, edges }
    }
}

/// Auxiliary tables produced by the merge step.
///
/// Node-shaped: `duplicate_nodes`. Edge-shaped: `duplicate_edges`,
/// `dangling_edges`.
#[derive(Debug, Clone, Default)]
pub struct MergeQc {
    pub duplicate_nodes: Table,
    pub duplicate_edges: Table,
    pub dangling_edges: Table,
}

impl MergeQc {
    pub fn new(duplicate_nodes: Table, duplicate_edges: Table, dangling_edges: Table) -> Self {
        Self {
            duplicate_nodes,
            duplicate_edges,
            dangling_edges,
        }
    }
}
