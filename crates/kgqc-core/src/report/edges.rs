//! Edge report: per-group namespaces, categories and referential completeness,
//! with a nested predicate report and node report for every group.

use rayon::prelude::*;
use serde::Serialize;

use super::columns::{CATEGORY, ID, OBJECT, SUBJECT};
use super::nodes::build_node_report;
use super::predicates::{collect_predicates, predicate_summaries_with, DEFAULT_PREDICATE_GROUP_BY};
use crate::container::{to_record, ReportContainer, StorageMode};
use crate::error::{QcError, Result};
use crate::namespace::{namespace_of, namespaces_of_ids};
use crate::set_ops::IdSet;
use crate::table::{Group, Table};

#[derive(Debug, Clone, Serialize)]
pub struct EdgeGroupSummary {
    pub name: String,
    pub namespaces: Vec<String>,
    pub categories: Vec<String>,
    pub total_number: usize,
    /// Subject and object cells absent from the node table, with multiplicity.
    pub missing: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_subject_namespaces: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_object_namespaces: Option<Vec<String>>,
    pub predicates: ReportContainer,
    pub node_types: ReportContainer,
}

fn node_id_set(nodes: &Table) -> Result<IdSet<'_>> {
    match nodes.column(ID) {
        Some(ids) => Ok(IdSet::from_column(ids)),
        None if nodes.is_empty() => Ok(IdSet::default()),
        None => Err(QcError::MissingColumn(ID.to_string())),
    }
}

/// Summaries for every `group_by` group of `edges`, in ascending key order.
///
/// Groups are summarized in parallel; the returned order is the group order.
pub fn edge_group_summaries(
    edges: &Table,
    nodes: &Table,
    mode: StorageMode,
    group_by: &str,
) -> Result<Vec<EdgeGroupSummary>> {
    if edges.is_empty() {
        return Ok(Vec::new());
    }
    let groups = edges.group_by(group_by)?;
    edges.require(SUBJECT)?;
    edges.require(OBJECT)?;
    let node_ids = node_id_set(nodes)?;

    tracing::debug!(
        group_by,
        rows = edges.height(),
        groups = groups.len(),
        node_ids = node_ids.len(),
        "edge report"
    );

    groups
        .par_iter()
        .map(|group| summarize_group(edges, nodes, &node_ids, group, mode, group_by))
        .collect()
}

fn summarize_group(
    edges: &Table,
    nodes: &Table,
    node_ids: &IdSet<'_>,
    group: &Group,
    mode: StorageMode,
    group_by: &str,
) -> Result<EdgeGroupSummary> {
    let group_edges = edges.take(&group.rows);
    let subjects = group_edges.require(SUBJECT)?;
    let objects = group_edges.require(OBJECT)?;

    let missing = node_ids.count_absent(subjects.iter()) + node_ids.count_absent(objects.iter());

    let (missing_subject_namespaces, missing_object_namespaces) = if missing > 0 {
        (
            Some(namespaces_of_ids(&node_ids.sorted_difference(subjects.non_null()))),
            Some(namespaces_of_ids(&node_ids.sorted_difference(objects.non_null()))),
        )
    } else {
        (None, None)
    };

    // `predicate` is optional in edge tables, like `category`.
    let predicate_summaries = if group_edges.has_column(DEFAULT_PREDICATE_GROUP_BY) {
        predicate_summaries_with(&group_edges, node_ids, DEFAULT_PREDICATE_GROUP_BY)?
    } else {
        Vec::new()
    };
    let predicates = collect_predicates(predicate_summaries, mode)?;
    let node_types = build_node_report(nodes, Some(&group_edges), mode, group_by)?;

    Ok(EdgeGroupSummary {
        name: group.key.clone(),
        namespaces: namespace_of(&subjects.stack(objects)).sorted_unique(),
        categories: group_edges
            .column(CATEGORY)
            .map(|c| c.sorted_unique())
            .unwrap_or_default(),
        total_number: group.rows.len(),
        missing,
        missing_subject_namespaces,
        missing_object_namespaces,
        predicates,
        node_types,
    })
}

/// Edge report as a container keyed (or listed) by group name.
pub fn build_edge_report(
    edges: &Table,
    nodes: &Table,
    mode: StorageMode,
    group_by: &str,
) -> Result<ReportContainer> {
    let mut report = ReportContainer::new(mode);
    for summary in edge_group_summaries(edges, nodes, mode, group_by)? {
        report.add(to_record(&summary)?)?;
    }
    Ok(report)
}
