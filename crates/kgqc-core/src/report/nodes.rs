//! Node report: per-group namespaces, categories, taxa and counts, optionally
//! cross-checked against an edge table.

use serde::{Deserialize, Serialize};

use super::columns::{CATEGORY, ID, IN_TAXON, OBJECT, SUBJECT};
use crate::container::{to_record, ReportContainer, StorageMode};
use crate::error::Result;
use crate::namespace::namespace_of;
use crate::set_ops::IdSet;
use crate::table::Table;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeGroupSummary {
    pub name: String,
    pub namespaces: Vec<String>,
    pub categories: Vec<String>,
    pub total_number: usize,
    /// Only set when the report is built against edges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_objects: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_subjects: Option<usize>,
    /// Only set when the node table has an `in_taxon` column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxon: Option<Vec<String>>,
}

struct EndpointSets<'a> {
    subjects: IdSet<'a>,
    objects: IdSet<'a>,
}

/// Summaries for every `group_by` group of `nodes`, in ascending key order.
///
/// With `edges`, only nodes that occur as a subject or object of some edge
/// are summarized, and each group reports how many of its ids never occur as
/// a subject (`missing_subjects`) or as an object (`missing_objects`).
pub fn node_group_summaries(
    nodes: &Table,
    edges: Option<&Table>,
    group_by: &str,
) -> Result<Vec<NodeGroupSummary>> {
    if nodes.is_empty() {
        return Ok(Vec::new());
    }
    let with_taxon = nodes.has_column(IN_TAXON);

    let endpoints = match edges {
        Some(edges) => Some(EndpointSets {
            subjects: IdSet::from_column(edges.require(SUBJECT)?),
            objects: IdSet::from_column(edges.require(OBJECT)?),
        }),
        None => None,
    };

    let restricted;
    let nodes = match &endpoints {
        Some(ep) => {
            let ids = nodes.require(ID)?;
            restricted = nodes.filter_rows(|row| {
                ids.get(row)
                    .is_some_and(|id| ep.subjects.contains(id) || ep.objects.contains(id))
            });
            &restricted
        }
        None => nodes,
    };

    let groups = nodes.group_by(group_by)?;
    tracing::debug!(
        group_by,
        rows = nodes.height(),
        groups = groups.len(),
        with_edges = endpoints.is_some(),
        "node report"
    );

    let ids = nodes.require(ID)?;
    let categories = nodes.column(CATEGORY);
    let taxa = nodes.column(IN_TAXON);

    let mut summaries = Vec::with_capacity(groups.len());
    for group in groups {
        let group_ids = ids.take(&group.rows);
        let mut summary = NodeGroupSummary {
            name: group.key,
            namespaces: namespace_of(&group_ids).sorted_unique(),
            categories: categories
                .map(|c| c.take(&group.rows).sorted_unique())
                .unwrap_or_default(),
            total_number: group.rows.len(),
            missing: None,
            missing_objects: None,
            missing_subjects: None,
            taxon: None,
        };

        if let Some(ep) = &endpoints {
            let missing_subjects = ep.subjects.sorted_difference(group_ids.non_null()).len();
            let missing_objects = ep.objects.sorted_difference(group_ids.non_null()).len();
            let missing = missing_subjects + missing_objects;
            summary.missing = Some(missing);
            if missing > 0 {
                summary.missing_objects = Some(missing_objects);
                summary.missing_subjects = Some(missing_subjects);
            }
        }

        if with_taxon {
            summary.taxon = Some(
                taxa.map(|t| t.take(&group.rows).sorted_unique())
                    .unwrap_or_default(),
            );
        }
        summaries.push(summary);
    }
    Ok(summaries)
}

/// Node report as a container keyed (or listed) by group name.
pub fn build_node_report(
    nodes: &Table,
    edges: Option<&Table>,
    mode: StorageMode,
    group_by: &str,
) -> Result<ReportContainer> {
    let mut report = ReportContainer::new(mode);
    for summary in node_group_summaries(nodes, edges, group_by)? {
        report.add(to_record(&summary)?)?;
    }
    Ok(report)
}
