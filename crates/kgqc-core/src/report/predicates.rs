//! Predicate report: per-predicate edge counts and endpoints missing from the
//! node table.

use serde::{Deserialize, Serialize};

use super::columns::{OBJECT, SUBJECT};
use crate::container::{to_record, ReportContainer, StorageMode};
use crate::error::Result;
use crate::namespace::namespaces_of_ids;
use crate::set_ops::IdSet;
use crate::table::{Column, Table};

pub const DEFAULT_PREDICATE_GROUP_BY: &str = "predicate";

/// Key field of predicate report containers.
pub const PREDICATE_KEY_FIELD: &str = "uri";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateSummary {
    pub uri: String,
    pub total_number: usize,
    pub missing_subjects: usize,
    pub missing_objects: usize,
    /// One entry per distinct missing subject id, in id order.
    pub missing_subject_namespaces: Vec<String>,
    pub missing_object_namespaces: Vec<String>,
}

pub fn predicate_summaries(
    edges: &Table,
    node_ids: &Column,
    group_by: &str,
) -> Result<Vec<PredicateSummary>> {
    predicate_summaries_with(edges, &IdSet::from_column(node_ids), group_by)
}

pub(crate) fn predicate_summaries_with(
    edges: &Table,
    node_ids: &IdSet<'_>,
    group_by: &str,
) -> Result<Vec<PredicateSummary>> {
    let groups = edges.group_by(group_by)?;
    if groups.is_empty() {
        return Ok(Vec::new());
    }
    let subjects = edges.require(SUBJECT)?;
    let objects = edges.require(OBJECT)?;

    Ok(groups
        .into_iter()
        .map(|group| {
            let missing_subject_ids =
                node_ids.sorted_difference(subjects.take(&group.rows).non_null());
            let missing_object_ids =
                node_ids.sorted_difference(objects.take(&group.rows).non_null());
            PredicateSummary {
                uri: group.key,
                total_number: group.rows.len(),
                missing_subjects: missing_subject_ids.len(),
                missing_objects: missing_object_ids.len(),
                missing_subject_namespaces: namespaces_of_ids(&missing_subject_ids),
                missing_object_namespaces: namespaces_of_ids(&missing_object_ids),
            }
        })
        .collect())
}

/// Predicate report as a container keyed (or listed) by predicate `uri`.
pub fn build_predicate_report(
    edges: &Table,
    node_ids: &Column,
    mode: StorageMode,
    group_by: &str,
) -> Result<ReportContainer> {
    collect_predicates(predicate_summaries(edges, node_ids, group_by)?, mode)
}

pub(crate) fn collect_predicates(
    summaries: Vec<PredicateSummary>,
    mode: StorageMode,
) -> Result<ReportContainer> {
    let mut report = ReportContainer::with_key_field(mode, PREDICATE_KEY_FIELD);
    for summary in summaries {
        report.add(to_record(&summary)?)?;
    }
    Ok(report)
}
