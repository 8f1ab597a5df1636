//! Set algebra over identifier collections.
//!
//! Every result is deduplicated and sorted ascending, so reports built from
//! these helpers are deterministic regardless of input row order.

use std::collections::BTreeSet;

use ahash::AHashSet;

use crate::error::{QcError, Result};
use crate::table::Column;

/// Operand for [`intersect`] and [`difference`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdCollection {
    /// Plain sequence of identifiers.
    List(Vec<String>),
    /// Labeled column; results keep the label.
    Column(Column),
}

impl IdCollection {
    fn kind(&self) -> &'static str {
        match self {
            IdCollection::List(_) => "list",
            IdCollection::Column(_) => "column",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            IdCollection::List(v) => v.len(),
            IdCollection::Column(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-null members in stored order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            IdCollection::List(v) => v.iter().map(String::as_str).collect(),
            IdCollection::Column(c) => c.non_null().collect(),
        }
    }

    fn rebuild(&self, values: Vec<String>) -> IdCollection {
        match self {
            IdCollection::List(_) => IdCollection::List(values),
            IdCollection::Column(c) => {
                IdCollection::Column(Column::new(c.name(), values.into_iter().map(Some).collect()))
            }
        }
    }
}

impl From<Vec<String>> for IdCollection {
    fn from(values: Vec<String>) -> Self {
        IdCollection::List(values)
    }
}

impl From<Column> for IdCollection {
    fn from(column: Column) -> Self {
        IdCollection::Column(column)
    }
}

fn check_kinds(operation: &'static str, a: &IdCollection, b: &IdCollection) -> Result<()> {
    if a.kind() != b.kind() {
        return Err(QcError::InvalidArgumentType {
            operation,
            left: a.kind(),
            right: b.kind(),
        });
    }
    Ok(())
}

/// Sorted, distinct members of both `a` and `b`.
pub fn intersect(a: &IdCollection, b: &IdCollection) -> Result<IdCollection> {
    check_kinds("intersect", a, b)?;
    Ok(a.rebuild(sorted_intersection(a.values(), b.values())))
}

/// Sorted, distinct members of `a` that are not in `b`.
pub fn difference(a: &IdCollection, b: &IdCollection) -> Result<IdCollection> {
    check_kinds("difference", a, b)?;
    Ok(a.rebuild(sorted_difference(a.values(), b.values())))
}

pub fn sorted_intersection<'a>(
    a: impl IntoIterator<Item = &'a str>,
    b: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let b: AHashSet<&str> = b.into_iter().collect();
    a.into_iter()
        .filter(|v| b.contains(*v))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn sorted_difference<'a>(
    a: impl IntoIterator<Item = &'a str>,
    b: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    IdSet::from_iter(b).sorted_difference(a)
}

// ============================================================================
// IdSet
// ============================================================================

/// Hashed membership set over borrowed identifiers.
///
/// Built once per node (or edge endpoint) column and shared read-only across
/// groups, including across rayon workers.
#[derive(Debug, Clone, Default)]
pub struct IdSet<'a> {
    ids: AHashSet<&'a str>,
}

impl<'a> IdSet<'a> {
    pub fn from_column(column: &'a Column) -> Self {
        Self::from_iter(column.non_null())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Sorted, distinct values of `values` absent from this set.
    pub fn sorted_difference<'b>(&self, values: impl IntoIterator<Item = &'b str>) -> Vec<String> {
        values
            .into_iter()
            .filter(|v| !self.ids.contains(*v))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Cells absent from this set, counted with multiplicity. Nulls count as absent.
    pub fn count_absent<'b>(&self, cells: impl IntoIterator<Item = Option<&'b str>>) -> usize {
        cells
            .into_iter()
            .filter(|cell| match cell {
                Some(id) => !self.ids.contains(*id),
                None => true,
            })
            .count()
    }
}

impl<'a> FromIterator<&'a str> for IdSet<'a> {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
