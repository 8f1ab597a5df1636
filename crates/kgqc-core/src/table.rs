//! Columnar tables with nullable string cells.
//!
//! Node and edge tables (KGX style) are string-valued throughout, so a column
//! is simply a named `Vec<Option<String>>`. Tables are immutable once built:
//! every transformation (`take`, `filter_rows`, `fill_nulls`) returns a new
//! table and leaves the receiver untouched.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::error::{QcError, Result};

// ============================================================================
// Column
// ============================================================================

/// A named, nullable string column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    values: Vec<Option<String>>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Column with no null cells.
    pub fn from_strs<S: AsRef<str>>(name: impl Into<String>, values: &[S]) -> Self {
        Self::new(
            name,
            values.iter().map(|v| Some(v.as_ref().to_string())).collect(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    pub fn get(&self, row: usize) -> Option<&str> {
        self.values.get(row).and_then(|v| v.as_deref())
    }

    /// Cells in row order; nulls are `None`.
    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.values.iter().map(|v| v.as_deref())
    }

    /// Non-null cells in row order.
    pub fn non_null(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.iter().filter_map(|v| v.as_deref())
    }

    pub fn take(&self, rows: &[usize]) -> Column {
        Column {
            name: self.name.clone(),
            values: rows.iter().map(|&r| self.values[r].clone()).collect(),
        }
    }

    pub fn fill_null(&self, value: &str) -> Column {
        Column {
            name: self.name.clone(),
            values: self
                .values
                .iter()
                .map(|v| Some(v.clone().unwrap_or_else(|| value.to_string())))
                .collect(),
        }
    }

    /// Concatenate `other` below `self`. The result keeps `self`'s name.
    pub fn stack(&self, other: &Column) -> Column {
        let mut values = Vec::with_capacity(self.len() + other.len());
        values.extend(self.values.iter().cloned());
        values.extend(other.values.iter().cloned());
        Column {
            name: self.name.clone(),
            values,
        }
    }

    /// Distinct non-null values in ascending order.
    pub fn sorted_unique(&self) -> Vec<String> {
        self.non_null()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub(crate) fn map_values(&self, f: impl Fn(&str) -> String) -> Column {
        Column {
            name: self.name.clone(),
            values: self
                .values
                .iter()
                .map(|v| v.as_deref().map(&f))
                .collect(),
        }
    }
}

// ============================================================================
// Table
// ============================================================================

/// Ordered collection of equally long, uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
    height: usize,
}

/// One GROUP BY bucket: the key and the row indices (ascending) that carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: String,
    pub rows: Vec<usize>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let height = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.name()) {
                return Err(QcError::DuplicateColumn(col.name().to_string()));
            }
            if col.len() != height {
                return Err(QcError::ColumnLengthMismatch {
                    column: col.name().to_string(),
                    expected: height,
                    actual: col.len(),
                });
            }
        }
        Ok(Self { columns, height })
    }

    /// Zero-height table with the given (empty) columns.
    pub fn with_columns(names: &[&str]) -> Result<Self> {
        Self::new(names.iter().map(|n| Column::new(*n, Vec::new())).collect())
    }

    /// Build a table from row literals; `None` is a null cell.
    ///
    /// Rows shorter than `columns` are padded with nulls.
    pub fn from_rows(columns: &[&str], rows: &[Vec<Option<&str>>]) -> Result<Self> {
        let mut values: Vec<Vec<Option<String>>> =
            vec![Vec::with_capacity(rows.len()); columns.len()];
        for row in rows {
            if row.len() > columns.len() {
                return Err(QcError::ColumnLengthMismatch {
                    column: format!("row with {} cells", row.len()),
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
            for (i, col) in values.iter_mut().enumerate() {
                col.push(row.get(i).copied().flatten().map(str::to_string));
            }
        }
        Self::new(
            columns
                .iter()
                .zip(values)
                .map(|(name, vals)| Column::new(*name, vals))
                .collect(),
        )
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn require(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| QcError::MissingColumn(name.to_string()))
    }

    pub fn take(&self, rows: &[usize]) -> Table {
        Table {
            columns: self.columns.iter().map(|c| c.take(rows)).collect(),
            height: rows.len(),
        }
    }

    /// Keep the rows for which `keep(row_index)` holds.
    pub fn filter_rows(&self, keep: impl Fn(usize) -> bool) -> Table {
        let rows: Vec<usize> = (0..self.height).filter(|&r| keep(r)).collect();
        self.take(&rows)
    }

    /// Copy of this table with nulls replaced, per column.
    ///
    /// Columns not present in the table are ignored.
    pub fn fill_nulls(&self, fills: &[(&str, &str)]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| match fills.iter().find(|(name, _)| *name == c.name()) {
                Some((_, value)) => c.fill_null(value),
                None => c.clone(),
            })
            .collect();
        Table {
            columns,
            height: self.height,
        }
    }

    /// GROUP BY `key`: groups in ascending key order, null keys dropped.
    pub fn group_by(&self, key: &str) -> Result<Vec<Group>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        let col = self.require(key)?;
        let mut buckets: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (row, value) in col.iter().enumerate() {
            if let Some(value) = value {
                buckets.entry(value).or_default().push(row);
            }
        }
        Ok(buckets
            .into_iter()
            .map(|(key, rows)| Group {
                key: key.to_string(),
                rows,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            &["id", "category", "provided_by"],
            &[
                vec![Some("B:2"), Some("gene"), Some("src2")],
                vec![Some("A:1"), None, Some("src1")],
                vec![Some("A:3"), Some("protein"), Some("src2")],
                vec![Some("C:9"), Some("gene"), None],
            ],
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_ragged_columns() {
        let err = Table::new(vec![
            Column::from_strs("id", &["a", "b"]),
            Column::from_strs("category", &["x"]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            QcError::ColumnLengthMismatch { expected: 2, actual: 1, .. }
        ));
    }

    #[test]
    fn new_rejects_duplicate_names() {
        let err = Table::new(vec![
            Column::from_strs("id", &["a"]),
            Column::from_strs("id", &["b"]),
        ])
        .unwrap_err();
        assert!(matches!(err, QcError::DuplicateColumn(name) if name == "id"));
    }

    #[test]
    fn from_rows_pads_short_rows() {
        let t = Table::from_rows(&["id", "category"], &[vec![Some("A:1")]]).unwrap();
        assert_eq!(t.height(), 1);
        assert_eq!(t.column("category").unwrap().get(0), None);
    }

    #[test]
    fn group_by_sorts_keys_and_drops_nulls() {
        let t = sample();
        let groups = t.group_by("provided_by").unwrap();
        let keys: Vec<_> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["src1", "src2"]);
        assert_eq!(groups[1].rows, vec![0, 2]);
    }

    #[test]
    fn group_by_missing_column_is_an_error() {
        let err = sample().group_by("knowledge_source").unwrap_err();
        assert!(matches!(err, QcError::MissingColumn(c) if c == "knowledge_source"));
    }

    #[test]
    fn group_by_on_empty_table_needs_no_column() {
        let t = Table::default();
        assert!(t.group_by("provided_by").unwrap().is_empty());
    }

    #[test]
    fn fill_nulls_copies_and_skips_absent_columns() {
        let t = sample();
        let filled = t.fill_nulls(&[("category", "missing category"), ("in_taxon", "x")]);
        assert_eq!(
            filled.column("category").unwrap().get(1),
            Some("missing category")
        );
        assert!(!filled.has_column("in_taxon"));
        // receiver untouched
        assert_eq!(t.column("category").unwrap().get(1), None);
    }

    #[test]
    fn sorted_unique_dedups_and_skips_nulls() {
        let t = sample();
        assert_eq!(
            t.column("category").unwrap().sorted_unique(),
            vec!["gene".to_string(), "protein".to_string()]
        );
    }

    #[test]
    fn stack_keeps_left_name() {
        let a = Column::from_strs("subject", &["A:1"]);
        let b = Column::from_strs("object", &["B:2", "B:3"]);
        let s = a.stack(&b);
        assert_eq!(s.name(), "subject");
        assert_eq!(s.len(), 3);
    }
}
