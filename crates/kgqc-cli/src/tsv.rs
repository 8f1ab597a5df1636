//! KGX-style TSV loading.
//!
//! The first line is the header. Fields are tab separated; an empty field is
//! a null cell. Rows shorter than the header are padded with nulls, longer
//! rows are rejected.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use kgqc_core::{Column, Table};

pub fn parse_tsv(text: &str) -> Result<Table> {
    let mut lines = text.lines();
    let header = lines
        .next()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| anyhow!("missing header line"))?;
    let names: Vec<&str> = header.split('\t').collect();

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for (i, line) in lines.enumerate() {
        if line.is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split('\t').collect();
        if cells.len() > names.len() {
            bail!(
                "line {}: {} fields but the header has {}",
                i + 2,
                cells.len(),
                names.len()
            );
        }
        for (j, col) in columns.iter_mut().enumerate() {
            col.push(
                cells
                    .get(j)
                    .filter(|c| !c.is_empty())
                    .map(|c| c.to_string()),
            );
        }
    }

    Ok(Table::new(
        names
            .into_iter()
            .zip(columns)
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    )?)
}

pub fn read_tsv(path: &Path) -> Result<Table> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let table = parse_tsv(&text).with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = table.height(), "loaded table");
    Ok(table)
}

/// `None` loads as an empty table.
pub fn read_optional_tsv(path: Option<&Path>) -> Result<Table> {
    match path {
        Some(path) => read_tsv(path),
        None => Ok(Table::default()),
    }
}

/// Merge-stage QC tables found in a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QcTablePaths {
    pub duplicate_nodes: Option<PathBuf>,
    pub duplicate_edges: Option<PathBuf>,
    pub dangling_edges: Option<PathBuf>,
}

/// Find `*duplicate-nodes.tsv`, `*duplicate-edges.tsv` and
/// `*dangling-edges.tsv` in `dir` (first match in file-name order wins).
pub fn discover_qc_tables(dir: &Path) -> Result<QcTablePaths> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    entries.sort();

    let mut found = QcTablePaths::default();
    for path in entries {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let slot = if name.ends_with("duplicate-nodes.tsv") {
            &mut found.duplicate_nodes
        } else if name.ends_with("duplicate-edges.tsv") {
            &mut found.duplicate_edges
        } else if name.ends_with("dangling-edges.tsv") {
            &mut found.dangling_edges
        } else {
            continue;
        };
        if slot.is_none() {
            *slot = Some(path.clone());
        }
    }
    tracing::debug!(dir = %dir.display(), ?found, "discovered qc tables");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_are_null_and_short_rows_padded() {
        let t = parse_tsv("id\tcategory\tprovided_by\nA:1\t\tsrc1\nA:2\tgene\n").unwrap();
        assert_eq!(t.height(), 2);
        assert_eq!(t.column("category").unwrap().get(0), None);
        assert_eq!(t.column("provided_by").unwrap().get(1), None);
        assert_eq!(t.column("category").unwrap().get(1), Some("gene"));
    }

    #[test]
    fn long_rows_are_rejected_with_line_number() {
        let err = parse_tsv("id\tcategory\nA:1\tgene\textra\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn header_is_required() {
        assert!(parse_tsv("").is_err());
    }

    #[test]
    fn crlf_lines_are_handled() {
        let t = parse_tsv("id\tprovided_by\r\nA:1\tsrc1\r\n").unwrap();
        assert_eq!(t.column("provided_by").unwrap().get(0), Some("src1"));
    }

    #[test]
    fn duplicate_header_names_are_rejected() {
        assert!(parse_tsv("id\tid\nA:1\tA:2\n").is_err());
    }
}
