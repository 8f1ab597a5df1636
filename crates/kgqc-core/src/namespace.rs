//! CURIE namespace extraction.

use crate::table::Column;

/// Prefix of `id` before the first `:`.
///
/// An identifier with no colon is its own namespace.
pub fn namespace_str(id: &str) -> &str {
    id.split_once(':').map_or(id, |(prefix, _)| prefix)
}

/// Namespace of every cell, row-aligned. Nulls stay null.
pub fn namespace_of(column: &Column) -> Column {
    if column.is_empty() {
        return column.clone();
    }
    column.map_values(|id| namespace_str(id).to_string())
}

/// Namespaces of already-resolved identifiers, in input order (not deduplicated).
pub fn namespaces_of_ids(ids: &[String]) -> Vec<String> {
    ids.iter().map(|id| namespace_str(id).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_before_first_colon() {
        assert_eq!(namespace_str("HGNC:1100"), "HGNC");
        assert_eq!(namespace_str("OBO:GO:0008150"), "OBO");
        assert_eq!(namespace_str(":local"), "");
    }

    #[test]
    fn no_colon_is_whole_string() {
        assert_eq!(namespace_str("orphan"), "orphan");
    }

    #[test]
    fn column_keeps_rows_and_nulls() {
        let col = Column::new(
            "id",
            vec![Some("A:1".into()), None, Some("A:2".into())],
        );
        let ns = namespace_of(&col);
        assert_eq!(ns.name(), "id");
        assert_eq!(
            ns.values(),
            &[Some("A".to_string()), None, Some("A".to_string())]
        );
    }

    #[test]
    fn empty_column_is_returned_unchanged() {
        let col = Column::new("subject", Vec::new());
        assert_eq!(namespace_of(&col), col);
    }
}
