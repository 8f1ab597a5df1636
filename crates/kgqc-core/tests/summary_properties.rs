use kgqc_core::report::{edge_group_summaries, node_group_summaries};
use kgqc_core::{build_qc_report, MergeQc, MergedKg, QcReportOptions, StorageMode, Table};
use proptest::prelude::*;

fn cell(pattern: &'static str) -> impl Strategy<Value = Option<String>> {
    proptest::option::weighted(0.9, proptest::string::string_regex(pattern).unwrap())
}

fn node_rows() -> impl Strategy<Value = Vec<(String, Option<String>, Option<String>)>> {
    proptest::collection::vec(
        (
            proptest::string::string_regex("[A-D]:[0-9]").unwrap(),
            cell("cat[0-3]"),
            cell("src[0-2]"),
        ),
        0..20,
    )
}

fn edge_rows() -> impl Strategy<Value = Vec<(Option<String>, Option<String>, Option<String>, Option<String>)>> {
    proptest::collection::vec(
        (cell("[A-E]:[0-9]"), cell("[A-E]:[0-9]"), cell("p[0-2]"), cell("src[0-2]")),
        0..20,
    )
}

fn nodes_table(rows: &[(String, Option<String>, Option<String>)]) -> Table {
    let rows: Vec<Vec<Option<&str>>> = rows
        .iter()
        .map(|(id, cat, src)| vec![Some(id.as_str()), cat.as_deref(), src.as_deref()])
        .collect();
    Table::from_rows(&["id", "category", "provided_by"], &rows).unwrap()
}

fn edges_table(rows: &[(Option<String>, Option<String>, Option<String>, Option<String>)]) -> Table {
    let rows: Vec<Vec<Option<&str>>> = rows
        .iter()
        .enumerate()
        .map(|(i, (s, o, p, src))| {
            vec![
                Some(if i % 2 == 0 { "e-even" } else { "e-odd" }),
                s.as_deref(),
                o.as_deref(),
                p.as_deref(),
                src.as_deref(),
            ]
        })
        .collect();
    Table::from_rows(&["id", "subject", "object", "predicate", "provided_by"], &rows).unwrap()
}

fn strictly_ascending(v: &[String]) -> bool {
    v.windows(2).all(|w| w[0] < w[1])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn node_summaries_are_sorted_and_distinct(rows in node_rows()) {
        let nodes = nodes_table(&rows);
        for s in node_group_summaries(&nodes, None, "provided_by").expect("summaries") {
            prop_assert!(strictly_ascending(&s.namespaces));
            prop_assert!(strictly_ascending(&s.categories));
        }
    }

    #[test]
    fn edge_missing_matches_occurrence_count(nrows in node_rows(), erows in edge_rows()) {
        let nodes = nodes_table(&nrows);
        let edges = edges_table(&erows);
        let ids: std::collections::HashSet<&str> = nrows.iter().map(|(id, _, _)| id.as_str()).collect();

        for s in edge_group_summaries(&edges, &nodes, StorageMode::Keyed, "provided_by").expect("summaries") {
            prop_assert!(strictly_ascending(&s.namespaces));
            prop_assert!(strictly_ascending(&s.categories));

            let expected: usize = erows
                .iter()
                .filter(|(_, _, _, src)| src.as_deref() == Some(s.name.as_str()))
                .map(|(subj, obj, _, _)| {
                    [subj, obj]
                        .iter()
                        .filter(|cell| match cell.as_deref() {
                            Some(id) => !ids.contains(id),
                            None => true,
                        })
                        .count()
                })
                .sum();
            prop_assert_eq!(s.missing, expected);
            prop_assert_eq!(s.missing_subject_namespaces.is_some(), expected > 0);
        }
    }

    #[test]
    fn qc_report_is_deterministic(nrows in node_rows(), erows in edge_rows()) {
        let kg = MergedKg::new(nodes_table(&nrows), edges_table(&erows));
        let qc = MergeQc::default();
        let options = QcReportOptions::default();
        let first = serde_json::to_string(&build_qc_report(&kg, &qc, &options).expect("report")).unwrap();
        let second = serde_json::to_string(&build_qc_report(&kg, &qc, &options).expect("report")).unwrap();
        prop_assert_eq!(first, second);
    }
}
