//! Knowledge-graph QC reports.
//!
//! Summarizes a merged knowledge graph (a node table and an edge table) and
//! the merge step's QC tables (duplicate nodes, duplicate edges, dangling
//! edges) per grouping attribute, usually `provided_by`:
//!
//! - node groups: namespaces, categories, taxa, counts;
//! - edge groups: namespaces, categories, counts, endpoints missing from the
//!   node table, plus a predicate report and a node report per group.
//!
//! Everything here is pure and synchronous. Loading tables and writing the
//! report belong to the caller (see `kgqc-cli`).
//!
//! ```text
//!  MergedKg + MergeQc
//!        │
//!        ▼
//!  build_qc_report ──► nodes / duplicate_nodes      (report::nodes)
//!                  └─► edges / dangling / duplicate (report::edges
//!                                                    ├─ report::predicates
//!                                                    └─ report::nodes)
//! ```

pub mod container;
pub mod error;
pub mod model;
pub mod namespace;
pub mod qc;
pub mod report;
pub mod set_ops;
pub mod table;

pub use container::{Record, ReportContainer, StorageMode, DEFAULT_KEY_FIELD};
pub use error::{QcError, Result};
pub use model::{MergeQc, MergedKg};
pub use qc::{
    build_qc_report, fill_missing_node_values, QcReport, QcReportOptions, MISSING_CATEGORY,
    MISSING_TAXON,
};
pub use set_ops::{difference, intersect, IdCollection, IdSet};
pub use table::{Column, Group, Table};
