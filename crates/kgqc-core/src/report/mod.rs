//! Per-group summaries over node and edge tables.
//!
//! ```text
//!   edges ──group_by──► edge group ──┬─► predicate report (per predicate)
//!                                    └─► node report (nodes touched by group)
//!   nodes ──group_by──► node group
//! ```

pub mod edges;
pub mod nodes;
pub mod predicates;

pub use edges::{build_edge_report, edge_group_summaries, EdgeGroupSummary};
pub use nodes::{build_node_report, node_group_summaries, NodeGroupSummary};
pub use predicates::{
    build_predicate_report, predicate_summaries, PredicateSummary, DEFAULT_PREDICATE_GROUP_BY,
};

/// Column names the builders read.
pub mod columns {
    pub const ID: &str = "id";
    pub const CATEGORY: &str = "category";
    pub const IN_TAXON: &str = "in_taxon";
    pub const SUBJECT: &str = "subject";
    pub const OBJECT: &str = "object";
    pub const PREDICATE: &str = "predicate";
    pub const PROVIDED_BY: &str = "provided_by";
}
