// src/sankey/mod.rs

pub mod edges;
pub mod format;
pub mod top_filter;

pub use edges::{build_edges, Edge};
pub use format::format_sankey;
pub use top_filter::{filter_by_top, TopFiltered};

use ahash::AHashSet;

use crate::hierarchy::Taxonomy;
use crate::types::{RankCode, SankeyData};

/// Run the full flow-graph pipeline over a domain-pruned taxonomy:
/// rank-compressed edges, per-column abundance cap, ghost padding, and
/// projection into the external shape.
pub fn build_sankey(
    taxonomy: &Taxonomy,
    ranks: &[RankCode],
    top_k: usize,
    ghost_label: &str,
    pad: u32,
) -> SankeyData {
    let selected: AHashSet<RankCode> = ranks.iter().copied().collect();
    let edges = build_edges(taxonomy, &selected);
    let filtered = filter_by_top(top_k, edges, taxonomy, ranks);
    format_sankey(taxonomy, &selected, &filtered, ghost_label, pad)
}
