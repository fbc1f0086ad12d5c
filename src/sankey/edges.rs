// src/sankey/edges.rs

use ahash::AHashSet;

use crate::hierarchy::{Node, Taxonomy};
use crate::types::RankCode;

/// One flow-graph edge between node ids (not yet label indices).
/// Weight is the target's own assigned reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: u32,
    pub target: u32,
    pub value: u64,
    pub label: String,
}

/// Build one edge per node whose rank is selected, connecting it to its
/// effective parent under rank compression: the nearest strict ancestor
/// whose rank is also selected. Ancestors at excluded ranks are skipped
/// without folding their reads into the edge; only the endpoints move.
/// Nodes with no selected ancestor anchor to the top of their tree.
///
/// Iterating in ascending id order makes the edge list deterministic and
/// resolves any ordering tie in favor of the node seen first in the
/// report.
pub fn build_edges(taxonomy: &Taxonomy, selected: &AHashSet<RankCode>) -> Vec<Edge> {
    let mut edges = Vec::new();

    for node in taxonomy.nodes() {
        if !selected.contains(&node.record.rank) {
            continue;
        }
        let Some(source) = effective_parent(taxonomy, node, selected) else {
            continue;
        };
        edges.push(Edge {
            source,
            target: node.id,
            value: node.record.reads_assigned,
            label: node.record.name.clone(),
        });
    }

    edges
}

/// Walk the ancestor chain looking for a selected rank. Falls back to the
/// topmost ancestor (the tree root) when every ancestor is excluded.
/// Returns `None` only for a node with no parent at all.
fn effective_parent(taxonomy: &Taxonomy, node: &Node, selected: &AHashSet<RankCode>) -> Option<u32> {
    let mut current = node.parent?;
    loop {
        let ancestor = taxonomy.get(current)?;
        if selected.contains(&ancestor.record.rank) {
            return Some(current);
        }
        match ancestor.parent {
            Some(parent) => current = parent,
            None => return Some(current),
        }
    }
}
