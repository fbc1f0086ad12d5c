// src/sankey/top_filter.rs

use ahash::AHashMap;

use crate::hierarchy::Taxonomy;
use crate::types::RankCode;

use super::edges::Edge;

/// Edge set after per-column abundance filtering, plus the number of
/// synthetic padding nodes the formatter must append.
#[derive(Debug, Clone, PartialEq)]
pub struct TopFiltered {
    pub edges: Vec<Edge>,
    pub ghost_nodes: usize,
}

/// Keep the `top_k` heaviest edges in each rank column, sorted by value
/// descending with ties broken by ascending target id. Dropped edges
/// leave the set entirely; there is no aggregate "other" bucket, so
/// column read totals are not conserved after filtering.
///
/// Ghost-node accounting happens here too: after filtering, every column
/// narrower than the widest one is owed enough zero-weight padding nodes
/// to even the columns out, and the total owed is reported alongside the
/// surviving edges.
pub fn filter_by_top(
    top_k: usize,
    edges: Vec<Edge>,
    taxonomy: &Taxonomy,
    rank_order: &[RankCode],
) -> TopFiltered {
    let column_of: AHashMap<RankCode, usize> = rank_order
        .iter()
        .enumerate()
        .map(|(idx, &rank)| (rank, idx))
        .collect();

    let mut columns: Vec<Vec<Edge>> = vec![Vec::new(); rank_order.len()];
    for edge in edges {
        let Some(target) = taxonomy.get(edge.target) else {
            continue;
        };
        let Some(&column) = column_of.get(&target.record.rank) else {
            continue;
        };
        columns[column].push(edge);
    }

    for column in &mut columns {
        column.sort_by(|a, b| b.value.cmp(&a.value).then(a.target.cmp(&b.target)));
        column.truncate(top_k);
    }

    let max_width = columns.iter().map(Vec::len).max().unwrap_or(0);
    let ghost_nodes = columns.iter().map(|c| max_width - c.len()).sum();

    let mut kept: Vec<Edge> = columns.into_iter().flatten().collect();
    kept.sort_by_key(|edge| edge.target);

    TopFiltered {
        edges: kept,
        ghost_nodes,
    }
}
