// src/paths.rs

use ahash::{AHashMap, AHashSet};

use crate::hierarchy::Taxonomy;
use crate::types::{PathRow, PathTable, RankCode};

/// Parent label of a topmost path row.
pub const ROOT_PARENT: &str = "";

/// Build the ancestor-path table for the icicle and sunburst plots.
///
/// Filtering is a single global threshold on assigned reads, independent
/// of the flow graph's per-column cap: a taxon at or above the threshold
/// is kept together with its whole ancestor chain, so a retained leaf
/// always renders with its lineage. The pull stops below the root
/// anchor; the root contributes its own row only when its own assigned
/// reads clear the threshold, which keeps a threshold of zero equal to
/// the full pruned tree.
///
/// The downstream plots key strictly by label string, so retained nodes
/// that share a name get the node id suffixed onto their label.
pub fn build_paths(taxonomy: &Taxonomy, min_reads: u64) -> PathTable {
    let mut marked: AHashSet<u32> = AHashSet::new();

    for node in taxonomy.nodes() {
        if node.record.reads_assigned < min_reads {
            continue;
        }
        marked.insert(node.id);
        if node.record.rank == RankCode::Root {
            continue;
        }
        let mut current = node.parent;
        while let Some(id) = current {
            let Some(ancestor) = taxonomy.get(id) else {
                break;
            };
            if ancestor.record.rank == RankCode::Root {
                break;
            }
            if !marked.insert(id) {
                // everything above is already marked
                break;
            }
            current = ancestor.parent;
        }
    }

    // Labels must stay unique across the rows AND the parents they
    // reference, so unmarked root anchors count toward collisions too.
    let mut referenced: AHashSet<u32> = marked.clone();
    for &id in &marked {
        if let Some(parent) = taxonomy.get(id).and_then(|n| n.parent) {
            referenced.insert(parent);
        }
    }
    let mut name_count: AHashMap<&str, usize> = AHashMap::new();
    for &id in &referenced {
        if let Some(node) = taxonomy.get(id) {
            *name_count.entry(node.record.name.as_str()).or_insert(0) += 1;
        }
    }
    let label = |id: u32| -> String {
        let Some(node) = taxonomy.get(id) else {
            return String::new();
        };
        let name = node.record.name.as_str();
        if name_count.get(name).copied().unwrap_or(0) > 1 {
            format!("{name}_{id}")
        } else {
            name.to_string()
        }
    };

    let mut ids: Vec<u32> = marked.into_iter().collect();
    ids.sort_unstable_by(|a, b| b.cmp(a));

    let rows = ids
        .into_iter()
        .filter_map(|id| {
            let node = taxonomy.get(id)?;
            let parent = match node.parent {
                Some(parent_id) => label(parent_id),
                None => ROOT_PARENT.to_string(),
            };
            Some(PathRow {
                taxon: label(id),
                parent,
                reads: node.record.reads_assigned,
            })
        })
        .collect();

    PathTable { rows }
}
