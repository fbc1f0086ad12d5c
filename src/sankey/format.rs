// src/sankey/format.rs

use ahash::{AHashMap, AHashSet};

use crate::hierarchy::Taxonomy;
use crate::types::{RankCode, SankeyData, SankeyLinks};

use super::top_filter::TopFiltered;

/// Project the filtered edge set into the external flow-graph shape.
///
/// The label list holds every node of a selected rank plus the tree
/// anchors, in ascending id order, then the ghost padding labels. Nodes
/// whose edges were dropped by the abundance cap keep their label entry
/// so surviving descendants can still render their full lineage. Link
/// indices point into the label list, not at raw node ids.
pub fn format_sankey(
    taxonomy: &Taxonomy,
    selected: &AHashSet<RankCode>,
    filtered: &TopFiltered,
    ghost_label: &str,
    pad: u32,
) -> SankeyData {
    let mut labels = Vec::new();
    let mut index_of: AHashMap<u32, usize> = AHashMap::new();

    for node in taxonomy.nodes() {
        if selected.contains(&node.record.rank) || node.parent.is_none() {
            index_of.insert(node.id, labels.len());
            labels.push(node.record.name.clone());
        }
    }

    let mut links = SankeyLinks::default();
    for edge in &filtered.edges {
        let (Some(&source), Some(&target)) = (index_of.get(&edge.source), index_of.get(&edge.target))
        else {
            continue;
        };
        links.source.push(source);
        links.target.push(target);
        links.value.push(edge.value);
        links.label.push(edge.label.clone());
    }

    for _ in 0..filtered.ghost_nodes {
        labels.push(ghost_label.to_string());
    }

    SankeyData { labels, links, pad }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sankey::edges::Edge;
    use crate::types::TaxonRecord;

    fn record(rank: RankCode, tax_id: u32, name: &str, depth: usize, assigned: u64) -> TaxonRecord {
        TaxonRecord {
            rank,
            tax_id,
            name: name.to_string(),
            depth,
            reads_cumulative: assigned,
            reads_assigned: assigned,
            percent: 0.0,
        }
    }

    #[test]
    fn labels_are_indexed_and_ghosts_appended() {
        let taxonomy = Taxonomy::from_records(vec![
            record(RankCode::Root, 1, "root", 0, 0),
            record(RankCode::Domain, 2, "Bacteria", 1, 10),
            record(RankCode::Phylum, 1224, "Proteobacteria", 2, 5),
            record(RankCode::Genus, 561, "Escherichia", 3, 80),
        ]);
        let selected: AHashSet<RankCode> = [RankCode::Domain, RankCode::Genus].into_iter().collect();
        let filtered = TopFiltered {
            edges: vec![
                Edge {
                    source: 0,
                    target: 1,
                    value: 10,
                    label: "Bacteria".to_string(),
                },
                Edge {
                    source: 1,
                    target: 3,
                    value: 80,
                    label: "Escherichia".to_string(),
                },
            ],
            ghost_nodes: 2,
        };

        let data = format_sankey(&taxonomy, &selected, &filtered, "none", 30);
        // the phylum is not selected, so node id 3 compacts to index 2
        assert_eq!(data.labels, vec!["root", "Bacteria", "Escherichia", "none", "none"]);
        assert_eq!(data.links.source, vec![0, 1]);
        assert_eq!(data.links.target, vec![1, 2]);
        assert_eq!(data.links.value, vec![10, 80]);
        assert_eq!(data.links.label, vec!["Bacteria", "Escherichia"]);
        assert_eq!(data.pad, 30);
    }
}
