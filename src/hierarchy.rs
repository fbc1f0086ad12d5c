// src/hierarchy.rs

use ahash::{AHashMap, AHashSet};

use crate::types::{RankCode, TaxonRecord};

/// One taxon in the indexed tree. Ids are assigned in traversal order
/// during indexing and never change afterwards, so re-parsing identical
/// report text always yields identical ids.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: u32,
    pub record: TaxonRecord,
    pub parent: Option<u32>,
    pub children: Vec<u32>,
}

/// An immutable snapshot of the taxon forest (normally a single tree
/// rooted at the report's root row). Filtering produces a new `Taxonomy`
/// with the same ids; nothing is mutated in place.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    nodes: Vec<Node>,
    by_id: AHashMap<u32, usize>,
    // Keyed by (name, tax_id). Distinct lineages may share a leaf name,
    // so a bare name key would silently merge them.
    by_name: AHashMap<(String, u32), u32>,
}

impl Taxonomy {
    /// Index depth-annotated records into a forest.
    ///
    /// Walks the rows in order with a stack of (depth, id) pairs: for a
    /// row at depth d the stack is popped while its top is at depth >= d,
    /// and the new node hangs off whatever remains on top. A depth jump
    /// past +1 therefore attaches the row to the nearest ancestor with a
    /// strictly smaller depth; no intermediate node is fabricated.
    pub fn from_records(records: Vec<TaxonRecord>) -> Taxonomy {
        let mut nodes: Vec<Node> = Vec::with_capacity(records.len());
        let mut stack: Vec<(usize, u32)> = Vec::new();

        for record in records {
            while matches!(stack.last(), Some(&(depth, _)) if depth >= record.depth) {
                stack.pop();
            }
            let id = nodes.len() as u32;
            let parent = stack.last().map(|&(_, parent_id)| parent_id);
            if let Some(parent_id) = parent {
                nodes[parent_id as usize].children.push(id);
            }
            stack.push((record.depth, id));
            nodes.push(Node {
                id,
                record,
                parent,
                children: Vec::new(),
            });
        }

        Taxonomy::from_nodes(nodes)
    }

    fn from_nodes(nodes: Vec<Node>) -> Taxonomy {
        let mut by_id = AHashMap::with_capacity(nodes.len());
        let mut by_name = AHashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            by_id.insert(node.id, idx);
            by_name.insert((node.record.name.clone(), node.record.tax_id), node.id);
        }
        Taxonomy {
            nodes,
            by_id,
            by_name,
        }
    }

    /// Nodes in ascending id order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn get(&self, id: u32) -> Option<&Node> {
        self.by_id.get(&id).map(|&idx| &self.nodes[idx])
    }

    /// Look up a node id by name and tax id.
    pub fn node_id(&self, name: &str, tax_id: u32) -> Option<u32> {
        self.by_name.get(&(name.to_string(), tax_id)).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Keep only nodes whose chain up to the root never passes through a
    /// domain-rank node outside `allowed`. A single pass in id order is
    /// enough because parents always precede their children; each node
    /// reuses its parent's verdict. Ids survive unchanged, so applying
    /// the same filter twice is a no-op.
    pub fn retain_domains(&self, allowed: &[String]) -> Taxonomy {
        let allowed: AHashSet<&str> = allowed.iter().map(String::as_str).collect();
        let mut keep: AHashMap<u32, bool> = AHashMap::with_capacity(self.nodes.len());

        for node in &self.nodes {
            let parent_ok = node
                .parent
                .map_or(true, |p| keep.get(&p).copied().unwrap_or(false));
            let own_ok = node.record.rank != RankCode::Domain
                || allowed.contains(node.record.name.as_str());
            keep.insert(node.id, parent_ok && own_ok);
        }

        let nodes = self
            .nodes
            .iter()
            .filter(|node| keep.get(&node.id).copied().unwrap_or(false))
            .map(|node| Node {
                id: node.id,
                record: node.record.clone(),
                parent: node.parent,
                children: node
                    .children
                    .iter()
                    .copied()
                    .filter(|child| keep.get(child).copied().unwrap_or(false))
                    .collect(),
            })
            .collect();

        Taxonomy::from_nodes(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn sample() -> Vec<TaxonRecord> {
        vec![
            record(RankCode::Root, 1, "root", 0, 0),
            record(RankCode::Domain, 2, "Bacteria", 1, 10),
            record(RankCode::Phylum, 1224, "Proteobacteria", 2, 5),
            record(RankCode::Genus, 561, "Escherichia", 3, 80),
            record(RankCode::Domain, 2157, "Archaea", 1, 3),
            record(RankCode::Genus, 2172, "Methanobrevibacter", 2, 7),
        ]
    }

    #[test]
    fn ids_follow_traversal_order() {
        let tax = Taxonomy::from_records(sample());
        assert_eq!(tax.len(), 6);
        for (idx, node) in tax.nodes().iter().enumerate() {
            assert_eq!(node.id as usize, idx);
        }
        assert_eq!(tax.get(3).unwrap().record.name, "Escherichia");
        assert_eq!(tax.get(3).unwrap().parent, Some(2));
        assert_eq!(tax.get(4).unwrap().parent, Some(0));
        assert_eq!(tax.get(0).unwrap().children, vec![1, 4]);
    }

    #[test]
    fn reindexing_identical_records_is_deterministic() {
        let a = Taxonomy::from_records(sample());
        let b = Taxonomy::from_records(sample());
        for (x, y) in a.nodes().iter().zip(b.nodes()) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.parent, y.parent);
            assert_eq!(x.record, y.record);
        }
    }

    #[test]
    fn depth_jump_attaches_to_nearest_shallower_ancestor() {
        let records = vec![
            record(RankCode::Root, 1, "root", 0, 0),
            record(RankCode::Domain, 2, "Bacteria", 1, 0),
            // jumps from depth 1 to depth 4
            record(RankCode::Genus, 561, "Escherichia", 4, 80),
            record(RankCode::Species, 562, "Escherichia coli", 5, 60),
        ];
        let tax = Taxonomy::from_records(records);
        assert_eq!(tax.get(2).unwrap().parent, Some(1));
        assert_eq!(tax.get(3).unwrap().parent, Some(2));
    }

    #[test]
    fn name_lookup_is_keyed_by_name_and_tax_id() {
        let records = vec![
            record(RankCode::Root, 1, "root", 0, 0),
            record(RankCode::Genus, 100, "Buchnera", 1, 5),
            record(RankCode::Genus, 200, "Buchnera", 1, 9),
        ];
        let tax = Taxonomy::from_records(records);
        assert_eq!(tax.node_id("Buchnera", 100), Some(1));
        assert_eq!(tax.node_id("Buchnera", 200), Some(2));
        assert_eq!(tax.node_id("Buchnera", 300), None);
    }

    #[test]
    fn domain_filter_drops_whole_subtrees() {
        let tax = Taxonomy::from_records(sample());
        let pruned = tax.retain_domains(&["Bacteria".to_string()]);
        let names: Vec<&str> = pruned
            .nodes()
            .iter()
            .map(|n| n.record.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["root", "Bacteria", "Proteobacteria", "Escherichia"]
        );
        // ids survive pruning untouched
        assert_eq!(pruned.get(3).unwrap().record.name, "Escherichia");
        assert!(pruned.get(4).is_none());
        assert_eq!(pruned.get(0).unwrap().children, vec![1]);
    }

    #[test]
    fn domain_filter_is_idempotent() {
        let allowed = vec!["Bacteria".to_string(), "Archaea".to_string()];
        let tax = Taxonomy::from_records(sample());
        let once = tax.retain_domains(&allowed);
        let twice = once.retain_domains(&allowed);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.nodes().iter().zip(twice.nodes()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.parent, b.parent);
            assert_eq!(a.children, b.children);
        }
    }

    #[test]
    fn cumulative_reads_contain_children() {
        let records = vec![
            record(RankCode::Root, 1, "root", 0, 0),
            TaxonRecord {
                reads_cumulative: 90,
                ..record(RankCode::Domain, 2, "Bacteria", 1, 10)
            },
            TaxonRecord {
                reads_cumulative: 80,
                ..record(RankCode::Genus, 561, "Escherichia", 2, 80)
            },
        ];
        let mut with_root = records;
        with_root[0].reads_cumulative = 95;
        let tax = Taxonomy::from_records(with_root);
        for node in tax.nodes() {
            let child_sum: u64 = node
                .children
                .iter()
                .filter_map(|&c| tax.get(c))
                .map(|c| c.record.reads_cumulative)
                .sum();
            assert!(node.record.reads_cumulative >= child_sum);
        }
    }
}
