// src/toplist.rs

use crate::hierarchy::Taxonomy;
use crate::types::{RankCode, TopListRow};

/// The `len` most-abundant taxa at the given ranks, by assigned reads
/// descending with ties broken by ascending id. Domain filtering is the
/// caller's business: pass an already pruned taxonomy.
pub fn create_top_list(taxonomy: &Taxonomy, ranks: &[RankCode], len: usize) -> Vec<TopListRow> {
    let mut candidates: Vec<_> = taxonomy
        .nodes()
        .iter()
        .filter(|node| ranks.contains(&node.record.rank))
        .collect();
    candidates.sort_by(|a, b| {
        b.record
            .reads_assigned
            .cmp(&a.record.reads_assigned)
            .then(a.id.cmp(&b.id))
    });
    candidates.truncate(len);

    candidates
        .into_iter()
        .map(|node| TopListRow {
            name: node.record.name.clone(),
            tax_id: node.record.tax_id,
            rank: node.record.rank.letter().to_string(),
            reads: node.record.reads_assigned,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn sorts_by_reads_and_truncates() {
        let taxonomy = Taxonomy::from_records(vec![
            record(RankCode::Root, 1, "root", 0, 0),
            record(RankCode::Species, 10, "A", 1, 5),
            record(RankCode::Species, 11, "B", 1, 50),
            record(RankCode::Genus, 12, "C", 1, 99),
            record(RankCode::Species, 13, "D", 1, 50),
        ]);
        let rows = create_top_list(&taxonomy, &[RankCode::Species], 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "B");
        assert_eq!(rows[0].rank, "S");
        // tie at 50 reads resolves to the earlier row
        assert_eq!(rows[1].name, "D");
        assert_eq!(rows[1].tax_id, 13);
    }

    #[test]
    fn empty_when_no_rank_matches() {
        let taxonomy = Taxonomy::from_records(vec![record(RankCode::Root, 1, "root", 0, 0)]);
        assert!(create_top_list(&taxonomy, &[RankCode::Species], 5).is_empty());
    }
}
