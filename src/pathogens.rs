// src/pathogens.rs

use ahash::AHashMap;

use crate::hierarchy::{Node, Taxonomy};
use crate::types::PathogenRow;

/// Fallback name for a watched tax id absent from the snapshot.
const NOT_FOUND: &str = "not found in DB";

/// Build the species-of-interest table over the unfiltered taxonomy.
/// Every watched id produces a row: ids missing from the snapshot come
/// back with zero reads so the table keeps a stable shape between
/// refreshes.
pub fn pathogen_rows(taxonomy: &Taxonomy, species: &[u32], total_reads: u64) -> Vec<PathogenRow> {
    let by_tax_id: AHashMap<u32, &Node> = taxonomy
        .nodes()
        .iter()
        .map(|node| (node.record.tax_id, node))
        .collect();

    species
        .iter()
        .map(|&tax_id| match by_tax_id.get(&tax_id) {
            Some(node) => {
                let reads = node.record.reads_assigned;
                let percent = if total_reads == 0 {
                    0.0
                } else {
                    100.0 * reads as f64 / total_reads as f64
                };
                let log10_reads = if reads == 0 { 0.0 } else { (reads as f64).log10() };
                PathogenRow {
                    name: node.record.name.clone(),
                    tax_id,
                    reads,
                    percent,
                    log10_reads,
                }
            }
            None => PathogenRow {
                name: NOT_FOUND.to_string(),
                tax_id,
                reads: 0,
                percent: 0.0,
                log10_reads: 0.0,
            },
        })
        .collect()
}
