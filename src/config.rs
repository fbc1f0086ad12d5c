// src/config.rs

use crate::error::EngineError;
use crate::types::RankCode;

/// Engine-wide defaults and the sets that per-refresh filter requests are
/// validated against. Loading this from a file is the embedding
/// application's concern; the engine only consumes the values.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Top-level domain names selectable for filtering.
    pub domains: Vec<String>,
    /// Full rank hierarchy, in column order.
    pub hierarchy: Vec<RankCode>,
    /// Ranks selected when a request does not say otherwise.
    pub default_ranks: Vec<RankCode>,
    /// Taxa kept per rank column in the flow graph.
    pub top_k: usize,
    /// Minimum assigned reads for the path table.
    pub min_reads: u64,
    /// Length of the most-abundant-taxa list.
    pub toplist_len: usize,
    /// Ranks included in the most-abundant-taxa list.
    pub toplist_ranks: Vec<RankCode>,
    /// Tax ids of species of interest.
    pub species_of_interest: Vec<u32>,
    /// Label of the synthetic column-padding nodes.
    pub ghost_label: String,
    /// Node padding handed through to the flow graph output.
    pub sankey_pad: u32,
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            domains: vec![
                "Bacteria".to_string(),
                "Archaea".to_string(),
                "Eukaryota".to_string(),
                "Viruses".to_string(),
            ],
            hierarchy: vec![
                RankCode::Domain,
                RankCode::Kingdom,
                RankCode::Phylum,
                RankCode::Class,
                RankCode::Order,
                RankCode::Family,
                RankCode::Genus,
                RankCode::Species,
            ],
            default_ranks: vec![
                RankCode::Domain,
                RankCode::Phylum,
                RankCode::Genus,
                RankCode::Species,
            ],
            top_k: 5,
            min_reads: 10,
            toplist_len: 20,
            toplist_ranks: vec![RankCode::Species],
            species_of_interest: Vec::new(),
            ghost_label: "none".to_string(),
            sankey_pad: 30,
        }
    }
}

/// Per-refresh filter state. Defaults come from the config; interactive
/// callers overwrite individual fields between refreshes.
#[derive(Debug, Clone)]
pub struct RefreshRequest {
    pub domains: Vec<String>,
    pub ranks: Vec<RankCode>,
    pub top_k: usize,
    pub min_reads: u64,
}

impl RefreshRequest {
    pub fn from_config(config: &EngineConfig) -> RefreshRequest {
        RefreshRequest {
            domains: config.domains.clone(),
            ranks: config.default_ranks.clone(),
            top_k: config.top_k,
            min_reads: config.min_reads,
        }
    }
}

impl EngineConfig {
    /// Check a request against the configured domain and rank sets and
    /// return a normalized copy: selected ranks are deduplicated and put
    /// back into hierarchy order, since checkbox-style callers hand them
    /// over in click order.
    pub fn validate(&self, request: &RefreshRequest) -> Result<RefreshRequest, EngineError> {
        for domain in &request.domains {
            if !self.domains.iter().any(|d| d == domain) {
                return Err(EngineError::InvalidFilter {
                    kind: "domain",
                    value: domain.clone(),
                });
            }
        }
        for rank in &request.ranks {
            if !self.hierarchy.contains(rank) {
                return Err(EngineError::InvalidFilter {
                    kind: "rank",
                    value: rank.letter().to_string(),
                });
            }
        }
        let ranks = self
            .hierarchy
            .iter()
            .filter(|rank| request.ranks.contains(rank))
            .copied()
            .collect();
        Ok(RefreshRequest {
            domains: request.domains.clone(),
            ranks,
            top_k: request.top_k,
            min_reads: request.min_reads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_restores_hierarchy_order() {
        let config = EngineConfig::default();
        let request = RefreshRequest {
            ranks: vec![RankCode::Species, RankCode::Domain, RankCode::Genus],
            ..RefreshRequest::from_config(&config)
        };
        let normalized = config.validate(&request).unwrap();
        assert_eq!(
            normalized.ranks,
            vec![RankCode::Domain, RankCode::Genus, RankCode::Species]
        );
    }

    #[test]
    fn validate_dedupes_ranks() {
        let config = EngineConfig::default();
        let request = RefreshRequest {
            ranks: vec![RankCode::Genus, RankCode::Genus],
            ..RefreshRequest::from_config(&config)
        };
        let normalized = config.validate(&request).unwrap();
        assert_eq!(normalized.ranks, vec![RankCode::Genus]);
    }

    #[test]
    fn unknown_domain_is_rejected() {
        let config = EngineConfig::default();
        let request = RefreshRequest {
            domains: vec!["Prions".to_string()],
            ..RefreshRequest::from_config(&config)
        };
        match config.validate(&request) {
            Err(EngineError::InvalidFilter { kind, value }) => {
                assert_eq!(kind, "domain");
                assert_eq!(value, "Prions");
            }
            other => panic!("expected InvalidFilter, got {other:?}"),
        }
    }

    #[test]
    fn unknown_rank_is_rejected() {
        let config = EngineConfig::default();
        let request = RefreshRequest {
            ranks: vec![RankCode::Root],
            ..RefreshRequest::from_config(&config)
        };
        assert!(matches!(
            config.validate(&request),
            Err(EngineError::InvalidFilter { kind: "rank", .. })
        ));
    }
}
