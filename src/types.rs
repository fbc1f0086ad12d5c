//src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Taxonomic rank of one report row, decoded from the 1-3 character
/// rank column. Sub-level codes such as `D1` or `S2`, and the unranked
/// marker `-`, all collapse into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankCode {
    Domain,
    Kingdom,
    Phylum,
    Class,
    Order,
    Family,
    Genus,
    Species,
    Unclassified,
    Root,
    Other,
}

impl RankCode {
    /// Decode a report rank code. Returns `None` for codes that are not
    /// valid in a report (empty, longer than 3 characters, or containing
    /// anything besides a leading letter, digits, or a lone `-`).
    pub fn from_code(code: &str) -> Option<RankCode> {
        let code = code.trim();
        if code.is_empty() || code.len() > 3 {
            return None;
        }
        match code {
            "D" => Some(RankCode::Domain),
            "K" => Some(RankCode::Kingdom),
            "P" => Some(RankCode::Phylum),
            "C" => Some(RankCode::Class),
            "O" => Some(RankCode::Order),
            "F" => Some(RankCode::Family),
            "G" => Some(RankCode::Genus),
            "S" => Some(RankCode::Species),
            "U" => Some(RankCode::Unclassified),
            "R" => Some(RankCode::Root),
            "-" => Some(RankCode::Other),
            _ => {
                let mut chars = code.chars();
                let head = chars.next()?;
                if head.is_ascii_alphabetic() && chars.all(|c| c.is_ascii_digit()) {
                    // sub-level codes like R1, D2, S1
                    Some(RankCode::Other)
                } else {
                    None
                }
            }
        }
    }

    /// The single-letter display code. `Other` displays as `-`.
    pub fn letter(&self) -> &'static str {
        match self {
            RankCode::Domain => "D",
            RankCode::Kingdom => "K",
            RankCode::Phylum => "P",
            RankCode::Class => "C",
            RankCode::Order => "O",
            RankCode::Family => "F",
            RankCode::Genus => "G",
            RankCode::Species => "S",
            RankCode::Unclassified => "U",
            RankCode::Root => "R",
            RankCode::Other => "-",
        }
    }
}

impl fmt::Display for RankCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

impl FromStr for RankCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RankCode::from_code(s).ok_or_else(|| format!("unrecognized rank code '{s}'"))
    }
}

/// A structured representation of one row in the classification report.
/// For example:
///  %  cladeReads  taxReads  rank  taxID  name
#[derive(Debug, Clone, PartialEq)]
pub struct TaxonRecord {
    pub rank: RankCode,
    pub tax_id: u32,
    pub name: String,
    /// Tree depth, decoded from the indentation of the name column.
    pub depth: usize,
    /// Reads in this taxon plus all descendants.
    pub reads_cumulative: u64,
    /// Reads assigned specifically to this taxon.
    pub reads_assigned: u64,
    pub percent: f64,
}

/// Classified/unclassified read totals from the two reserved report rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub classified_reads: u64,
    pub unclassified_reads: u64,
    pub classified_percent: f64,
    pub unclassified_percent: f64,
    pub total_reads: u64,
}

/// Link arrays for the flow graph. All four arrays have the same length
/// and `source`/`target` are 0-based indices into the label list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SankeyLinks {
    pub source: Vec<usize>,
    pub target: Vec<usize>,
    pub value: Vec<u64>,
    pub label: Vec<String>,
}

/// Flow graph data in the shape the rendering layer consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyData {
    pub labels: Vec<String>,
    pub links: SankeyLinks,
    /// Node padding, passed through to the plot unchanged.
    pub pad: u32,
}

impl SankeyData {
    /// A structurally valid graph with no nodes, used before the first
    /// report exists and when filtering prunes everything away.
    pub fn empty(pad: u32) -> SankeyData {
        SankeyData {
            labels: Vec::new(),
            links: SankeyLinks::default(),
            pad,
        }
    }
}

/// One ancestor-path row for the icicle and sunburst plots. The topmost
/// row carries an empty parent label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathRow {
    pub taxon: String,
    pub parent: String,
    pub reads: u64,
}

/// Flat parent-labelled path table for the icicle and sunburst plots.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathTable {
    pub rows: Vec<PathRow>,
}

/// One entry in the most-abundant-taxa list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopListRow {
    pub name: String,
    pub tax_id: u32,
    pub rank: String,
    pub reads: u64,
}

/// One entry in the species-of-interest table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathogenRow {
    pub name: String,
    pub tax_id: u32,
    pub reads: u64,
    pub percent: f64,
    pub log10_reads: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_codes_decode() {
        assert_eq!(RankCode::from_code("D"), Some(RankCode::Domain));
        assert_eq!(RankCode::from_code(" S "), Some(RankCode::Species));
        assert_eq!(RankCode::from_code("U"), Some(RankCode::Unclassified));
        assert_eq!(RankCode::from_code("R"), Some(RankCode::Root));
        assert_eq!(RankCode::from_code("-"), Some(RankCode::Other));
        assert_eq!(RankCode::from_code("D1"), Some(RankCode::Other));
        assert_eq!(RankCode::from_code("S22"), Some(RankCode::Other));
    }

    #[test]
    fn bad_rank_codes_rejected() {
        assert_eq!(RankCode::from_code(""), None);
        assert_eq!(RankCode::from_code("XYZW"), None);
        assert_eq!(RankCode::from_code("1D"), None);
        assert_eq!(RankCode::from_code("D?"), None);
        assert!("Q!".parse::<RankCode>().is_err());
    }

    #[test]
    fn rank_letters_round_trip() {
        for rank in [
            RankCode::Domain,
            RankCode::Kingdom,
            RankCode::Phylum,
            RankCode::Class,
            RankCode::Order,
            RankCode::Family,
            RankCode::Genus,
            RankCode::Species,
            RankCode::Unclassified,
            RankCode::Root,
        ] {
            assert_eq!(RankCode::from_code(rank.letter()), Some(rank));
        }
        assert_eq!(RankCode::Other.letter(), "-");
    }
}
