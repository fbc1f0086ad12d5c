// src/lib.rs
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod pathogens;
pub mod paths;
pub mod report;
pub mod sankey;
pub mod toplist;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::config::{EngineConfig, RefreshRequest};
use crate::error::EngineError;
use crate::hierarchy::Taxonomy;
use crate::report::ParsedReport;
use crate::types::{PathTable, PathogenRow, SankeyData, TopListRow, Totals};

/// Everything one refresh derives from a report snapshot. Built from
/// scratch on every refresh and handed to the rendering layer as an
/// immutable value; nothing in here is ever patched between refreshes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshSnapshot {
    pub sankey: SankeyData,
    pub paths: PathTable,
    pub toplist: Vec<TopListRow>,
    pub pathogens: Vec<PathogenRow>,
    pub totals: Totals,
}

impl RefreshSnapshot {
    /// Structurally valid empty result, served before the first report
    /// exists and whenever filtering prunes every node away.
    pub fn placeholder(config: &EngineConfig) -> RefreshSnapshot {
        RefreshSnapshot {
            sankey: SankeyData::empty(config.sankey_pad),
            paths: PathTable::default(),
            toplist: Vec::new(),
            pathogens: pathogens::pathogen_rows(
                &Taxonomy::default(),
                &config.species_of_interest,
                0,
            ),
            totals: Totals::default(),
        }
    }
}

/// The pure transform from a parsed report to the derived outputs.
/// Validates the request, indexes the tree, prunes by domain, and runs
/// the flow-graph and path pipelines plus the summary tables. No I/O and
/// no shared state, so identical inputs always produce identical output.
pub fn build_snapshot(
    report: ParsedReport,
    config: &EngineConfig,
    request: &RefreshRequest,
) -> Result<RefreshSnapshot, EngineError> {
    let request = config.validate(request)?;

    let taxonomy = Taxonomy::from_records(report.records);
    let pruned = taxonomy.retain_domains(&request.domains);
    if pruned.is_empty() && !taxonomy.is_empty() {
        log::info!("domain filter pruned every taxon; producing empty outputs");
    }

    let sankey = sankey::build_sankey(
        &pruned,
        &request.ranks,
        request.top_k,
        &config.ghost_label,
        config.sankey_pad,
    );
    let paths = paths::build_paths(&pruned, request.min_reads);
    let toplist = toplist::create_top_list(&pruned, &config.toplist_ranks, config.toplist_len);
    let pathogens = pathogens::pathogen_rows(
        &taxonomy,
        &config.species_of_interest,
        report.totals.total_reads,
    );

    Ok(RefreshSnapshot {
        sankey,
        paths,
        toplist,
        pathogens,
        totals: report.totals,
    })
}

/// Rebuilds the derived data from the on-disk report on demand.
///
/// Each refresh reads a fresh snapshot of the report and builds a new
/// result value; the only state kept between calls is the last good
/// snapshot, used when a read races the producer's rewrite. The mutex
/// around it doubles as the refresh serializer: a second refresh blocks
/// until the in-flight one has stored its result, so consumers never
/// observe a half-built tree.
pub struct RefreshEngine {
    config: EngineConfig,
    report_path: PathBuf,
    last_good: Mutex<Arc<RefreshSnapshot>>,
}

impl RefreshEngine {
    pub fn new(config: EngineConfig, report_path: impl Into<PathBuf>) -> RefreshEngine {
        let placeholder = Arc::new(RefreshSnapshot::placeholder(&config));
        RefreshEngine {
            config,
            report_path: report_path.into(),
            last_good: Mutex::new(placeholder),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The most recent successfully built snapshot (or the placeholder).
    pub fn last_snapshot(&self) -> Arc<RefreshSnapshot> {
        self.last_good.lock().clone()
    }

    /// Run one refresh against the current report file.
    ///
    /// Filter mistakes are the caller's defect and come back as
    /// `InvalidFilter`. Everything the producer can do to us is recovered
    /// locally: a missing report yields the placeholder result, and a
    /// torn read (parse failure mid-rewrite) yields the previous good
    /// snapshot unchanged.
    pub fn refresh(
        &self,
        request: &RefreshRequest,
    ) -> Result<Arc<RefreshSnapshot>, EngineError> {
        let request = self.config.validate(request)?;

        let mut last_good = self.last_good.lock();

        let text = match report::read_report_file(&self.report_path) {
            Ok(text) => text,
            Err(err) => {
                log::info!("report not readable yet ({err}); serving placeholder");
                return Ok(Arc::new(RefreshSnapshot::placeholder(&self.config)));
            }
        };
        let parsed = match report::parse_report(&text) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warn!("report parse failed ({err}); keeping previous snapshot");
                return Ok(last_good.clone());
            }
        };

        let snapshot = Arc::new(build_snapshot(parsed, &self.config, &request)?);
        *last_good = snapshot.clone();
        Ok(snapshot)
    }
}
