use std::fs;
use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use taxflow_rs::config::{EngineConfig, RefreshRequest};
use taxflow_rs::types::RankCode;
use taxflow_rs::RefreshEngine;

/// Rebuild the visualization data for one classification report.
#[derive(Parser)]
#[command(name = "taxflow-rs", version, about)]
struct Cli {
    /// Path to the cumulative classification report (.kreport2, plain or gzipped)
    #[arg(long)]
    report: PathBuf,

    /// Directory the derived JSON files are written into
    #[arg(long, default_value = "taxflow_out")]
    out: PathBuf,

    /// Domains to keep, comma separated
    #[arg(long, value_delimiter = ',')]
    domains: Option<Vec<String>>,

    /// Rank letters for the flow-graph columns, comma separated
    #[arg(long, value_delimiter = ',')]
    ranks: Option<Vec<RankCode>>,

    /// Taxa kept per rank column
    #[arg(long)]
    top_k: Option<usize>,

    /// Minimum assigned reads for the path table
    #[arg(long)]
    min_reads: Option<u64>,
}

fn spinner(color: &str, message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
            ])
            .template(&format!("{{spinner:.{color}}} {{msg}}"))
            .expect("Invalid spinner template"),
    );
    bar.set_message(message.to_string());
    bar
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = EngineConfig::default();
    let mut request = RefreshRequest::from_config(&config);
    if let Some(domains) = cli.domains {
        request.domains = domains;
    }
    if let Some(ranks) = cli.ranks {
        request.ranks = ranks;
    }
    if let Some(top_k) = cli.top_k {
        request.top_k = top_k;
    }
    if let Some(min_reads) = cli.min_reads {
        request.min_reads = min_reads;
    }

    // 1. Refresh against the report snapshot
    let bar = spinner("green", "Rebuilding visualization data...");
    let engine = RefreshEngine::new(config, &cli.report);
    let snapshot = match engine.refresh(&request) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            bar.finish_with_message("Refresh failed.");
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    bar.finish_with_message(format!(
        "Derived {} flow nodes, {} path rows.",
        snapshot.sankey.labels.len(),
        snapshot.paths.rows.len()
    ));

    // 2. Write the outputs
    let bar = spinner("yellow", "Writing output files...");
    fs::create_dir_all(&cli.out).expect("Could not create output directory");

    let write = |file: &str, json: serde_json::Result<String>| {
        let json = json.expect("Could not serialize output");
        fs::write(cli.out.join(file), json)
            .unwrap_or_else(|err| panic!("Could not write {file}: {err}"));
    };
    write("sankey.json", serde_json::to_string_pretty(&snapshot.sankey));
    write("paths.json", serde_json::to_string_pretty(&snapshot.paths));
    write("toplist.json", serde_json::to_string_pretty(&snapshot.toplist));
    write("totals.json", serde_json::to_string_pretty(&snapshot.totals));
    if !snapshot.pathogens.is_empty() {
        write(
            "pathogens.json",
            serde_json::to_string_pretty(&snapshot.pathogens),
        );
    }
    bar.finish_with_message("Output files created.");
}
