//! kgqc CLI
//!
//! Builds a quality-control report for a merged knowledge graph:
//! - loads the node and edge tables (KGX TSV),
//! - loads the merge-stage QC tables (duplicate nodes/edges, dangling edges),
//! - groups everything by `provided_by` (or `--group-by`),
//! - writes the report as JSON, YAML or plain text.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

use kgqc_core::{build_qc_report, MergeQc, MergedKg, QcReportOptions, StorageMode};

mod render;
mod tsv;

#[derive(Parser)]
#[command(name = "kgqc")]
#[command(author, version, about = "Quality-control reports for merged knowledge graphs")]
struct Cli {
    /// Verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a QC report from node/edge TSVs and merge QC tables.
    Report(ReportArgs),
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Node table (TSV with at least an `id` column)
    #[arg(long)]
    nodes: PathBuf,
    /// Edge table (TSV with at least `id`, `subject`, `object`)
    #[arg(long)]
    edges: PathBuf,
    /// Duplicate nodes table
    #[arg(long)]
    duplicate_nodes: Option<PathBuf>,
    /// Duplicate edges table
    #[arg(long)]
    duplicate_edges: Option<PathBuf>,
    /// Dangling edges table
    #[arg(long)]
    dangling_edges: Option<PathBuf>,
    /// Directory holding `*duplicate-nodes.tsv`, `*duplicate-edges.tsv`,
    /// `*dangling-edges.tsv`. Explicit table flags take precedence.
    #[arg(long)]
    qc_dir: Option<PathBuf>,
    /// JSON file with report options (`storage_mode`, `group_by`)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Column to group nodes and edges by (default: provided_by)
    #[arg(long)]
    group_by: Option<String>,
    /// Container storage: keyed|sequence (aliases: dict|list)
    #[arg(long)]
    storage_mode: Option<String>,
    /// Output format: json|yaml|text
    #[arg(long, default_value = "json")]
    format: String,
    /// Output path (default: stdout)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(args: &ReportArgs) -> Result<QcReportOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<QcReportOptions>(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => QcReportOptions::default(),
    };
    if let Some(group_by) = &args.group_by {
        options.group_by = group_by.clone();
    }
    if let Some(mode) = &args.storage_mode {
        options.storage_mode = mode.parse::<StorageMode>()?;
    }
    Ok(options)
}

fn load_qc(args: &ReportArgs) -> Result<MergeQc> {
    let discovered = match &args.qc_dir {
        Some(dir) => tsv::discover_qc_tables(dir)?,
        None => tsv::QcTablePaths::default(),
    };
    let pick = |explicit: &Option<PathBuf>, found: Option<PathBuf>| explicit.clone().or(found);

    let duplicate_nodes = pick(&args.duplicate_nodes, discovered.duplicate_nodes);
    let duplicate_edges = pick(&args.duplicate_edges, discovered.duplicate_edges);
    let dangling_edges = pick(&args.dangling_edges, discovered.dangling_edges);

    Ok(MergeQc::new(
        tsv::read_optional_tsv(duplicate_nodes.as_deref())?,
        tsv::read_optional_tsv(duplicate_edges.as_deref())?,
        tsv::read_optional_tsv(dangling_edges.as_deref())?,
    ))
}

fn write_output(rendered: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn cmd_report(args: &ReportArgs) -> Result<()> {
    let format = args.format.trim().to_ascii_lowercase();
    if !matches!(format.as_str(), "json" | "yaml" | "text") {
        anyhow::bail!("unknown --format `{format}` (expected json|yaml|text)");
    }
    let options = load_options(args)?;

    let kg = MergedKg::new(tsv::read_tsv(&args.nodes)?, tsv::read_tsv(&args.edges)?);
    let qc = load_qc(args)?;
    let report = build_qc_report(&kg, &qc, &options)?;

    let rendered = match format.as_str() {
        "json" => serde_json::to_string_pretty(&report)?,
        "yaml" => serde_yaml::to_string(&report).context("failed to encode report as yaml")?,
        _ => render::render_report_text(&report),
    };
    write_output(&rendered, args.out.as_deref())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match &cli.command {
        Commands::Report(args) => cmd_report(args),
    }
}
