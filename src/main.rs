//! # Folio CLI
//!
//! Usage:
//!   folio plan job.json -o plan.json
//!   echo '{ ... }' | folio plan --pretty
//!   folio merges merges.json
//!   folio example plan > job.json

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use folio::grid::plan::{span_row, split_row, vertical_runs};
use folio::model::CandidateRegion;
use folio::{GridBounds, MergeJob};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Plan report pages and validate cell merges")]
#[command(version)]
struct Cli {
    /// Log every page decision and accepted merge to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a document into pages
    Plan(IoArgs),
    /// Filter merge candidates into a conflict-free set
    Merges(IoArgs),
    /// Print an example job
    Example {
        #[arg(value_enum)]
        kind: ExampleKind,
    },
}

#[derive(Args)]
struct IoArgs {
    /// Job file. Reads stdin when omitted
    input: Option<PathBuf>,
    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExampleKind {
    Plan,
    Merges,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Plan(args) => {
            let input = read_input(args.input.as_deref())?;
            let plan = folio::plan_json(&input)?;
            write_output(&plan, &args)?;
            if args.output.is_some() {
                eprintln!(
                    "✓ Planned {} rows on {} pages",
                    plan.total_rows,
                    plan.page_count()
                );
            }
        }
        Commands::Merges(args) => {
            let input = read_input(args.input.as_deref())?;
            let report = folio::validate_merges_json(&input)?;
            write_output(&report, &args)?;
            if args.output.is_some() {
                eprintln!(
                    "✓ Accepted {} merges, rejected {}",
                    report.accepted.len(),
                    report.rejected.len()
                );
            }
        }
        Commands::Example { kind } => match kind {
            ExampleKind::Plan => print!("{}", example_plan_json()),
            ExampleKind::Merges => println!("{}", example_merges_json()?),
        },
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn write_output<T: Serialize>(value: &T, args: &IoArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match &args.output {
        Some(path) => fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn example_plan_json() -> &'static str {
    r#"{
  "document": {
    "headerHeight": 30,
    "footerHeight": 20,
    "totalRows": 100,
    "rowHeight": 5
  },
  "geometry": {
    "pageHeight": 280,
    "marginTop": 15,
    "marginBottom": 15,
    "reservedTrailerHeight": 15,
    "safetyMargin": 3
  },
  "bitmap": { "width": 1000, "height": 1100 },
  "outputWidth": 180,
  "sliceMode": "BodyOnly"
}
"#
}

/// A six-column report: title, two-part metadata row, then a body whose
/// first column repeats group names. Two hand-written candidates collide
/// with the planned ones so the example shows rejections too.
fn example_merges_json() -> Result<String> {
    let cols = 6;
    let body = vec![
        vec!["North", "Jan", "10"],
        vec!["North", "Feb", "12"],
        vec!["South", "Jan", "7"],
        vec!["South", "Feb", "7"],
    ];

    let mut candidates: Vec<CandidateRegion> = Vec::new();
    candidates.extend(span_row(0, cols).map(CandidateRegion::from));
    candidates.extend(split_row(2, cols, 2).into_iter().map(CandidateRegion::from));
    candidates.extend(vertical_runs(&body, 4).into_iter().map(CandidateRegion::from));
    candidates.push(CandidateRegion::new(0, 0, 1, 1));
    candidates.push(CandidateRegion::new(9, 2, 9, 2));

    let job = MergeJob {
        candidates,
        bounds: GridBounds::for_size(10, cols),
        limits: Default::default(),
    };
    Ok(serde_json::to_string_pretty(&job)?)
}
