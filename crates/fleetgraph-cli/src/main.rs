//! Fleetgraph CLI
//!
//! Turns the declared fleet ontology into:
//! - a static PNG picture (`static`)
//! - a standalone interactive HTML page (`interactive`)
//! - a Cypher load script for a graph store (`cypher`)
//! - DOT / JSON exports of the graph (`export`)

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use fleetgraph_cli::pipeline::{self, ExportFormat, StepReport};
use fleetgraph_cli::PipelinePaths;
use fleetgraph_cypher::DEFAULT_PREVIEW_CHARS;
use fleetgraph_ontology::ValidationMode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fleetgraph")]
#[command(author, version, about = "Fleetgraph: fleet ontology visualizer and graph-store exporter")]
struct Cli {
    /// Project directory holding `ontology/` and `artifacts/`.
    #[arg(long, global = true, default_value = ".")]
    base: PathBuf,

    /// Reject relationships whose endpoints are not declared entities.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the ontology source and its concept / relationship tables.
    Show,

    /// Render the static PNG picture.
    Static {
        /// Output PNG (defaults to `artifacts/ontology_graph.png`).
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Also write the intermediate SVG here.
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Render the interactive HTML page.
    Interactive {
        /// Output HTML (defaults to `artifacts/ontology_graph_interactive.html`).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Generate the Cypher load script and print a preview.
    Cypher {
        /// Output script (defaults to `artifacts/ontology_graph.cypher`).
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Characters of the script to echo.
        #[arg(long, default_value_t = DEFAULT_PREVIEW_CHARS)]
        preview: usize,
    },

    /// Export the graph as DOT or JSON.
    Export {
        #[arg(long, value_enum, default_value_t = FormatArg::Dot)]
        format: FormatArg,
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Static image, interactive page and Cypher script in one go.
    All,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Dot,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Dot => ExportFormat::Dot,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let paths = PipelinePaths::from_base(&cli.base);
    let mode = if cli.strict {
        ValidationMode::Strict
    } else {
        ValidationMode::Permissive
    };

    match cli.command {
        Commands::Show => {
            let report = pipeline::show(&paths, mode)?;
            print_diagnostics(&report);
            println!("{}", report.summary);
        }
        Commands::Static { out, svg } => {
            let report = pipeline::build_static(&paths, mode, out.as_deref(), svg.as_deref())?;
            print_report(&report);
            if let Some(svg) = svg {
                println!("  {} {}", "→".cyan(), svg.display());
            }
        }
        Commands::Interactive { out } => {
            print_report(&pipeline::build_interactive(&paths, mode, out.as_deref())?);
        }
        Commands::Cypher { out, preview } => {
            let report = pipeline::build_cypher(&paths, mode, out.as_deref(), preview)?;
            print_report(&report);
            println!();
            println!("{}", report.summary);
        }
        Commands::Export { format, out } => {
            print_report(&pipeline::export(&paths, mode, format.into(), &out)?);
        }
        Commands::All => {
            for report in pipeline::run_all(&paths, mode, DEFAULT_PREVIEW_CHARS)? {
                print_report(&report);
            }
        }
    }
    Ok(())
}

fn print_diagnostics(report: &StepReport) {
    for d in &report.diagnostics {
        eprintln!("{} {}", "warning:".yellow().bold(), d);
    }
}

fn print_report(report: &StepReport) {
    print_diagnostics(report);
    match &report.artifact {
        Some(path) => {
            // The cypher summary is the script preview; print it separately.
            let detail = if report.step == fleetgraph_cli::Step::Cypher {
                String::new()
            } else {
                format!(" ({})", report.summary)
            };
            println!(
                "{} {} {}{}",
                "ok".green().bold(),
                report.step.to_string().bold(),
                path.display(),
                detail
            );
        }
        None => println!("{}", report.summary),
    }
}
