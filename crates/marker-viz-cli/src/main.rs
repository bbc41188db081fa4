//! marker-viz CLI - render marker-style comparison pages

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

mod commands;

/// Marker-style and JPEG-rank comparison charts.
#[derive(Parser)]
#[command(name = "marker-viz")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Root directory the CSV resources are resolved against
    #[arg(long, global = true, env = "MARKER_VIZ_DATA_DIR", default_value = "assets")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a standalone HTML page with every view
    Render {
        /// Output HTML file
        #[arg(short, long, default_value = "marker-viz.html")]
        output: PathBuf,

        /// Also write the precomputed view bundle as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Citation block to embed with a copy button
        #[arg(long)]
        citation: Option<PathBuf>,
    },

    /// Print the comparison of one marker style against default
    Compare {
        /// Dataset (e.g. DA2k, SPair)
        #[arg(long, default_value = "DA2k")]
        dataset: String,

        /// Marker style (e.g. "color blue", radius_3)
        #[arg(long, default_value = "default")]
        style: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print per-benchmark rank ranges under JPEG compression
    Ranks {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print a citation block, optionally copying it to the clipboard
    Cite {
        /// File holding the citation text
        #[arg(short, long)]
        input: PathBuf,

        /// Copy to the system clipboard
        #[arg(long)]
        copy: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render { output, json, citation } => {
            commands::render::run(&cli.data_dir, &output, json.as_deref(), citation.as_deref())
        }
        Commands::Compare { dataset, style, json } => {
            commands::compare::run(&cli.data_dir, &dataset, &style, json)
        }
        Commands::Ranks { json } => commands::ranks::run(&cli.data_dir, json),
        Commands::Cite { input, copy } => commands::cite::run(&input, copy),
    }
}
