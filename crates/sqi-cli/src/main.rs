//! sqi CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sqi", version, about = "Student Quality Index engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute SQI breakdowns and export summary payloads
    Compute {
        /// Path to a student attempt .json file or a directory of them
        #[arg(long)]
        input: PathBuf,

        /// Output directory (default: from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, markdown, text, all (default: from config)
        #[arg(long)]
        format: Option<String>,

        /// Keep only the N highest-priority ranked concepts
        #[arg(long)]
        top: Option<usize>,

        /// Print how each attempt contributed to the score
        #[arg(long)]
        explain: bool,

        /// Print the JSON payload to stdout instead of writing files
        #[arg(long)]
        stdout: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate student attempt JSON files
    Validate {
        /// Path to a student .json file or directory
        #[arg(long)]
        input: PathBuf,
    },

    /// Create starter config and sample student data
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sqi=info".parse().expect("static directive is valid")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compute {
            input,
            output,
            format,
            top,
            explain,
            stdout,
            config,
        } => commands::compute::execute(commands::compute::ComputeArgs {
            input,
            output,
            format,
            top,
            explain,
            stdout,
            config,
        }),
        Commands::Validate { input } => commands::validate::execute(input),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
