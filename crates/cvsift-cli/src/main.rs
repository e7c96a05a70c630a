use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

mod batch;

/// Resume parser - extract structured candidate records from documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a single resume and print the JSON record
    Parse {
        /// Path to the resume file
        file_path: PathBuf,

        /// Write the record to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse every PDF in a directory, writing records and sorting suspect
    /// source files into a separate directory
    Batch {
        /// Directory containing the resume PDFs
        input_dir: PathBuf,

        /// Directory for the JSON records
        #[arg(long, default_value = "output")]
        out_dir: PathBuf,

        /// Directory that suspect source files are moved into
        #[arg(long, default_value = "suspect")]
        suspect_dir: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Parse { file_path, output } => parse_single(&file_path, output.as_deref()),
        Command::Batch {
            input_dir,
            out_dir,
            suspect_dir,
            no_color,
        } => batch::run(&input_dir, &out_dir, &suspect_dir, !no_color),
    }
}

fn parse_single(file_path: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let json = cvsift_ingest::parse_to_json(file_path);
    match output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
