use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use search_core::collection::{build_index, read_collection};
use search_core::persist::{load_index, save_index, IndexPaths};
use tracing_subscriber::{EnvFilter, fmt};

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and inspect tf/idf index files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build <output>.tf and <output>.idf from a collection file or directory
    Build {
        /// Input path (.xml collection file or a directory of them)
        #[arg(long)]
        input: PathBuf,
        /// Output prefix; defaults to the input path without its extension
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Load existing index files and print their sizes
    Stats {
        /// Collection prefix, e.g. ./data/nyt199501
        collection: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output } => {
            let output = output.unwrap_or_else(|| default_output(&input));
            build(&input, &output)
        }
        Commands::Stats { collection } => stats(&collection),
    }
}

fn default_output(input: &Path) -> PathBuf {
    if input.is_dir() { input.to_path_buf() } else { input.with_extension("") }
}

fn build(input: &Path, output: &Path) -> Result<()> {
    let docs = read_collection(input)
        .with_context(|| format!("reading collection {}", input.display()))?;
    tracing::info!(num_docs = docs.len(), input = %input.display(), "ingested documents");

    let index = build_index(&docs).context("building index")?;
    let paths = IndexPaths::new(output);
    save_index(&paths, &index).context("writing index files")?;

    tracing::info!(output = %output.display(), num_terms = index.idf_entries.len(), "index build complete");
    Ok(())
}

fn stats(collection: &Path) -> Result<()> {
    let paths = IndexPaths::new(collection);
    let (tf, idf) = load_index(&paths)
        .with_context(|| format!("loading index {}", collection.display()))?;
    println!("documents\t{}", tf.num_documents());
    println!("terms\t{}", idf.len());
    println!("tf rows\t{}", tf.num_entries());
    Ok(())
}
