//! geoshard - Split a GeoJSON FeatureCollection into per-shape files
//!
//! Every feature of the input is written to its own file in the output directory and
//! recorded in an existing index file, which maps shape names to file locations.

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use geoshard::pipeline::{convert, ConvertOptions, DEFAULT_NAME_PROPERTY};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Convert a single GeoJSON file into one file per shape plus index entries.
#[derive(Parser, Debug)]
#[command(name = "geoshard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Location of the GeoJSON file to process
    input_file: PathBuf,

    /// Location where to write all resulting shape files
    output_dir: PathBuf,

    /// Location of the index file to append to
    #[arg(long = "index-file-location")]
    index_file_location: PathBuf,

    /// The prefix to put in the index file for each shape
    #[arg(long = "outputs-prefix", default_value = "")]
    outputs_prefix: String,

    /// Which of the existing properties to treat as the name of the shape
    #[arg(long = "input-name-property", default_value = DEFAULT_NAME_PROPERTY)]
    input_name_property: String,

    /// What type to give to all resulting shapes
    #[arg(long = "type")]
    type_name: String,

    /// Use debug logging level
    #[arg(short = 'v', long, action = ArgAction::SetTrue)]
    verbose: bool,
}

impl From<Args> for ConvertOptions {
    fn from(args: Args) -> Self {
        ConvertOptions::new(
            args.input_file,
            args.output_dir,
            args.index_file_location,
            args.type_name,
        )
        .with_outputs_prefix(args.outputs_prefix)
        .with_name_property(args.input_name_property)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let options = ConvertOptions::from(args);
    let summary = convert(&options)
        .with_context(|| format!("converting {}", options.input_file.display()))?;

    info!(
        shapes = summary.shapes_written,
        index_entries = summary.index_entries,
        "done"
    );
    Ok(())
}
