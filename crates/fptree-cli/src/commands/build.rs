use crate::cli::BuildArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use fptree::core::io::{decoration, fasta, newick};
use fptree::engine::progress::ProgressReporter;
use fptree::workflows;
use std::fs::File;
use tracing::{info, warn};

pub fn run(args: BuildArgs) -> Result<()> {
    let config = config::resolve(&args)?;

    info!("Loading alignment from {:?}", &args.input);
    let alignment =
        fasta::read_alignment_from_path(&args.input).map_err(|e| CliError::FileParsing {
            path: args.input.clone(),
            source: e.into(),
        })?;
    println!(
        "Loaded {} aligned sequences ({} columns).",
        alignment.len(),
        alignment.column_count()
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core phylogeny workflow...");
    let result = workflows::run(&alignment, &config, &reporter)?;

    let diagnostics = result.diagnostics;
    if diagnostics.undefined_distance_pairs > 0 {
        warn!(
            pairs = diagnostics.undefined_distance_pairs,
            "some sequence pairs shared no comparable columns"
        );
        println!(
            "Warning: {} sequence pair(s) shared no comparable columns and were set to maximum distance.",
            diagnostics.undefined_distance_pairs
        );
    }
    if diagnostics.clamped_branch_lengths > 0 {
        warn!(
            lengths = diagnostics.clamped_branch_lengths,
            "negative branch lengths were clamped to zero"
        );
        println!(
            "Warning: {} negative branch length(s) were clamped to zero.",
            diagnostics.clamped_branch_lengths
        );
    }

    let mut tree_file = File::create(&args.output)?;
    newick::write_tree(&result.tree, &mut tree_file).map_err(|e| CliError::FileParsing {
        path: args.output.clone(),
        source: e.into(),
    })?;
    println!("✓ Tree written to: {}", args.output.display());

    if let Some(path) = &args.decorations {
        let file = File::create(path)?;
        decoration::write_decorations(&result.decorations, file).map_err(|e| {
            CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            }
        })?;
        println!("✓ Leaf decorations written to: {}", path.display());
    }

    Ok(())
}
