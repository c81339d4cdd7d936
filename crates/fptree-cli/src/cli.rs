use clap::{Args, Parser, Subcommand, ValueEnum};
use fptree::core::scoring::ScoringScheme;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "fptree - builds colored phylogenetic trees of fluorescent protein families from aligned sequences.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a tree from an aligned FASTA file and color its leaves by
    /// emission wavelength.
    Build(BuildArgs),
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the input alignment in FASTA format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output tree in Newick format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path for the per-leaf decoration records (CSV). When omitted, no
    /// decoration file is written.
    #[arg(short, long, value_name = "PATH")]
    pub decorations: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Config Overrides ---
    /// Override the distance scheme from the config file.
    #[arg(short, long, value_enum, value_name = "SCHEME")]
    pub scheme: Option<SchemeArg>,

    /// Override the outgroup: two leaf labels whose common ancestor marks
    /// the rooting edge.
    #[arg(long, num_args = 2, value_names = ["LABEL_A", "LABEL_B"])]
    pub outgroup: Option<Vec<String>>,

    /// Override the wavelength offset (nm) added before color mapping.
    #[arg(long, value_name = "NM", allow_negative_numbers = true)]
    pub wavelength_offset: Option<i32>,

    /// Override the leaf label font size.
    #[arg(long, value_name = "SIZE")]
    pub font_size: Option<u32>,

    /// Override the branch line width.
    #[arg(long, value_name = "WIDTH")]
    pub line_width: Option<u32>,
}

/// The distance schemes selectable from the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeArg {
    /// Fraction of mismatching comparable columns.
    Identity,
    /// Normalized BLOSUM62 similarity distance.
    Blosum62,
}

impl From<SchemeArg> for ScoringScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Identity => ScoringScheme::Identity,
            SchemeArg::Blosum62 => ScoringScheme::Blosum62,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_subcommand_parses_all_overrides() {
        let cli = Cli::parse_from([
            "fptree",
            "build",
            "-i",
            "aligned.fasta",
            "-o",
            "tree.nwk",
            "-d",
            "leaves.csv",
            "--scheme",
            "identity",
            "--outgroup",
            "Bflo|LanFP1|500/510",
            "Cpop|CpYGFP|508/518",
            "--wavelength-offset",
            "-5",
        ]);

        let Commands::Build(args) = cli.command;
        assert_eq!(args.input, PathBuf::from("aligned.fasta"));
        assert_eq!(args.scheme, Some(SchemeArg::Identity));
        assert_eq!(args.wavelength_offset, Some(-5));
        assert_eq!(
            args.outgroup.as_deref(),
            Some(&["Bflo|LanFP1|500/510".to_string(), "Cpop|CpYGFP|508/518".to_string()][..])
        );
    }

    #[test]
    fn outgroup_requires_exactly_two_labels() {
        let result = Cli::try_parse_from([
            "fptree", "build", "-i", "a.fasta", "-o", "t.nwk", "--outgroup", "only-one",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        let result =
            Cli::try_parse_from(["fptree", "build", "-i", "a", "-o", "b", "-v", "--quiet"]);
        assert!(result.is_err());
    }
}
