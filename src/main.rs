use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use colored::Colorize;
use humansize::{format_size, BINARY};
use lintex::logging::init_logger;
use lintex::{clean_paths, CleanConfig, CleanSummary, ExtensionRegistry, FsRemover};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Remove unneeded TeX auxiliary files and editor backup files",
    long_about = "Removes unneeded TeX auxiliary files and editor backup files from the given \
                  directories (default: the current directory). TeX auxiliary files are only \
                  removed when their modification time is more recent than the one of the \
                  related TeX source."
)]
struct Args {
    /// Directories to clean (defaults to current directory)
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Ask before removing any file
    #[arg(short = 'i', short_alias = 'I')]
    confirm: bool,

    /// Scan the subdirectories of the given directories recursively
    #[arg(short = 'r', short_alias = 'R')]
    recurse: bool,

    /// Keep final documents (.pdf, .ps, .dvi); they are neither removed nor reported
    #[arg(short = 'k', short_alias = 'K')]
    keep: bool,

    /// Trailing string identifying editor backup files; "" disables backup cleanup
    #[arg(
        short = 'b',
        short_alias = 'B',
        value_name = "SUFFIX",
        default_value = lintex::DEFAULT_BACKUP_SUFFIX
    )]
    backup_suffix: String,

    /// Show what would be removed, but don't remove anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// TOML file replacing the built-in extension registry
    #[arg(long, value_name = "FILE")]
    extensions: Option<PathBuf>,

    /// More diagnostics on stderr (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn config(&self) -> CleanConfig {
        CleanConfig {
            confirm: self.confirm,
            recurse: self.recurse,
            protect: self.keep,
            backup_suffix: self.backup_suffix.clone(),
            dry_run: self.dry_run,
        }
    }
}

fn print_summary(summary: &CleanSummary, config: &CleanConfig) {
    if config.dry_run {
        if summary.would_remove > 0 {
            println!("Dry run mode: No files were deleted.");
        }
        return;
    }

    if summary.removed > 0 {
        println!(
            "Total Removed: {} file{}, {}",
            summary.removed,
            if summary.removed == 1 { "" } else { "s" },
            format_size(summary.removed_bytes, BINARY).bold().red()
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let registry = match &args.extensions {
        Some(path) => ExtensionRegistry::load(path)?,
        None => ExtensionRegistry::builtin().context("Failed to load extension registry")?,
    };

    let config = args.config();
    let mut remover = FsRemover::from_config(&config);
    let summary = clean_paths(&args.paths, &config, &registry, &mut remover);

    info!(
        "{} directories scanned, {} files removed, {} kept, {} errors",
        summary.directories,
        summary.removed,
        summary.kept(),
        summary.errors
    );
    print_summary(&summary, &config);

    Ok(())
}
