//! dotfix CLI - diagnostics and code actions for DOT graph files
//!
//! Subcommands:
//! - check: report scan, parse and edge-operation diagnostics
//! - fix: make every edge operator agree with its graph keyword
//! - actions: list the code actions available at a position
//! - exec: run a code action command against a file
//! - commands: list every known command id

mod config;
mod output;
mod process;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use config::Config;
use dotfix_core::{Position, TextDocument, TextRange};
use dotfix_rules::{all_command_ids, CommandRegistry};
use output::{OutputFormat, Reporter};
use process::{actions_for, check_file, execute_command, fix_file, read_file, write_file};

#[derive(Parser)]
#[command(name = "dotfix")]
#[command(version)]
#[command(about = "Diagnostics and code actions for Graphviz DOT files")]
#[command(author = "dotfix contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show verbose output and debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Output format: text, json, diff (default: config or text)
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<String>,

    /// Path to config file (default: auto-detect .dotfix.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long, global = true)]
    no_config: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report diagnostics for files or directories
    Check {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Fix invalid edge operations, keeping each graph's keyword
    Fix {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Show changes without writing them
        #[arg(long, short = 'n')]
        dry_run: bool,
    },

    /// List code actions for a range as JSON
    Actions {
        file: PathBuf,

        /// Byte offset of the cursor or selection start
        #[arg(long, conflicts_with_all = ["line", "character"])]
        offset: Option<usize>,

        /// Byte offset of the selection end
        #[arg(long, requires = "offset")]
        end: Option<usize>,

        /// Zero-based line of the cursor
        #[arg(long, requires = "character")]
        line: Option<u32>,

        /// Zero-based UTF-16 column of the cursor
        #[arg(long, requires = "line")]
        character: Option<u32>,
    },

    /// Execute a command and print the edited document
    Exec {
        file: PathBuf,

        /// Command id, e.g. DOT.changeEdgeOp
        #[arg(long, value_name = "ID")]
        command: String,

        /// Command arguments as JSON
        #[arg(long, value_name = "JSON", default_value = "{}")]
        arguments: String,

        /// Write the result back to the file
        #[arg(long)]
        write: bool,
    },

    /// List every known command id
    Commands,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn initialize_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    // RUST_LOG, when set, overrides the default level
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .target(env_logger::Target::Stderr)
        .init();
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    initialize_logging(cli.verbose);

    let config = load_config(&cli)?;

    let format_name = cli
        .format
        .as_deref()
        .or(config.output.format.as_deref())
        .unwrap_or("text");
    let output_format = OutputFormat::from_str(format_name).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid output format '{}'. Valid options: text, json, diff",
            format_name
        )
    })?;

    let registry = CommandRegistry::new();
    let known = all_command_ids();
    for id in config.unknown_disabled_actions(&known) {
        eprintln!(
            "{}: Unknown command '{}' in [actions] disabled",
            "Warning".yellow(),
            id
        );
    }

    match cli.command {
        Commands::Check { paths } => run_check(&paths, &config, output_format, cli.verbose),
        Commands::Fix { paths, dry_run } => {
            run_fix(&paths, &config, &registry, output_format, cli.verbose, dry_run)
        }
        Commands::Actions {
            file,
            offset,
            end,
            line,
            character,
        } => run_actions(&file, &config, offset, end, line.zip(character)),
        Commands::Exec {
            file,
            command,
            arguments,
            write,
        } => run_exec(&file, &registry, &command, &arguments, write, output_format),
        Commands::Commands => {
            if output_format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&known)?);
            } else {
                println!("{}", "Available commands:".bold());
                for id in known {
                    println!("  {}", id.green());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    if cli.no_config {
        return Ok(Config::default());
    }

    let found = match &cli.config {
        Some(path) => Some((Config::load_path(path)?, path.clone())),
        None => Config::load()?,
    };

    Ok(match found {
        Some((config, path)) => {
            if cli.verbose {
                eprintln!("{}: {}", "Using config".bold(), path.display());
            }
            config
        }
        None => Config::default(),
    })
}

/// Expand directories into DOT files, sorted for deterministic output.
///
/// Returns the files and the paths that do not exist.
fn collect_files(paths: &[PathBuf], config: &Config) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut file_paths: Vec<PathBuf> = Vec::new();
    let mut missing_paths: Vec<PathBuf> = Vec::new();

    for path in paths {
        if path.is_file() {
            file_paths.push(path.clone());
        } else if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && config.has_dot_extension(e.path()))
            {
                let file_path = entry.path();
                if !config.should_exclude(file_path) {
                    file_paths.push(file_path.to_path_buf());
                }
            }
        } else {
            missing_paths.push(path.clone());
        }
    }

    file_paths.sort();
    file_paths.dedup();
    (file_paths, missing_paths)
}

fn warn_missing(missing_paths: &[PathBuf], output_format: OutputFormat) {
    if output_format != OutputFormat::Text {
        return;
    }
    for path in missing_paths {
        eprintln!("{}: Path does not exist: {}", "Warning".yellow(), path.display());
    }
}

fn run_check(
    paths: &[PathBuf],
    config: &Config,
    output_format: OutputFormat,
    verbose: bool,
) -> Result<ExitCode> {
    let (file_paths, missing_paths) = collect_files(paths, config);
    warn_missing(&missing_paths, output_format);

    // Order is preserved by collect, so results stay sorted by path
    let results: Vec<_> = file_paths.par_iter().map(|path| check_file(path)).collect();

    let mut reporter = Reporter::new(output_format, verbose);
    for (path, result) in file_paths.iter().zip(results) {
        match result {
            Ok(diagnostics) => reporter.report_diagnostics(path, diagnostics),
            Err(e) => reporter.report_error(path, &format!("{:#}", e)),
        }
    }

    let summary = reporter.summary();
    let exit_code = if summary.errors > 0 || summary.error_diagnostics > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    };

    reporter.finish(false)?;
    Ok(exit_code)
}

fn run_fix(
    paths: &[PathBuf],
    config: &Config,
    registry: &CommandRegistry,
    output_format: OutputFormat,
    verbose: bool,
    dry_run: bool,
) -> Result<ExitCode> {
    let (file_paths, missing_paths) = collect_files(paths, config);
    warn_missing(&missing_paths, output_format);

    let results: Vec<_> = file_paths
        .par_iter()
        .map(|path| fix_file(path, registry))
        .collect();

    let mut reporter = Reporter::new(output_format, verbose);
    for (path, result) in file_paths.iter().zip(results) {
        match result {
            Ok((source, Some(fixed))) => {
                if !dry_run {
                    write_file(path, &fixed.new_source)?;
                }
                reporter.report_fix(path, fixed.edits, &source, &fixed.new_source, !dry_run);
            }
            Ok((source, None)) => reporter.report_fix(path, vec![], &source, &source, !dry_run),
            Err(e) => reporter.report_error(path, &format!("{:#}", e)),
        }
    }

    let summary = reporter.summary();
    let exit_code = if summary.errors > 0 {
        ExitCode::from(1)
    } else if dry_run && summary.files_with_changes > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    };

    reporter.finish(dry_run)?;
    Ok(exit_code)
}

fn run_actions(
    file: &Path,
    config: &Config,
    offset: Option<usize>,
    end: Option<usize>,
    position: Option<(u32, u32)>,
) -> Result<ExitCode> {
    let source = read_file(file)?;

    let range = match (offset, position) {
        (Some(start), _) => {
            let end = end.unwrap_or(start);
            if start > end || end > source.len() {
                bail!(
                    "Invalid range {}..{} for {} ({} bytes)",
                    start,
                    end,
                    file.display(),
                    source.len()
                );
            }
            TextRange::new(start, end)
        }
        (None, Some((line, character))) => {
            let document = TextDocument::new(source.as_str());
            TextRange::empty(document.offset_at(Position::new(line, character)))
        }
        (None, None) => bail!("Either --offset or --line and --character is required"),
    };

    let actions: Vec<lsp_types::CodeAction> = actions_for(&source, range, config)
        .iter()
        .map(|action| action.to_lsp())
        .collect();
    if actions.is_empty() {
        println!("null");
    } else {
        println!("{}", serde_json::to_string_pretty(&actions)?);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_exec(
    file: &Path,
    registry: &CommandRegistry,
    command: &str,
    arguments: &str,
    write: bool,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let arguments: serde_json::Value =
        serde_json::from_str(arguments).context("Failed to parse --arguments as JSON")?;
    let source = read_file(file)?;
    let edited = execute_command(&source, command, arguments, registry)
        .with_context(|| format!("Failed to execute {} on {}", command, file.display()))?;

    if write {
        write_file(file, &edited)?;
        if output_format == OutputFormat::Text {
            println!("{} {}", "OK".green(), file.display());
        }
    } else {
        print!("{}", edited);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_actions_by_position() {
        let cli = Cli::parse_from(["dotfix", "actions", "g.dot", "--line", "1", "--character", "4"]);
        match cli.command {
            Commands::Actions { line, character, offset, .. } => {
                assert_eq!(line.zip(character), Some((1, 4)));
                assert!(offset.is_none());
            }
            _ => panic!("expected actions"),
        }
    }

    #[test]
    fn test_actions_offset_conflicts_with_position() {
        let result = Cli::try_parse_from([
            "dotfix", "actions", "g.dot", "--offset", "3", "--line", "0", "--character", "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["dotfix", "fix", "graphs", "--dry-run", "--format", "diff", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.format.as_deref(), Some("diff"));
        assert!(matches!(cli.command, Commands::Fix { dry_run: true, .. }));
    }

    #[test]
    fn test_collect_files_filters_and_sorts() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("build")).unwrap();
        fs::write(root.join("b.dot"), "graph {}").unwrap();
        fs::write(root.join("a.gv"), "graph {}").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();
        fs::write(root.join("build").join("out.dot"), "graph {}").unwrap();

        let config = Config {
            paths: config::PathsConfig {
                exclude: vec!["build/".to_string()],
                extensions: None,
            },
            ..Default::default()
        };
        let missing = root.join("missing");
        let (files, missing_paths) = collect_files(&[root.to_path_buf(), missing.clone()], &config);

        assert_eq!(files, vec![root.join("a.gv"), root.join("b.dot")]);
        assert_eq!(missing_paths, vec![missing]);
    }
}
