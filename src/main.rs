/*!
Main binary for jsonsm.
*/

use anyhow::{Context, Result, bail};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use log::{debug, warn};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use jsonsm::{MatchError, Matcher, MatcherConfig, commands, filter, utils};

/// Filter newline-delimited JSON documents with compiled match expressions.
///
/// A document is printed when the first filter is true and no later filter
/// is false.
#[derive(Parser)]
#[command(
    name = "jsm",
    version,
    about,
    arg_required_else_help = true,
    args_conflicts_with_subcommands = true,
    disable_help_subcommand = true
)]
struct Args {
    /// Optional subcommands
    #[command(subcommand)]
    command: Option<Commands>,
    /// Filters in JSON-array form
    /// (e.g., '["equals", ["field", "name"], ["value", "mike"]]')
    filters: Vec<String>,
    /// Read additional filters from FILE, one per line
    #[arg(short, long, value_name = "FILE")]
    filter_file: Option<PathBuf>,
    /// Path to NDJSON input. If omitted, reads from STDIN
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,
    /// Print only the number of matching documents
    #[arg(short, long, action = ArgAction::SetTrue)]
    count: bool,
    /// Select documents that do not match
    #[arg(long, action = ArgAction::SetTrue)]
    invert: bool,
    /// Maximum expression nesting evaluated per document
    #[arg(long, default_value_t = jsonsm::matcher::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    /// Per-document evaluation time budget in milliseconds
    #[arg(long, value_name = "MS")]
    time_budget_ms: Option<u64>,
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

/// Available subcommands for `jsm`
#[derive(Subcommand)]
enum Commands {
    /// Print the token stream of a JSON document
    Tokens {
        /// Path to the document. If omitted, reads from STDIN
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
        /// Print tokens as a JSON array
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    #[command(subcommand)]
    /// Generate additional documentation and/or completions
    Generate(GenerateCommand),
}

/// Generate shell completions and man page
#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate shell completions for the given shell to stdout.
    Shell { shell: clap_complete::Shell },
    /// Generate a man page for jsm to output directory if specified, else
    /// the current directory.
    Man {
        /// The output directory to write the man pages.
        #[clap(short, long)]
        output_dir: Option<PathBuf>,
    },
}

/// Entry point for main binary.
///
/// Compiles the filters, then evaluates them against each line of the input
/// and prints the selected documents verbatim to STDOUT.
fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    match args.command {
        Some(Commands::Tokens { ref input, json }) => {
            let input = utils::read_input(input.as_deref())?;
            commands::tokens::print_tokens(&input, json)
        }
        Some(Commands::Generate(ref cmd)) => match cmd {
            GenerateCommand::Shell { shell } => {
                let mut cmd = Args::command();
                commands::generate::write_completions(
                    *shell,
                    &mut cmd,
                    &mut io::stdout().lock(),
                );
                Ok(())
            }
            GenerateCommand::Man { output_dir } => {
                let written = commands::generate::generate_man_pages(
                    &Args::command(),
                    output_dir.clone(),
                )?;
                for path in written {
                    println!("Generated: {}", path.display());
                }
                Ok(())
            }
        },
        None => run_filters(&args),
    }
}

/// Compile the filters named by `args` into a [`Matcher`].
fn build_matcher(args: &Args) -> Result<Matcher> {
    let mut sources = args.filters.clone();
    if let Some(path) = &args.filter_file {
        let text = std::fs::read_to_string(path).with_context(|| {
            format!("Failed to read filter file {}", path.display())
        })?;
        sources.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }
    if sources.is_empty() {
        bail!("At least one filter is required unless using a subcommand");
    }

    let expressions = sources
        .iter()
        .map(|source| {
            filter::parse_filter_str(source)
                .with_context(|| format!("Failed to parse filter {source}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut config = MatcherConfig::default().with_max_depth(args.max_depth);
    if let Some(ms) = args.time_budget_ms {
        config = config.with_time_budget(Duration::from_millis(ms));
    }
    Ok(Matcher::with_config(expressions, config))
}

fn run_filters(args: &Args) -> Result<()> {
    let matcher = build_matcher(args)?;

    if args.input.is_none() && io::stdin().is_terminal() {
        // No piped input and no file specified
        let mut cmd = Args::command();
        return Ok(cmd.print_help()?);
    }
    let input = utils::read_input(args.input.as_deref())?;

    let mut selected = 0usize;
    utils::write_output(&mut io::stdout().lock(), |out| {
        for (index, doc) in utils::documents(&input).enumerate() {
            let matched = match matcher.evaluate(doc) {
                Ok(evaluation) => evaluation.matched,
                Err(err @ MatchError::Document(_)) => {
                    warn!("Skipping document {}: {err}", index + 1);
                    continue;
                }
                Err(err) => {
                    debug!("Document {} does not match: {err}", index + 1);
                    false
                }
            };
            if matched != args.invert {
                selected += 1;
                if !args.count {
                    out.write_all(doc)?;
                    out.write_all(b"\n")?;
                }
            }
        }
        if args.count {
            writeln!(out, "{selected}")?;
        }
        Ok(())
    })
}
