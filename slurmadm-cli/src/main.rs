//! slurmadm CLI - validated access to Slurm's administrative tools
//!
//! This is the entry point for the slurmadm command-line tool, which provides:
//! - Accounting operations via `sacctmgr` (`acct` subcommand)
//! - Controller operations via `scontrol` (`ctl` subcommand)
//! - Shell completion generation (`completions` subcommand)
//!
//! All checking and execution lives in `slurmadm-core`; this binary only
//! parses arguments, resolves configuration, runs one request and renders the
//! outcome.

use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use slurmadm_core::{RunOutcome, Sacctmgr, Scontrol};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::FileConfig;

#[derive(Parser, Debug)]
#[command(
    name = "slurmadm",
    author,
    version,
    about = "Validated wrapper around Slurm's sacctmgr and scontrol",
    long_about = "Run sacctmgr and scontrol with whitelist validation, deterministic \
                  argument building, bounded timeouts and structured results. Unknown \
                  commands and entities are rejected before anything executes."
)]
struct Cli {
    /// Only log errors
    #[arg(long, short = 'q', global = true, conflicts_with = "debug")]
    quiet: bool,

    /// Verbose logging (shows every command line before it runs)
    #[arg(long, global = true)]
    debug: bool,

    /// How to render the outcome
    #[arg(long, global = true, value_enum, default_value = "json")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a sacctmgr accounting command (show, add, modify, delete, ...)
    Acct(AcctArgs),
    /// Run an scontrol controller command (show, update, hold, ...)
    Ctl(CtlArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct AcctArgs {
    /// Command keyword (for example: show, list, add, modify, delete)
    command: String,

    /// Entity keyword the command acts on (for example: account, user, qos)
    entity: String,

    /// Option string passed to the tool; shell-style quoting is respected
    #[arg(default_value = "")]
    options: String,

    /// Request JSON output and decode it into the outcome
    #[arg(long)]
    json: bool,

    /// Timeout for this run, in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Path to the sacctmgr executable
    #[arg(long, value_name = "PATH")]
    bin: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CtlArgs {
    /// Command keyword (for example: show, update, hold, reconfigure)
    command: String,

    /// Option tokens passed to the tool (for show/update/create/delete the
    /// first one names the entity)
    options: Vec<String>,

    /// Request JSON output where the command and entity support it
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum OutputFormat {
    /// Whole outcome as pretty-printed JSON (for automation)
    Json,
    /// Raw tool stdout; failure message on stderr
    Text,
}

fn init_tracing(debug: bool, quiet: bool) -> Result<()> {
    let default_filter = if debug {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug, cli.quiet).ok();

    match cli.command {
        Commands::Acct(args) => run_acct(args, cli.output).await?,
        Commands::Ctl(args) => run_ctl(args, cli.output).await?,
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

async fn run_acct(args: AcctArgs, output: OutputFormat) -> Result<()> {
    let file = FileConfig::load()?;
    let client = Sacctmgr::new(file.resolve_acct(args.bin, args.timeout)?)?;
    let use_json = args.json || file.default_json();
    info!(
        "running sacctmgr {} {} (json: {})",
        args.command, args.entity, use_json
    );

    let outcome = client
        .run(&args.command, &args.entity, &args.options, use_json)
        .await?;
    finish(&outcome, output)
}

async fn run_ctl(args: CtlArgs, output: OutputFormat) -> Result<()> {
    let file = FileConfig::load()?;
    let client = Scontrol::new(file.resolve_ctl(None, None)?)?;
    let use_json = args.json || file.default_json();
    info!("running scontrol {} (json: {})", args.command, use_json);

    let outcome = client
        .run(&args.command, &args.options.join(" "), use_json)
        .await?;
    finish(&outcome, output)
}

/// Render the outcome and exit non-zero when the tool failed.
fn finish(outcome: &RunOutcome, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(outcome)?),
        OutputFormat::Text => {
            if !outcome.stdout.is_empty() {
                print!("{}", outcome.stdout);
            }
            if let Some(message) = &outcome.message {
                eprintln!("{message}");
            }
        }
    }

    if !outcome.success {
        process::exit(outcome.exit_code.max(1));
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
