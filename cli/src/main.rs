//! CLI for goal-progress.
//!
//! Renders tracking-issue progress bars and badges into project goal pages.

use clap::{Parser, Subcommand};
use goal_progress::{PageSummary, ProgressConfig, Runner, RunnerError};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Render tracking-issue progress into project goal pages.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Site root serving `api/{milestone}.json`. Replaces any `api-dir` from the config file.
    #[arg(long, global = true, env = "GOAL_PROGRESS_BASE_URL")]
    base_url: Option<String>,

    /// Directory containing `{milestone}.json` files, used instead of `--base-url`.
    #[arg(long, global = true)]
    api_dir: Option<PathBuf>,

    /// Maximum placeholders resolved at once.
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace the progress placeholders in HTML pages.
    Render {
        /// Pages to update.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Write the result here instead of stdout (single input only).
        #[arg(long, short, conflicts_with = "in_place")]
        output: Option<PathBuf>,

        /// Overwrite each input with its updated page.
        #[arg(long)]
        in_place: bool,
    },

    /// Print the fragment for one `milestone:org:repo:issue` identifier.
    Show {
        /// Identifier, e.g. `2024h2:rust-lang:rust-project-goals:123`.
        id: String,
    },
}

/// Errors that stop the CLI before or outside of placeholder processing.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error("{0}")]
    Usage(String),

    #[error("Failed to write to stdout: {0}")]
    Stdout(#[source] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Parse arguments
    let args = Args::parse();

    // Run the main logic
    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Logs go to stderr so rendered pages can be piped from stdout.
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Builds the configuration from the config file and command line overrides.
fn load_config(args: &Args) -> Result<ProgressConfig, RunnerError> {
    let mut config = match &args.config {
        Some(path) => ProgressConfig::load(path)?,
        None => ProgressConfig::default(),
    };

    // An explicit base URL overrides a configured api-dir; --api-dir still wins over both.
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(api_dir) = &args.api_dir {
        config = config.with_api_dir(api_dir.clone());
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }

    Ok(config)
}

/// Main execution logic.
async fn run(args: Args) -> Result<PageSummary, CliError> {
    let runner = Runner::new(load_config(&args)?)?;

    match args.command {
        Command::Render {
            inputs,
            output,
            in_place,
        } => render(&runner, &inputs, output, in_place).await,
        Command::Show { id } => {
            match runner.render_issue(&id).await? {
                Some(fragment) => println!("{fragment}"),
                None => warn!(id = %id, "Issue not found"),
            }
            Ok(PageSummary::default())
        }
    }
}

async fn render(
    runner: &Runner,
    inputs: &[PathBuf],
    output: Option<PathBuf>,
    in_place: bool,
) -> Result<PageSummary, CliError> {
    let mut total = PageSummary::new();

    if let Some(output) = output {
        let [input] = inputs else {
            return Err(CliError::Usage(
                "--output can only be used with a single input".to_string(),
            ));
        };
        total.merge(&runner.update_file(input, &output).await?);
        return Ok(total);
    }

    for input in inputs {
        info!(page = %input.display(), "Rendering page");
        if in_place {
            total.merge(&runner.update_file(input, input).await?);
        } else {
            let html = runner.read_page(input).await?;
            let update = runner.render_page(&html).await;
            std::io::stdout()
                .write_all(update.html.as_bytes())
                .map_err(CliError::Stdout)?;
            total.merge(&update.summary);
        }
    }

    Ok(total)
}

/// Prints the final summary to stderr.
fn print_summary(summary: &PageSummary) {
    if summary.placeholders == 0 {
        return;
    }
    eprintln!("\nSummary:");
    eprintln!("  Placeholders: {}", summary.placeholders);
    eprintln!("  Rendered: {}", summary.rendered);
    eprintln!("  Not found: {}", summary.not_found);
    eprintln!("  Skipped: {}", summary.skipped);
    eprintln!("  Failed: {}", summary.failed);
}
