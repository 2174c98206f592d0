//! # linkmeta CLI
//!
//! Command-line front end for the linkmeta session:
//!
//! - `start`: print usage instructions
//! - `extract`: read a table of URLs, fetch every page and write the result table
//!
//! Progress is shown on a spinner whose message is the session's status line.

mod telemetry;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Args, CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use linkmeta::crawler::{
    CrawlerConfig, DEFAULT_PROGRESS_INTERVAL, DEFAULT_TIMEOUT_SECS, HttpFetcher,
};
use linkmeta::session::{Reporter, Session, USAGE};
use linkmeta::table::TableFormat;
use tracing::{debug, instrument};

#[derive(Parser)]
#[command(author, version, about = "Extract Open Graph metadata for every URL in a spreadsheet", long_about = None)]
struct Cli {
    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show how to prepare the input spreadsheet
    Start,

    /// Fetch every URL in a spreadsheet and write the extracted metadata
    Extract(ExtractArgs),
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Input table (.xlsx or .csv) with a column named URL
    #[arg(required = true)]
    input: PathBuf,

    /// Output table (.xlsx, .csv or .json)
    #[arg(short, long, default_value = "result.xlsx")]
    output: PathBuf,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// User agent sent with every request
    #[arg(short, long)]
    user_agent: Option<String>,

    /// Report progress after every N URLs
    #[arg(short = 'p', long, default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    progress_every: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _telemetry = telemetry::init_tracing_subscriber(cli.log_dir.as_deref())?;

    match cli.command {
        Some(Commands::Start) => {
            println!("{}", USAGE);
        }
        Some(Commands::Extract(args)) => {
            extract_command(args).await?;
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

#[instrument]
async fn extract_command(args: ExtractArgs) -> anyhow::Result<()> {
    let source = TableFormat::from_path(&args.input)?.source()?;
    let sink = TableFormat::from_path(&args.output)?.sink();
    check_output_path(&args.output)?;

    let bytes = tokio::fs::read(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let mut builder = CrawlerConfig::builder()
        .timeout_secs(args.timeout)
        .progress_interval(args.progress_every);
    if let Some(user_agent) = args.user_agent {
        builder = builder.user_agent(user_agent);
    }
    let config = builder.build();

    let fetcher = HttpFetcher::new(&config)?;
    let session = Session::new(fetcher, config);
    let mut reporter = ConsoleReporter::new(args.output.clone())?;

    let rows = session
        .handle_table(source.as_ref(), sink.as_ref(), &bytes, &mut reporter)
        .await?;

    println!("Wrote {} rows to {}", rows, args.output.display());
    Ok(())
}

/// Fail before fetching anything if the result could not be written
fn check_output_path(output: &Path) -> anyhow::Result<()> {
    let parent = output
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    if !parent.is_dir() {
        bail!("Output directory {} does not exist", parent.display());
    }

    match std::fs::metadata(output) {
        Ok(meta) if meta.is_dir() => bail!("Output {} is a directory", output.display()),
        Ok(meta) if meta.permissions().readonly() => {
            bail!("Output {} is read-only", output.display())
        }
        _ => Ok(()),
    }
}

/// Prints replies to stdout, shows status on a spinner and writes the
/// result document to the requested output path
struct ConsoleReporter {
    progress: ProgressBar,
    output: PathBuf,
}

impl ConsoleReporter {
    fn new(output: PathBuf) -> anyhow::Result<Self> {
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
        );
        progress.enable_steady_tick(Duration::from_millis(120));

        Ok(Self { progress, output })
    }
}

impl Reporter for ConsoleReporter {
    fn reply(&mut self, text: &str) {
        self.progress.suspend(|| println!("{}", text));
    }

    fn status(&mut self, text: &str) {
        self.progress.set_message(text.to_string());
    }

    fn send_document(
        &mut self,
        file_name: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> linkmeta::prelude::Result<()> {
        self.progress.finish_and_clear();
        debug!(%file_name, path = %self.output.display(), "Writing result document");
        std::fs::write(&self.output, bytes)?;
        println!("{}", caption);
        Ok(())
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        if !self.progress.is_finished() {
            self.progress.finish_and_clear();
        }
    }
}
