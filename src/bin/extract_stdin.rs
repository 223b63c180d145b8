//! CLI that reads HTML from stdin and prints extracted text or links, one
//! entry per line.
//!
//! ```text
//! curl -s https://example.com | extract_stdin 'div.item > span'
//! curl -s https://example.com | extract_stdin --links --filter-assets --sort-unique
//! ```

use std::io::{self, BufWriter, Read, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use rs_html_extract::{extract_bytes, Error, ExtractMode, Options};

#[derive(Debug, Parser)]
#[command(name = "extract_stdin", version, about = "Extract text or links from HTML on stdin")]
struct Cli {
    /// CSS selector restricting text extraction (whole document if omitted).
    selector: Option<String>,

    /// Print the src/href of every element instead of text.
    #[arg(long, conflicts_with = "selector")]
    links: bool,

    /// Resolve relative links against this absolute URL.
    #[arg(long, value_name = "URL", requires = "links")]
    base_url: Option<String>,

    /// Drop image, stylesheet and font references.
    #[arg(long)]
    filter_assets: bool,

    /// Sort output bytewise and remove duplicates.
    #[arg(long)]
    sort_unique: bool,

    /// Drop empty and whitespace-only entries.
    #[arg(long)]
    skip_empty: bool,

    /// Print the full result as JSON.
    #[arg(long)]
    json: bool,

    /// Debug logging on stderr (overridden by HTML_EXTRACT_LOG).
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            mode: if self.links {
                ExtractMode::Links
            } else {
                ExtractMode::Text
            },
            selector: self.selector.clone(),
            base_url: self.base_url.clone(),
            filter_assets: self.filter_assets,
            sort_unique: self.sort_unique,
            skip_empty: self.skip_empty,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            if matches!(err.downcast_ref::<Error>(), Some(Error::InvalidSelector { .. })) {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    init_tracing(cli.verbose)?;

    let mut html = Vec::new();
    io::stdin()
        .read_to_end(&mut html)
        .context("failed to read HTML from stdin")?;

    let result = extract_bytes(&html, &cli.options())?;

    let mut out = BufWriter::new(io::stdout().lock());
    if cli.json {
        serde_json::to_writer(&mut out, &result).context("failed to serialize result")?;
        writeln!(out)?;
    } else {
        for line in &result.lines {
            writeln!(out, "{line}")?;
        }
    }
    out.flush().context("failed to write to stdout")?;
    Ok(())
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("HTML_EXTRACT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
