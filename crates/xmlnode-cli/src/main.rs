use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

use xmlnode::{Node, Options};

#[derive(Debug, Parser)]
#[command(
    name = "xmlnode",
    version,
    about = "Convert XML to JSON and back using predictable mapping rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    limits: LimitArgs,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read XML and print the node tree as JSON
    Decode {
        /// Input file (defaults to stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
        /// Single-line JSON instead of pretty printed
        #[arg(long)]
        compact: bool,
    },
    /// Read JSON and print it as XML
    Encode {
        /// Input file (defaults to stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct LimitArgs {
    /// Maximum element nesting depth
    #[arg(long, global = true, value_name = "N")]
    max_depth: Option<usize>,
    /// Maximum attributes or child elements per tag
    #[arg(long, global = true, value_name = "N")]
    max_child_count: Option<usize>,
    /// Maximum bytes in one text run or attribute value
    #[arg(long, global = true, value_name = "BYTES")]
    max_string_length: Option<usize>,
    /// Tag name used for the document root when encoding
    #[arg(long, global = true, value_name = "NAME")]
    root_name: Option<String>,
    /// Tag name used for array entries without a key when encoding
    #[arg(long, global = true, value_name = "NAME")]
    item_name: Option<String>,
}

impl LimitArgs {
    fn to_options(&self) -> Result<Options> {
        let mut options = Options::default();
        if let Some(depth) = self.max_depth {
            options = options.with_max_nesting_depth(depth);
        }
        if let Some(count) = self.max_child_count {
            options = options.with_max_child_count(count);
        }
        if let Some(length) = self.max_string_length {
            options = options.with_max_string_length(length);
        }
        if let Some(name) = &self.root_name {
            options = options.with_root_name(name.as_str())?;
        }
        if let Some(name) = &self.item_name {
            options = options.with_item_name(name.as_str())?;
        }
        Ok(options)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = cli.limits.to_options()?;
    debug!(?options, "options resolved");

    match cli.command {
        Command::Decode {
            input,
            output,
            compact,
        } => {
            let data = read_input(input.as_ref())?;
            let node = xmlnode::from_slice(&data, &options).context("failed to decode xml")?;
            let mut json = if compact {
                serde_json::to_string(&node)?
            } else {
                serde_json::to_string_pretty(&node)?
            };
            json.push('\n');
            write_output(output.as_ref(), json.as_bytes())?;
        }
        Command::Encode { input, output } => {
            let data = read_input(input.as_ref())?;
            let node: Node = serde_json::from_slice(&data).context("failed to parse json input")?;
            let xml = xmlnode::to_vec(&node, &options).context("failed to encode xml")?;
            write_output(output.as_ref(), &xml)?;
        }
    }

    info!("done");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.iter().all(u8::is_ascii_whitespace) {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            stdout.flush().context("failed to flush stdout")?;
            Ok(())
        }
    }
}
