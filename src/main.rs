use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use shopify_import::io::csv_read::InputEncoding;
use shopify_import::sync::{self, InputFormat, OutputFormat, TransformOptions};
use shopify_import::{ImportError, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose)?;
    match cli.command {
        Command::Products(args) => execute_products(args),
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ImportError::Logging(err.to_string()))
}

fn execute_products(args: ProductsArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(ImportError::MissingInput(args.input));
    }

    let input_format = match args.from {
        Some(kind) => InputFormat::from(kind),
        None => detect(&args.input, InputFormat::detect)?,
    };
    let output_format = match args.to {
        Some(kind) => OutputFormat::from(kind),
        None => detect(&args.output, OutputFormat::detect)?,
    };

    let options = TransformOptions {
        encoding: args.encoding.into(),
        sheet: args.sheet,
    };

    let product_count = sync::transform(
        &args.input,
        input_format,
        &args.output,
        output_format,
        &options,
    )?;
    info!(product_count, "products written");
    Ok(())
}

fn detect<F>(path: &Path, guess: impl Fn(&Path) -> Option<F>) -> Result<F> {
    guess(path).ok_or_else(|| ImportError::UnknownFormat(path.to_path_buf()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Group Shopify product exports into one record per product."
)]
struct Cli {
    /// Log every skipped row. `RUST_LOG` takes precedence when set.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate a product export into product records.
    Products(ProductsArgs),
}

#[derive(clap::Args)]
struct ProductsArgs {
    /// Shopify product export.
    #[arg(long)]
    input: PathBuf,

    /// Output file path.
    #[arg(long)]
    output: PathBuf,

    /// Input format. Inferred from the input extension when omitted.
    #[arg(long, value_enum)]
    from: Option<InputKind>,

    /// Output format. Inferred from the output extension when omitted.
    #[arg(long, value_enum)]
    to: Option<OutputKind>,

    /// Text encoding of CSV input.
    #[arg(long, value_enum, default_value_t = EncodingKind::Utf8)]
    encoding: EncodingKind,

    /// Worksheet to read when the input is a workbook.
    #[arg(long)]
    sheet: Option<String>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum InputKind {
    Csv,
    Excel,
}

impl From<InputKind> for InputFormat {
    fn from(kind: InputKind) -> Self {
        match kind {
            InputKind::Csv => InputFormat::Csv,
            InputKind::Excel => InputFormat::Excel,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputKind {
    Csv,
    Excel,
    Json,
}

impl From<OutputKind> for OutputFormat {
    fn from(kind: OutputKind) -> Self {
        match kind {
            OutputKind::Csv => OutputFormat::Csv,
            OutputKind::Excel => OutputFormat::Excel,
            OutputKind::Json => OutputFormat::Json,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum EncodingKind {
    Utf8,
    Latin1,
}

impl std::fmt::Display for EncodingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodingKind::Utf8 => write!(f, "utf8"),
            EncodingKind::Latin1 => write!(f, "latin1"),
        }
    }
}

impl From<EncodingKind> for InputEncoding {
    fn from(kind: EncodingKind) -> Self {
        match kind {
            EncodingKind::Utf8 => InputEncoding::Utf8,
            EncodingKind::Latin1 => InputEncoding::Latin1,
        }
    }
}
