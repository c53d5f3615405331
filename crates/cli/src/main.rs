mod commands;
mod input;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Format of definition files given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum InputFormat {
    Json,
    Yaml,
}

/// Which predicate block of a definition to operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Block {
    Rules,
    Conditions,
}

/// Metadata Test definition toolkit.
#[derive(Parser)]
#[command(
    name = "metatest",
    version,
    about = "Metadata Test definition toolkit"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Input format; inferred from the file extension when omitted
    #[arg(long, global = true, value_enum)]
    input: Option<InputFormat>,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a definition has selection criteria and rules
    Validate {
        /// Path to the definition file, or - for stdin
        file: PathBuf,
        /// Also validate against the canonical JSON Schema
        #[arg(long)]
        deep: bool,
    },

    /// Rewrite a definition in canonical form, translating legacy fields
    Normalize {
        /// Path to the definition file, or - for stdin
        file: PathBuf,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
        /// Fail instead of falling back to the default definition
        #[arg(long)]
        strict: bool,
    },

    /// Show a predicate block in the builder's logical form
    Logical {
        /// Path to the definition file, or - for stdin
        file: PathBuf,
        /// Block to convert
        #[arg(long, default_value = "rules", value_enum)]
        block: Block,
    },

    /// Convert a builder-form predicate into the stored form
    Compose {
        /// Path to the builder-form predicate, or - for stdin
        file: PathBuf,
    },

    /// Convert YAML to JSON, or JSON to YAML with --reverse
    Yaml {
        /// Path to the document, or - for stdin
        file: PathBuf,
        /// Convert JSON to YAML instead
        #[arg(long)]
        reverse: bool,
    },

    /// List the properties supported by every given entity type
    Properties {
        /// Comma-separated entity graph names, e.g. dataset,chart
        #[arg(long, value_delimiter = ',', required = true)]
        types: Vec<String>,
        /// Path to a catalog TOML file (defaults to the built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let output = cli.output;
    let quiet = cli.quiet;
    let input = cli.input;

    match cli.command {
        Commands::Validate { file, deep } => {
            commands::validate::cmd_validate(&file, input, deep, output, quiet);
        }
        Commands::Normalize {
            file,
            pretty,
            strict,
        } => {
            commands::normalize::cmd_normalize(&file, input, pretty, strict, output, quiet);
        }
        Commands::Logical { file, block } => {
            commands::logical::cmd_logical(&file, input, block, output, quiet);
        }
        Commands::Compose { file } => {
            commands::logical::cmd_compose(&file, input, output, quiet);
        }
        Commands::Yaml { file, reverse } => {
            commands::yaml::cmd_yaml(&file, reverse, output, quiet);
        }
        Commands::Properties { types, catalog } => {
            commands::properties::cmd_properties(&types, catalog.as_deref(), output, quiet);
        }
    }
}

/// Log to stderr. RUST_LOG takes precedence over `--log-level`.
fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
