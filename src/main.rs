//! xsdgraph CLI - parse, resolve and inspect XML Schema documents

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use xsdgraph::config::{load_config, XsdGraphConfig};

#[derive(Parser)]
#[command(name = "xsdgraph")]
#[command(version)]
#[command(about = "XML Schema object model - parse, resolve and inspect XSD documents")]
#[command(long_about = r#"
xsdgraph parses an XSD document and everything it includes, imports or
redefines into one schema graph, then links every ref/type/base name to
its definition.

Example usage:
  xsdgraph check orders.xsd
  xsdgraph stats orders.xsd --format json
  xsdgraph deps orders.xsd
  xsdgraph tree orders.xsd --lenient
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: OutputMode,

    /// Skip unknown elements instead of failing
    #[arg(long, global = true)]
    lenient: bool,

    /// Config file (defaults to ./xsdgraph.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and resolve a schema, reporting every error
    Check {
        /// Root schema document
        file: PathBuf,
    },

    /// Show statistics about the schema graph
    Stats {
        /// Root schema document
        file: PathBuf,
    },

    /// List schema documents and symbolic references
    Deps {
        /// Root schema document
        file: PathBuf,

        /// Only list references that did not resolve
        #[arg(long)]
        unresolved: bool,
    },

    /// Print the element tree
    Tree {
        /// Root schema document
        file: PathBuf,

        /// Maximum depth to print
        #[arg(short, long)]
        depth: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Text
    }
}

/// Print a JSON envelope for `command`
pub fn emit_success(command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    let envelope = serde_json::json!({
        "command": command,
        "version": env!("CARGO_PKG_VERSION"),
        "data": data,
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

/// Resolved settings: config file values with command-line flags on top
pub struct Settings {
    pub options: xsdgraph::ParseOptions,
    pub follow_imports: bool,
}

impl Settings {
    fn new(config: Option<XsdGraphConfig>, lenient: bool) -> Self {
        let config = config.unwrap_or_default();
        let mut options = config.parse_options();
        if lenient {
            options.strict = false;
        }
        Self {
            options,
            follow_imports: config.follow_imports(),
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let settings = Settings::new(load_config(cli.config.as_deref())?, cli.lenient);
    let mode = cli.format;

    let clean = match cli.command {
        Commands::Check { file } => commands::run_check(&file, &settings, mode)?,
        Commands::Stats { file } => commands::run_stats(&file, &settings, mode)?,
        Commands::Deps { file, unresolved } => commands::run_deps(&file, &settings, mode, unresolved)?,
        Commands::Tree { file, depth } => commands::run_tree(&file, &settings, mode, depth)?,
    };

    Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
