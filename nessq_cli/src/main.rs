//! # nessq CLI
//!
//! Query Nessus reports from the command line.

use clap::{Parser, Subcommand};
use nessq_engine::api::{
    format_plugin_line, list_plugins, portscan_matches, print, run_query, write_template,
    ApiError, WriteError,
};
use nessq_engine::parser::{parse_path, IngestError};
use nessq_engine::results::{CustomTemplate, OutputError, OutputFormat, Renderer};
use nessq_engine::types::Collection;
use nessq_query::config::runtime::IngestPreferences;
use nessq_query::logging::{self, codes, Code, LogLevel};
use nessq_query::{log_error, log_info, ConfigError, NessqConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "nessq",
    version,
    about = "Query Nessus scan reports and render the matches as lists or tables"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Minimum log level (error, warning, info, debug)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a query, e.g. "pluginname=ssl and port=443 or sev>=hig"
    Query {
        /// Report file or directory of reports
        #[arg(short, long)]
        input: PathBuf,

        /// Query string
        #[arg(short, long)]
        query: String,

        /// auto, list, table or json
        #[arg(long, default_value = "auto")]
        format: OutputFormat,

        /// Custom output template (minijinja) used instead of --format
        #[arg(short, long, conflicts_with = "format")]
        template: Option<PathBuf>,
    },

    /// Show every scanned and identified port
    Portscan {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long, default_value = "auto")]
        format: OutputFormat,

        #[arg(short, long, conflicts_with = "format")]
        template: Option<PathBuf>,
    },

    /// Fill the query markers of a template and write the result
    Write {
        #[arg(short, long)]
        input: PathBuf,

        /// Template containing marker lines such as "%%%NESSQ:pluginid=97994".
        /// A first line "%%%NESSQ:list=<file>,table=<file>" selects custom output templates.
        #[arg(short, long)]
        template: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List every plugin found in the reports, most severe first
    List {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print version information
    Version,
}

fn load_config(cli: &Cli) -> Result<NessqConfig, ConfigError> {
    let mut config = NessqConfig::load(cli.config.as_deref())?;

    if let Some(level) = &cli.log_level {
        config.logging.min_log_level =
            LogLevel::parse(level).ok_or_else(|| ConfigError::Invalid {
                field: "--log-level".to_string(),
                reason: format!("unknown level '{}'", level),
            })?;
    }

    if cli.json_logs {
        config.logging.structured = true;
    }

    Ok(config)
}

fn load_collection(input: &Path, preferences: &IngestPreferences) -> Result<Collection, IngestError> {
    let collection = parse_path(input, preferences)?;
    log_info!("Reports loaded",
        "input" => input.display(),
        "hosts" => collection.hosts.len(),
        "plugins" => collection.all_plugins.len()
    );
    Ok(collection)
}

fn load_template(path: Option<&Path>) -> Result<Option<CustomTemplate>, OutputError> {
    path.map(CustomTemplate::single).transpose()
}

fn renderer(format: OutputFormat, template: Option<&CustomTemplate>) -> Renderer<'_> {
    template.map_or(Renderer::Builtin(format), Renderer::Custom)
}

fn run(command: Command, config: &NessqConfig) -> Result<(), ApiError> {
    match command {
        Command::Query {
            input,
            query,
            format,
            template,
        } => {
            let template = load_template(template.as_deref())?;
            let collection = load_collection(&input, &config.ingest)?;
            let mut matches = run_query(&query, &collection);
            print(&mut matches, renderer(format, template.as_ref()))?;
        }
        Command::Portscan {
            input,
            format,
            template,
        } => {
            let template = load_template(template.as_deref())?;
            let collection = load_collection(&input, &config.ingest)?;
            let mut matches = portscan_matches(&collection, &config.output);
            print(&mut matches, renderer(format, template.as_ref()))?;
        }
        Command::Write {
            input,
            template,
            output,
        } => {
            let collection = load_collection(&input, &config.ingest)?;
            let report = write_template(&template, &output, &collection, &config.output)?;

            if !report.unmatched_plugins.is_empty() {
                println!("Unmatched plugins:");
                for plugin in &report.unmatched_plugins {
                    println!("{}", format_plugin_line(plugin));
                }
            }
        }
        Command::List { input } => {
            let collection = load_collection(&input, &config.ingest)?;
            for plugin in list_plugins(&collection) {
                println!("{}", format_plugin_line(&plugin));
            }
        }
        Command::Version => {
            println!("nessq {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn error_code(error: &ApiError) -> Code {
    match error {
        ApiError::Config(_) => codes::system::CONFIGURATION_INVALID,
        ApiError::Ingest(IngestError::PathNotFound { .. }) => codes::ingest::PATH_NOT_FOUND,
        ApiError::Ingest(IngestError::InvalidXml { .. }) => codes::ingest::XML_PARSE_FAILURE,
        ApiError::Ingest(_) => codes::ingest::READ_FAILURE,
        ApiError::Output(
            OutputError::TemplateNotFound { .. }
            | OutputError::TemplateRead { .. }
            | OutputError::Template { .. },
        ) => codes::output::TEMPLATE_FAILURE,
        ApiError::Output(_) => codes::output::RENDER_FAILURE,
        ApiError::Write(
            WriteError::MissingListTemplate
            | WriteError::MissingTableTemplate
            | WriteError::CustomTemplate { .. },
        ) => codes::output::TEMPLATE_FAILURE,
        ApiError::Write(_) => codes::output::WRITE_FAILURE,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_global_logging(&config.logging) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error!(error_code(&e), &e.to_string());
            ExitCode::FAILURE
        }
    }
}
