//! # tally
//!
//! Seller performance report from the command line.
//!
//! ## Usage
//! ```bash
//! # Table on stdout
//! tally report ./data/sales.json
//!
//! # JSON to a file, with a custom config
//! tally report ./data/sales.json --format json --output report.json --config ./tally.toml
//!
//! # Inspect or create the configuration
//! tally config show
//! tally config init --force
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, error};

use tally_cli::{
    build_report, init_tracing, load_config, render, CliError, CliResult, OutputFormat,
    TallyConfig,
};

/// Per-seller revenue, profit and bonus report
#[derive(Parser)]
#[command(name = "tally", version)]
#[command(
    about = "Build per-seller revenue, profit and bonus reports from sales logs",
    long_about = None
)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the seller report for a sales document
    Report {
        /// JSON document with sellers, products and purchase_records
        data: PathBuf,

        /// Output format (overrides config)
        #[arg(short, long)]
        format: Option<OutputFormatArg>,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Table,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Table => OutputFormat::Table,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // The global subscriber needs the configured log level, so loading logs
    // through a scoped one first.
    let config = match load_config(cli.config.clone(), cli.verbose) {
        Ok(config) => config,
        // `config init --force` must be able to replace a broken file.
        Err(_) if is_config_init(&cli.command) => TallyConfig::default(),
        Err(e) => {
            init_tracing(cli.verbose, "info");
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(cli.verbose, &config.logging.level);
    debug!(?config, "Configuration loaded");

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn is_config_init(command: &Commands) -> bool {
    matches!(
        command,
        Commands::Config {
            command: ConfigCommands::Init { .. }
        }
    )
}

fn run(cli: Cli, config: TallyConfig) -> CliResult<()> {
    match cli.command {
        Commands::Report {
            data,
            format,
            output,
        } => {
            let rows = build_report(&data, &config)?;
            let format = format
                .map(OutputFormat::from)
                .unwrap_or(config.output.format);

            match output {
                Some(path) => {
                    let file = File::create(&path).map_err(|e| CliError::io(&path, e))?;
                    let mut writer = BufWriter::new(file);
                    render::render(&rows, format, &mut writer)?;
                    writer.flush().map_err(|e| CliError::io(&path, e))?;
                }
                None => {
                    let stdout = io::stdout();
                    render::render(&rows, format, &mut stdout.lock())?;
                }
            }
            Ok(())
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                print!("{}", config.to_toml()?);
                Ok(())
            }
            ConfigCommands::Init { force } => {
                let path = cli
                    .config
                    .or_else(TallyConfig::default_config_path)
                    .ok_or(CliError::NoConfigPath)?;
                if path.exists() && !force {
                    return Err(CliError::ConfigExists(path));
                }
                let path = TallyConfig::default().save(Some(path))?;
                println!("Wrote {}", path.display());
                Ok(())
            }
        },
    }
}
