//! @ai:module:intent CLI entry point for todoscan annotation extraction
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on config, project, language, output

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use todoscan::{output, project, Language, OutputFormat, ProfileRegistry, ScanConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todoscan")]
#[command(author, version, about = "Extract TODO/FIXME annotations and TODOS regions from source comments")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract annotations from files and directories
    Extract {
        /// Files or directories to scan
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Treat every file as this language instead of detecting by extension
        #[arg(long, short)]
        language: Option<String>,

        /// Path to configuration file (defaults to ./todoscan.toml when present)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,

        /// Fail with exit code 1 if any warning or unreadable file is found
        #[arg(long, default_value = "false")]
        fail_on_warning: bool,
    },

    /// List built-in languages and their file extensions
    Languages,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "todoscan=warn",
        1 => "todoscan=info",
        _ => "todoscan=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Extract {
            paths,
            language,
            config,
            format,
            fail_on_warning,
        } => {
            let registry = ScanConfig::load_or_default(config.as_deref())
                .and_then(|config| ProfileRegistry::new(&config))
                .and_then(|registry| match &language {
                    Some(name) => registry.force_language(name),
                    None => Ok(registry),
                });

            match registry {
                Ok(registry) => {
                    let report = project::extract_paths(&paths, &registry);
                    println!("{}", output::format_project_report(&report, format.into()));

                    if fail_on_warning && report.has_warnings() {
                        ExitCode::from(1)
                    } else {
                        ExitCode::SUCCESS
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::from(2)
                }
            }
        }

        Commands::Languages => {
            for lang in Language::ALL {
                println!("{:<12} {}", lang.name().cyan(), lang.extensions().join(", "));
            }
            ExitCode::SUCCESS
        }
    }
}
