use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use crate::drive::{DriveClient, DriveConfig, DEFAULT_BASE_URL};
use crate::error::FetchError;
use crate::fetch::{FetchOptions, Fetcher};
use crate::logging;
use crate::registry::{io::read_registry, SampleRegistry};

/// The samplefetch CLI application.
#[derive(Parser)]
#[command(name = "samplefetch")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Download a registered sample, a Drive file ID, or a URL.
    Fetch(FetchArgs),
    /// List registered sample files and collections.
    List(ListArgs),
}

/// Arguments for the fetch subcommand.
#[derive(clap::Args)]
struct FetchArgs {
    /// Sample or collection name, Drive file ID, or URL.
    identifier: String,

    /// Target file path, or for collections an existing parent directory.
    destination: PathBuf,

    /// Replace existing files instead of aborting.
    #[arg(long)]
    overwrite: bool,

    #[command(flatten)]
    registry: RegistryArgs,

    /// Request timeout in seconds.
    #[arg(
        long,
        env = "SAMPLEFETCH_TIMEOUT",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,

    /// Base URL of the Drive frontend.
    #[arg(long, env = "SAMPLEFETCH_DRIVE_URL", default_value = DEFAULT_BASE_URL, hide = true)]
    drive_url: String,
}

/// Arguments for the list subcommand.
#[derive(clap::Args)]
struct ListArgs {
    #[command(flatten)]
    registry: RegistryArgs,

    /// Output format for the listing.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(clap::Args)]
struct RegistryArgs {
    /// Extra registry file (.json, .yaml or .yml) layered over the built-in samples.
    #[arg(long = "registry", env = "SAMPLEFETCH_REGISTRY")]
    path: Option<PathBuf>,
}

impl RegistryArgs {
    fn load(&self) -> Result<SampleRegistry, FetchError> {
        let mut registry = SampleRegistry::builtin().clone();
        if let Some(path) = &self.path {
            registry.merge(read_registry(path)?);
        }
        Ok(registry)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Run the samplefetch CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), FetchError> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Fetch(args)) => run_fetch(args),
        Some(Commands::List(args)) => run_list(args),
        None => {
            println!("samplefetch {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Fetch sample datasets from Google Drive.");
            println!();
            println!("Run 'samplefetch --help' for usage information.");
            Ok(())
        }
    }
}

fn run_fetch(args: FetchArgs) -> Result<(), FetchError> {
    let registry = args.registry.load()?;
    let client = DriveClient::new(DriveConfig {
        base_url: args.drive_url.clone(),
        timeout: Duration::from_secs(args.timeout),
        ..DriveConfig::default()
    })?;

    let fetcher = Fetcher::new(&registry, client);
    fetcher.fetch(
        &args.identifier,
        &args.destination,
        &FetchOptions::overwrite(args.overwrite),
    )?;

    let written = if fetcher.registry().collection(&args.identifier).is_some() {
        args.destination.join(&args.identifier)
    } else {
        args.destination.clone()
    };
    println!("Fetched '{}' to {}", args.identifier, written.display());
    Ok(())
}

fn run_list(args: ListArgs) -> Result<(), FetchError> {
    let registry = args.registry.load()?;
    let names = crate::fetch::list_registered(&registry);

    match args.output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&names)
                .map_err(|source| FetchError::JsonWrite { source })?;
            println!("{json}");
        }
        OutputFormat::Text => {
            println!("Files:");
            for name in &names.files {
                println!("  {name}");
            }
            println!("Collections:");
            for name in &names.collections {
                let count = registry.collection(name).map(<[_]>::len).unwrap_or(0);
                println!("  {name} ({count} file{})", if count == 1 { "" } else { "s" });
            }
        }
    }
    Ok(())
}
