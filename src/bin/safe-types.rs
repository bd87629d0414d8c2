//! safe-types CLI - inspect JSON documents through the typed accessors
//!
//! Decodes a JSON object and runs one named accessor against it, printing the
//! typed result as JSON. Diagnostics go through `tracing` (see `RUST_LOG`).

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use safe_types::{decode_mapping, mapping_to_json, AccessorConfig, FieldKind, SafeAccessor, UntypedMapping};

#[derive(Parser)]
#[command(name = "safe-types")]
#[command(version, about = "Typed, logging accessors for untyped JSON mappings", long_about = None)]
struct Cli {
    /// Accessor config YAML (falls back to SAFE_TYPES_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one typed field from a JSON object
    Extract {
        /// Path to a JSON file containing an object
        #[arg(short, long)]
        input: PathBuf,

        /// Key to look up (case-sensitive)
        #[arg(short, long)]
        key: String,

        /// Accessor family: string, number, array, data, dictionary, uuid, date, event
        #[arg(long, default_value = "string")]
        kind: FieldKind,

        /// Treat a missing key as silent absence instead of an error
        #[arg(long)]
        optional: bool,
    },

    /// List each top-level key with the kind of value it decoded to
    Describe {
        /// Path to a JSON file containing an object
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract { input, key, kind, optional } => {
            load_accessor(cli.config).and_then(|accessor| extract(&accessor, &input, &key, kind, !optional))
        }
        Commands::Describe { input } => describe(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Config precedence: CLI flag > SAFE_TYPES_CONFIG > defaults
fn load_accessor(cli_config: Option<PathBuf>) -> Result<SafeAccessor, String> {
    let path = cli_config.or_else(|| std::env::var_os("SAFE_TYPES_CONFIG").map(PathBuf::from));

    let config = match path {
        Some(path) => AccessorConfig::load_from_file(&path).map_err(|e| e.to_string())?,
        None => {
            tracing::debug!("No accessor config given, using defaults");
            AccessorConfig::default()
        }
    };

    Ok(SafeAccessor::from_config(&config))
}

fn read_mapping(input: &Path) -> Result<UntypedMapping, String> {
    let contents = fs::read_to_string(input)
        .map_err(|e| format!("Failed to read {}: {}", input.display(), e))?;
    decode_mapping(&contents).map_err(|e| format!("Failed to decode {}: {}", input.display(), e))
}

fn extract(
    accessor: &SafeAccessor,
    input: &Path,
    key: &str,
    kind: FieldKind,
    required: bool,
) -> Result<(), String> {
    let mapping = read_mapping(input)?;

    match accessor.extract_kind(&mapping, key, kind, required) {
        Some(value) => {
            println!("{}", value);
            Ok(())
        }
        None => {
            println!("null");
            if required {
                Err(format!("No valid {} for required key '{}'", kind, key))
            } else {
                Ok(())
            }
        }
    }
}

fn describe(input: &Path) -> Result<(), String> {
    let mapping = read_mapping(input)?;

    let mut keys: Vec<&String> = mapping.keys().collect();
    keys.sort();

    for key in keys {
        if let Some(value) = mapping.get(key) {
            println!("{}\t{}", key, value.kind());
        }
    }

    tracing::debug!(document = %mapping_to_json(&mapping), "Described mapping");
    Ok(())
}
