//! vjson CLI.
//!
//! Loads JSON documents into bounded arenas and exercises the variant model:
//! comparison, path lookup with defaults, and arena usage.
//!
//! Exit codes: 0 on success, 1 when `get` finds nothing and has no default,
//! 2 on any error.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use variant_json::interop::{parse_into, to_json};
use variant_json::{lookup, Arena, ArenaLimits, ErrorCode, VariantRead, VariantResult};

#[derive(Parser)]
#[command(name = "vjson")]
#[command(about = "Compare and query JSON through arena-backed variants", long_about = None)]
#[command(version)]
struct Cli {
    /// Arena limit preset
    #[arg(long, value_enum, default_value_t = Preset::Lenient, global = true)]
    preset: Preset,

    /// Override the preset's slot limit
    #[arg(long, global = true)]
    max_slots: Option<u64>,

    /// Override the preset's string byte limit
    #[arg(long, global = true)]
    max_string_bytes: Option<u64>,

    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Embedded,
    Lenient,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two JSON values: prints less, equal, greater or incomparable
    Compare {
        /// Left value as JSON text
        #[arg(allow_hyphen_values = true)]
        left: String,
        /// Right value as JSON text
        #[arg(allow_hyphen_values = true)]
        right: String,
    },

    /// Print the value at PATH (e.g. `users[0].name`) in FILE
    Get {
        file: PathBuf,
        path: String,
        /// JSON value printed when the path is missing or null
        #[arg(long)]
        default: Option<String>,
    },

    /// Print arena usage after loading FILE
    Stats { file: PathBuf },
}

impl Cli {
    fn limits(&self) -> ArenaLimits {
        let mut limits = match self.preset {
            Preset::Embedded => ArenaLimits::embedded(),
            Preset::Lenient => ArenaLimits::lenient(),
        };
        if let Some(max_slots) = self.max_slots {
            limits.max_slots = max_slots;
        }
        if let Some(max_string_bytes) = self.max_string_bytes {
            limits.max_string_bytes = max_string_bytes;
        }
        limits
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn read_file(path: &Path) -> VariantResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| ErrorCode::E200_IoError(format!("{}: {e}", path.display())))
}

fn load(arena: &Arena, text: &str) -> VariantResult<()> {
    parse_into(&arena.root(), text)?;
    tracing::debug!(
        slots = arena.slot_count(),
        string_bytes = arena.string_bytes(),
        "document loaded"
    );
    Ok(())
}

fn run(cli: &Cli) -> VariantResult<ExitCode> {
    let limits = cli.limits();
    match &cli.command {
        Commands::Compare { left, right } => {
            let left_arena = Arena::new(limits);
            let right_arena = Arena::new(limits);
            load(&left_arena, left)?;
            load(&right_arena, right)?;
            let result = left_arena
                .root_readonly()
                .compare(&right_arena.root_readonly());
            println!("{result}");
        }
        Commands::Get {
            file,
            path,
            default,
        } => {
            let arena = Arena::new(limits);
            load(&arena, &read_file(file)?)?;
            let found = lookup(&arena.root_readonly(), path);

            let defaults = Arena::new(limits);
            let value = match default {
                Some(text) => {
                    load(&defaults, text)?;
                    found | defaults.root_readonly()
                }
                None if !found.is_bound() => {
                    eprintln!("not found: {path}");
                    return Ok(ExitCode::from(1));
                }
                None => found,
            };
            println!("{}", to_json(&value)?);
        }
        Commands::Stats { file } => {
            let arena = Arena::new(limits);
            load(&arena, &read_file(file)?)?;
            let stats = serde_json::to_string_pretty(&arena.stats())
                .map_err(|e| ErrorCode::E100_InvalidJSON(e.to_string()))?;
            println!("{stats}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}
