//! Binary entrypoint for the petdash CLI.
//!
//! Commands:
//! - `start [--port <n>]` - run the HTTP server
//! - `init` - create a starter `config.toml` and the data directory
//! - `status` - advance the pet to now and print it as JSON (without the sprite)
//! - `reset [--name <name>]` - replace the pet with a fresh one
//! - `sprite <state> --out <file>` - write the raw sprite for a visual state
//!
//! See the library crate docs for module-level details: `petdash::`.
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::info;

use petdash::config::Config;
use petdash::pet::{sprite, VisualState};
use petdash::service::{random_source, GameResponse, PetService, ServiceSettings};
use petdash::storage::JsonFileStore;

#[derive(Parser)]
#[command(name = "petdash")]
#[command(about = "Virtual pet simulation and sprite server for desk displays")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Start {
        /// Listen port, overriding `server.port`
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Write a default configuration file and create the data directory
    Init,
    /// Advance the pet to the current time and print it
    Status,
    /// Replace the pet with a newly hatched one
    Reset {
        /// Name for the new pet (defaults to `pet.default_name`)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Write the raw RGB565 sprite for a visual state
    Sprite {
        /// One of: sick, dirty, hungry, sad, happy, normal
        state: String,
        /// Output file
        #[arg(short, long)]
        out: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start { port } => {
            let mut config = Config::load(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            if let Some(port) = port {
                config.server.port = port;
                config.validate()?;
            }
            info!("Starting petdash v{}", env!("CARGO_PKG_VERSION"));
            petdash::server::serve(&config).await?;
        }
        Commands::Init => {
            init_logging(&None, cli.verbose);
            info!("Initializing new petdash configuration");
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
            let config = Config::default();
            tokio::fs::create_dir_all(&config.storage.data_dir)
                .await
                .with_context(|| format!("creating data dir {}", config.storage.data_dir))?;
            info!("Data directory ready at {}", config.storage.data_dir);
        }
        Commands::Status => {
            let config = Config::load(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            let resp = open_service(&config)?.status(Utc::now()).await?;
            print_response(&resp)?;
        }
        Commands::Reset { name } => {
            let config = Config::load(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            let resp = open_service(&config)?
                .reset(name.as_deref(), Utc::now())
                .await?;
            print_response(&resp)?;
        }
        Commands::Sprite { state, out } => {
            init_logging(&None, cli.verbose);
            let state = VisualState::from_str(&state).map_err(|_| {
                anyhow!(
                    "unknown state '{}' (expected one of: sick, dirty, hungry, sad, happy, normal)",
                    state
                )
            })?;
            tokio::fs::write(&out, sprite::render(state))
                .await
                .with_context(|| format!("writing sprite to {}", out))?;
            info!("Wrote {} sprite ({} bytes) to {}", state, sprite::SPRITE_BYTES, out);
        }
    }

    Ok(())
}

fn open_service(config: &Config) -> Result<PetService<JsonFileStore>> {
    let store = JsonFileStore::open(&config.storage.data_dir)
        .with_context(|| format!("opening data dir {}", config.storage.data_dir))?;
    Ok(PetService::new(
        store,
        random_source(config.simulation.seed),
        ServiceSettings::from_config(config),
    ))
}

/// Print the response as JSON without the base64 sprite.
fn print_response(resp: &GameResponse) -> Result<()> {
    let mut value = serde_json::to_value(resp)?;
    if let Some(obj) = value.as_object_mut() {
        obj.remove("image");
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let configured = config
        .as_ref()
        .and_then(|cfg| log::LevelFilter::from_str(&cfg.logging.level).ok())
        .unwrap_or(log::LevelFilter::Info);
    let base_level = match verbosity {
        0 => configured,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Echo to the console only in the foreground
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
