//! Binary entrypoint for the coinbot CLI.
//!
//! Commands:
//! - `init` - write a starter `config.toml`
//! - `status` - print player count, data file and language game availability
//! - `play <game> --user <id>` - play one game and print the reply
//! - `balance --user <id>` - print balance and daily streak
//! - `console --user <id>` - interactive session on stdin/stdout
//!
//! See the library crate docs for module-level details: `coinbot::`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

use coinbot::bot::{commands, ConsoleSession};
use coinbot::config::Config;
use coinbot::games::{GameEngine, GameKind};
use coinbot::storage::{PlayerStore, UserId};

#[derive(Parser)]
#[command(name = "coinbot")]
#[command(about = "A chat bot coin economy with mini-games")]
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

    /// Player data file, overriding config and DATA_PATH
    #[arg(long, global = true)]
    data_path: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Show player count and configuration summary
    Status,
    /// Play one game as the given user
    Play {
        /// Game name (work, dice, slots, daily, fish, mine, wordchain, vietking)
        game: GameKind,
        #[arg(short, long)]
        user: UserId,
    },
    /// Show a user's balance and streak
    Balance {
        #[arg(short, long)]
        user: UserId,
    },
    /// Read commands from stdin as the given user
    Console {
        #[arg(short, long)]
        user: UserId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        init_logging(&None, cli.verbose);
        Config::create_default(&cli.config).await?;
        info!("Configuration file created at {}", cli.config);
        return Ok(());
    }

    let config_missing = !std::path::Path::new(&cli.config).exists();
    let mut config = Config::load_or_default(&cli.config).await?;
    if let Some(path) = cli.data_path.clone() {
        config.storage.data_path = path;
    }
    init_logging(&Some(config.clone()), cli.verbose);
    if config_missing {
        warn!("Config file {} not found, using defaults", cli.config);
    }

    let engine = build_engine(&config).await?;
    let prefix = config.bot.prefix().to_string();

    match cli.command {
        Commands::Init => {}
        Commands::Status => {
            println!("{} v{}", config.bot.name, env!("CARGO_PKG_VERSION"));
            println!("Data file: {}", config.storage.data_path);
            println!("Players: {}", engine.store().count().await);
            println!(
                "Language games: {}",
                if engine.has_oracle() {
                    format!("enabled ({})", config.oracle.model)
                } else {
                    "disabled".to_string()
                }
            );
        }
        Commands::Play { game, user } => {
            let result = engine.play(user, game).await;
            println!("{}", commands::render_result(&result));
        }
        Commands::Balance { user } => {
            let record = engine.ensure_ready(user).await;
            println!("{}", commands::balance_text(&record));
        }
        Commands::Console { user } => {
            info!("Starting console session for user {}", user);
            let session = ConsoleSession::new(engine.clone(), &prefix, user);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            session.run(stdin, tokio::io::stdout()).await?;
        }
    }

    engine.shutdown().await;
    Ok(())
}

/// Load the player store (fatal on corruption) and wire the optional oracle.
async fn build_engine(config: &Config) -> Result<Arc<GameEngine>> {
    let store = Arc::new(PlayerStore::new(&config.storage.data_path));
    store
        .load()
        .await
        .map_err(|e| anyhow!("Refusing to start with unreadable player data: {}", e))?;
    info!(
        "Starting {} v{} with {} player(s)",
        config.bot.name,
        env!("CARGO_PKG_VERSION"),
        store.count().await
    );

    let mut engine = GameEngine::new(store)
        .with_oracle_timeout(Duration::from_secs(config.oracle.timeout_seconds.max(1)));

    if config.oracle.is_configured() {
        #[cfg(feature = "llm")]
        {
            let client = coinbot::games::oracle::ChatCompletionsClient::new(&config.oracle);
            info!("Language games enabled via {}", client.endpoint());
            engine = engine.with_oracle(Arc::new(client));
        }
        #[cfg(not(feature = "llm"))]
        warn!("Oracle is configured but this build lacks the 'llm' feature; language games disabled");
    } else {
        warn!("AI_GATEWAY_API_KEY not set; language games disabled");
    }

    Ok(Arc::new(engine))
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let configured = config
        .as_ref()
        .and_then(|c| c.logging.level.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info);
    let base_level = match verbosity {
        0 => configured,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|c| c.logging.file.as_ref())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Redirected output only goes to the file
        let is_tty = atty::is(atty::Stream::Stderr);

        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
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
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
