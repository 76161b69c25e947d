use clap::{Parser, Subcommand};
use deckbot_core::AppConfig;
use deckbot_janitor::{Janitor, JanitorConfig};
use deckbot_slides::{PollPolicy, SlidesClient};
use deckbot_telegram::TelegramChannel;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser, Debug)]
#[command(author, version, about = "DeckBot - presentations from a prompt, delivered over Telegram", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the Telegram bot together with the retention sweeper
    Start,
    /// Run a single retention sweep over the download directory
    Sweep {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate one presentation from the command line
    Generate {
        #[arg(index = 1)]
        prompt: String,
        /// Override the configured output format
        #[arg(long)]
        format: Option<String>,
    },
    /// Show the resolved configuration
    Check,
}

fn init_logging(args: &Args) -> Option<WorkerGuard> {
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };

    let file = args.log_file.as_ref().and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| eprintln!("⚠️ Cannot open log file {}: {}", path.display(), e))
            .ok()
    });

    match file {
        Some(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(non_blocking)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let _guard = init_logging(&args);

    deckbot_core::init();

    let config = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ Error: Configuration missing or invalid: {}", e);
            eprintln!("   Please ensure .env exists and contains a valid API_KEY.");
            eprintln!("   Run 'deckbot check' once it loads to see the resolved settings.");
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Some(Commands::Start) | None => run_bot(config).await,
        Some(Commands::Sweep { json }) => run_sweep(config, json).await,
        Some(Commands::Generate { prompt, format }) => run_generate(config, &prompt, format).await,
        Some(Commands::Check) => {
            run_check(&config);
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run_bot(config: AppConfig) -> anyhow::Result<()> {
    let storage = config.storage_dir();
    tokio::fs::create_dir_all(&storage).await?;

    let telegram = TelegramChannel::new(&config)?;
    let janitor = Janitor::new(JanitorConfig::from_app(&config)).spawn();

    tokio::select! {
        res = telegram.start() => {
            if let Err(e) = res {
                error!("Telegram channel stopped: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("🛑 Ctrl-C received, shutting down");
        }
    }

    janitor.stop().await;
    Ok(())
}

async fn run_sweep(config: AppConfig, json: bool) -> anyhow::Result<()> {
    let janitor = Janitor::new(JanitorConfig::from_app(&config));
    let report = janitor.run_pass().await?;

    if json {
        let out = serde_json::json!({
            "storage_dir": janitor.config().storage_dir,
            "retention_secs": janitor.config().retention.as_secs(),
            "scanned": report.scanned,
            "removed": report.removed,
            "failed": report.failed.iter().map(|(p, e)| serde_json::json!({ "path": p, "error": e })).collect::<Vec<_>>(),
            "retained": report.retained,
            "skipped": report.skipped,
            "duration_ms": report.duration_ms,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("🧹 Swept {}", janitor.config().storage_dir.display());
    for path in &report.removed {
        println!("  - removed {}", path.display());
    }
    for (path, err) in &report.failed {
        println!("  ! failed  {} ({})", path.display(), err);
    }
    println!(
        "✅ {} removed, {} failed, {} retained, {} skipped",
        report.removed.len(),
        report.failed.len(),
        report.retained,
        report.skipped
    );
    Ok(())
}

async fn run_generate(config: AppConfig, prompt: &str, format: Option<String>) -> anyhow::Result<()> {
    let prompt = prompt.trim();
    anyhow::ensure!(!prompt.is_empty(), "prompt must not be empty");

    let format = format.unwrap_or_else(|| config.format.clone());
    let client = SlidesClient::from_config(&config);

    println!("🎞️ Generating a {} presentation on: {}", format, prompt);
    let job = client.generate(prompt, &format).await?;
    let path = client
        .fetch_artifact(&job, &format, &config.storage_dir(), &PollPolicy::from_config(&config))
        .await?;

    println!("✅ Saved to {}", path.display());
    Ok(())
}

fn run_check(config: &AppConfig) {
    let storage = config.storage_dir();
    println!("🩺 DeckBot configuration\n");
    println!("  {:20} {}", "api_url", config.api_url);
    println!("  {:20} {}", "api_key", config.masked_api_key());
    println!(
        "  {:20} {}",
        "telegram_bot_token",
        config
            .telegram_bot_token
            .as_deref()
            .map(deckbot_core::config::mask_secret)
            .unwrap_or_else(|| "(not set)".to_string())
    );
    println!(
        "  {:20} {}",
        "admin_chat_id",
        config.admin_chat_id.map(|id| id.to_string()).unwrap_or_else(|| "(not set)".to_string())
    );
    println!("  {:20} {}", "format", config.format);
    println!("  {:20} {} min", "cleanup_minutes", config.cleanup_minutes);
    println!(
        "  {:20} {} x {}s",
        "download polling", config.download_attempts, config.poll_interval_secs
    );

    match std::fs::read_dir(&storage) {
        Ok(entries) => println!("  {:20} {} ({} entries)", "storage_dir", storage.display(), entries.count()),
        Err(_) => println!("  {:20} {} (missing, created on start)", "storage_dir", storage.display()),
    }
}
