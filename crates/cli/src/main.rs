use std::sync::Arc;

use {
    anyhow::Context,
    clap::Parser,
    tracing::info,
    tracing_subscriber::{
        EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
    },
};

use {
    logctl_control::{
        Error as ControlError, Level, LevelRegistry, LogControlService, LoggerInstaller,
        Result as ControlResult, SharedLogConfig, store_sqlite::SqliteStore,
    },
    logctl_gateway::{AppState, server},
};

#[derive(Parser)]
#[command(name = "logctl", about = "logctl — runtime logging control service")]
struct Cli {
    /// Address to bind to.
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8016)]
    port: u16,

    /// SQLite database path for persisted per-service overrides.
    #[arg(long, env = "LOGCTL_DB", default_value = "logctl.db")]
    db: std::path::PathBuf,

    /// Initial global log level (debug, info, warn, error, panic).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log SQL statements at startup.
    #[arg(long, default_value_t = false)]
    sql_logs: bool,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

/// Filter derived from the global level plus the SQL flag. sqlx emits
/// statements at DEBUG under `sqlx::query`; the flag toggles that
/// target between visible and suppressed.
fn derive_filter(global: Level, sql_enabled: bool) -> EnvFilter {
    let sql = if sql_enabled { "debug" } else { "warn" };
    EnvFilter::new(format!("{},sqlx::query={sql}", global.tracing_directive()))
}

/// Swaps the process-wide filter when a patch changes the global level
/// or the SQL flag.
struct ReloadInstaller {
    handle: reload::Handle<EnvFilter, Registry>,
}

impl LoggerInstaller for ReloadInstaller {
    fn install(&self, global: Level, sql_enabled: bool) -> ControlResult<()> {
        self.handle
            .reload(derive_filter(global, sql_enabled))
            .map_err(|e| ControlError::config_unavailable(e.to_string()))
    }
}

/// Initialise tracing behind a reloadable filter and return the handle
/// used to swap it at runtime.
fn init_telemetry(cli: &Cli, global: Level) -> reload::Handle<EnvFilter, Registry> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| derive_filter(global, cli.sql_logs));
    let (filter, handle) = reload::Layer::new(filter);
    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
    handle
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let global: Level = cli
        .log_level
        .parse()
        .with_context(|| format!("invalid --log-level {:?}", cli.log_level))?;

    let handle = init_telemetry(&cli, global);

    let db_url = format!("sqlite:{}?mode=rwc", cli.db.display());
    let store = SqliteStore::new(&db_url)
        .await
        .with_context(|| format!("opening override store at {}", cli.db.display()))?;

    let service = Arc::new(LogControlService::new(
        Arc::new(store),
        LevelRegistry::new(),
        Arc::new(SharedLogConfig::new(global, cli.sql_logs)),
        Arc::new(ReloadInstaller { handle }),
    ));

    let restored = service
        .warm_registry()
        .await
        .context("loading persisted overrides")?;
    if restored > 0 {
        info!(count = restored, "restored service log level overrides");
    }

    let addr = format!("{}:{}", cli.bind, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    server::serve(listener, AppState { service }).await?;
    Ok(())
}
