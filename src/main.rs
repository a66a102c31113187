use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use media_sessions_exporter::config::{self, AppConfig, FileConfig};
use media_sessions_exporter::jellyfin::JellyfinClient;
use media_sessions_exporter::plex::PlexClient;
use media_sessions_exporter::server::{metrics, run_server};
use media_sessions_exporter::upstream::http_client;
use media_sessions_exporter::{SessionPoller, SessionSnapshot, SessionSource, UpstreamFamily};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
#[clap(version, about = "Exports active Jellyfin and Plex playback sessions as Prometheus metrics")]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, env = "CONFIG", value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Base URL of the Jellyfin server, e.g. http://jellyfin:8096.
    #[clap(long, env = "JELLYFIN_ADDRESS")]
    pub jellyfin_address: Option<String>,

    /// Jellyfin API key.
    #[clap(long, env = "JELLYFIN_API_KEY", hide_env_values = true)]
    pub jellyfin_api_key: Option<String>,

    /// Base URL of the Plex server, e.g. http://plex:32400.
    #[clap(long, env = "PLEX_ADDRESS")]
    pub plex_address: Option<String>,

    /// Plex token (X-Plex-Token).
    #[clap(long, env = "PLEX_TOKEN", hide_env_values = true)]
    pub plex_token: Option<String>,

    /// Seconds between two polls of the same upstream.
    #[clap(long, env = "POLL_INTERVAL_SEC", default_value_t = config::DEFAULT_POLL_INTERVAL_SEC)]
    pub poll_interval_sec: u64,

    /// Address the metrics server binds to.
    #[clap(long, env = "LISTEN_ADDRESS", default_value = config::DEFAULT_LISTEN_ADDRESS)]
    pub listen_address: String,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(short, long, env = "PORT", default_value_t = config::DEFAULT_PORT)]
    pub port: u16,
}

/// How long pollers get to finish an in-flight cycle on shutdown.
const POLLER_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            jellyfin_address: args.jellyfin_address.clone(),
            jellyfin_api_key: args.jellyfin_api_key.clone(),
            plex_address: args.plex_address.clone(),
            plex_token: args.plex_token.clone(),
            poll_interval_sec: args.poll_interval_sec,
            listen_address: args.listen_address.clone(),
            port: args.port,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = AppConfig::resolve(&config::CliConfig::from(&cli_args), file_config)
        .context("Invalid configuration")?;

    info!("Initializing metrics...");
    metrics::init_metrics();
    let registry = metrics::REGISTRY.clone();

    let http = http_client().context("Failed to create HTTP client")?;
    let shutdown_token = CancellationToken::new();
    let mut pollers = Vec::new();

    if app_config.jellyfin.is_none() {
        info!("Jellyfin polling disabled: no address and API key configured");
    }
    if app_config.plex.is_none() {
        info!("Plex polling disabled: no address and token configured");
    }

    for (family, settings) in app_config.upstreams() {
        let source: Arc<dyn SessionSource> = match family {
            UpstreamFamily::Jellyfin => Arc::new(JellyfinClient::new(
                http.clone(),
                &settings.address,
                settings.credential.clone(),
            )),
            UpstreamFamily::Plex => Arc::new(PlexClient::new(
                http.clone(),
                &settings.address,
                settings.credential.clone(),
            )),
        };

        let snapshot = Arc::new(SessionSnapshot::new());
        metrics::register_sessions(&registry, family, snapshot.clone())
            .with_context(|| format!("Failed to register {} session metrics", family))?;

        let poller = SessionPoller::new(source, snapshot, settings.poll_interval);
        pollers.push(poller.spawn(shutdown_token.clone()));
    }

    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_signal() => {
                info!("Received shutdown signal, initiating graceful shutdown");
                signal_token.cancel();
            }
            _ = signal_token.cancelled() => {}
        }
    });

    // Returns once the token is cancelled and in-flight scrapes are done,
    // or early if binding or serving fails.
    let result = run_server(
        &app_config.listen_address,
        app_config.port,
        registry,
        shutdown_token.clone(),
    )
    .await;
    info!("Metrics server stopped: {:?}", result);

    shutdown_token.cancel();
    for poller in pollers {
        if tokio::time::timeout(POLLER_SHUTDOWN_GRACE, poller).await.is_err() {
            warn!("Poller did not finish within {:?}", POLLER_SHUTDOWN_GRACE);
        }
    }

    result
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
