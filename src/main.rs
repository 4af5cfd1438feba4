use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use mini_swarm::config::Config;
use mini_swarm::handlers::Message;
use mini_swarm::router::Router;
use mini_swarm::{gateway, tools};

#[derive(Parser, Debug)]
#[command(name = "swarmd", version, about = "Keyword-routed multi-handler request service")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the daemon (HTTP gateway)
    Start,
    /// Route a single message from the terminal and print the envelope
    Ask {
        /// The request text
        message: String,
    },
    /// List the registered tools
    Tools,
    /// Check if a local swarmd daemon is running
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    {
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;

        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let cli = Cli::parse();
    let config_path = cli
        .config
        .unwrap_or_else(|| mini_swarm::swarm_home().join("config.yaml"));

    match cli.command {
        Some(Command::Start) | None => { /* fall through to daemon startup */ }
        Some(Command::Ask { message }) => {
            let cfg = Config::load(&config_path).await?;
            let router = Router::new(&cfg);
            let envelope = router.route(&Message::new(message)).await;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            return Ok(());
        }
        Some(Command::Tools) => {
            tools::init();
            for meta in tools::list_tools() {
                println!("{:<16} {}", meta.name, meta.description);
            }
            return Ok(());
        }
        Some(Command::Status) => {
            let cfg = Config::load(&config_path).await?;
            let url = format!("http://{}:{}/api/status", cfg.gateway.bind, cfg.gateway.port);
            match reqwest::Client::new()
                .get(&url)
                .timeout(std::time::Duration::from_secs(2))
                .send()
                .await
            {
                Ok(resp) if resp.status().is_success() => {
                    println!("swarmd is running at {url}");
                }
                Ok(resp) => println!("swarmd responded with HTTP {}", resp.status()),
                Err(_) => println!("swarmd is not running (no response from {url})"),
            }
            return Ok(());
        }
    }

    // --- Daemon startup ---

    info!(path = %config_path.display(), "loading configuration");
    let cfg = Config::load(&config_path).await?;

    let router = Arc::new(Router::new(&cfg));
    info!(
        handlers = router.handlers().len(),
        tools = tools::list_tools().len(),
        "router initialized"
    );

    let gateway = gateway::spawn_gateway_if_enabled(&cfg.gateway, router.clone()).await;
    if gateway.is_none() && std::env::var("SWARMD_GATEWAY").as_deref() != Ok("0") {
        anyhow::bail!("gateway failed to start (all ports in use?)");
    }

    info!("swarmd ready");

    tokio::signal::ctrl_c().await?;
    info!("received Ctrl-C, shutting down");

    if let Some(gw) = gateway {
        gw.handle.abort();
    }

    info!("shutdown complete");
    Ok(())
}
