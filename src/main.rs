//! Option hedging engine binary

use anyhow::Context;
use clap::Parser;
use option_hedging_engine::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "option-hedging-engine")]
#[command(about = "Options mispricing and delta-hedging engine", long_about = None)]
struct Cli {
    /// JSON engine config; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Exchange API root
    #[arg(long, default_value = "http://localhost:9999/v1")]
    base_url: String,

    /// Exchange API key
    #[arg(long, env = "RIT_API_KEY")]
    api_key: String,

    /// Per-request timeout in milliseconds (none by default)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: log::LevelFilter,
}

/// Cancel `token` on Ctrl-C from a dedicated runtime thread
fn install_shutdown_handler(token: CancellationToken) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build signal runtime")?;

    std::thread::Builder::new()
        .name("shutdown-listener".to_string())
        .spawn(move || {
            runtime.block_on(async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        log::info!("Ctrl-C received, finishing current cycle");
                        token.cancel();
                    }
                    Err(e) => log::error!("cannot listen for Ctrl-C: {}", e),
                }
            });
        })
        .context("failed to spawn shutdown listener")?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .parse_default_env()
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let network = NetworkConfig {
        base_url: cli.base_url,
        api_key: cli.api_key,
        timeout_ms: cli.timeout_ms,
    };

    let exchange = RestExchange::connect(&network)?;
    let engine = TradingEngine::new(config)?;

    log::info!(
        "connected to {}; margin {:.2}, top {} per cycle",
        network.base_url,
        engine.config().mispricing_margin,
        engine.config().top_k
    );

    let token = CancellationToken::new();
    install_shutdown_handler(token.clone())?;

    let state = engine.run(&exchange, &token);
    log::info!("trading loop {:?}", state);

    println!("\n{}", "═".repeat(50));
    println!("{}", engine.get_metrics().summary());

    Ok(())
}
