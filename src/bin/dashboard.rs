use anyhow::{Context, Result};
use clap::Parser;
use credit_scoring::core::Scorer;
use credit_scoring::dashboard::{self, DashboardState};
use credit_scoring::utils::{logger, validation::Validate};
use credit_scoring::{api, ApiClient, CommonArgs, CreditScorer, LocalArtifactStore};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "dashboard")]
#[command(about = "Credit scoring dashboard")]
struct Args {
    /// Bind address, overrides [dashboard] host
    #[arg(long)]
    host: Option<String>,

    /// Port, overrides [dashboard] port
    #[arg(short, long)]
    port: Option<u16>,

    /// Score through a running REST API instead of loading the model
    #[arg(long, env = "CREDIT_SCORING_API_URL")]
    api_url: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = args
        .common
        .resolve()
        .context("Failed to load configuration")?;
    if let Some(host) = &args.host {
        config.dashboard.host = host.clone();
    }
    if let Some(port) = args.port {
        config.dashboard.port = port;
    }
    if let Some(url) = &args.api_url {
        config.dashboard.api_url = Some(url.clone());
    }

    logger::init_server_logger(args.common.verbose, config.log_format());

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let scorer: Arc<dyn Scorer> = match &config.dashboard.api_url {
        Some(url) => {
            tracing::info!("🔗 Scoring through remote API at {}", url);
            Arc::new(ApiClient::new(url)?)
        }
        None => {
            let store = LocalArtifactStore::default();
            let scorer = CreditScorer::load(&store, &config)
                .await
                .context("Failed to initialize model")?;
            Arc::new(scorer.with_monitoring(config.monitoring.enabled))
        }
    };

    match scorer.model_info().await {
        Ok(info) => tracing::info!("Model {} expects {} columns", info.model_type, info.expected_columns.len()),
        Err(e) => tracing::warn!("Model info unavailable: {}", e),
    }

    let app = dashboard::router(DashboardState::new(scorer));
    let addr = format!("{}:{}", config.dashboard.host, config.dashboard.port);
    api::serve(app, &addr).await?;
    Ok(())
}
