use anyhow::{Context, Result};
use clap::Parser;
use credit_scoring::utils::{logger, validation::Validate};
use credit_scoring::{api, CommonArgs, CreditScorer, LocalArtifactStore};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "api_server")]
#[command(about = "REST API serving credit-risk predictions")]
struct Args {
    /// Bind address, overrides [server] host
    #[arg(long)]
    host: Option<String>,

    /// Port, overrides [server] port
    #[arg(short, long)]
    port: Option<u16>,

    /// Emit JSON logs
    #[arg(long)]
    json_logs: bool,

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
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let format = if args.json_logs {
        logger::LogFormat::Json
    } else {
        config.log_format()
    };
    logger::init_server_logger(args.common.verbose, format);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let store = LocalArtifactStore::default();
    let scorer = match CreditScorer::load(&store, &config).await {
        Ok(scorer) => scorer.with_monitoring(config.monitoring.enabled),
        Err(e) => {
            tracing::error!("Failed to load model or columns: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let app = api::router(Arc::new(scorer));
    let addr = format!("{}:{}", config.server.host, config.server.port);
    api::serve(app, &addr).await?;
    Ok(())
}
