use clap::Parser;
use credit_scoring::core::batch;
use credit_scoring::utils::{logger, validation::Validate};
use credit_scoring::{CliConfig, CreditScorer, LocalArtifactStore, ScoringError};
use serde_json::json;
use std::fs::File;
use std::io::{BufReader, BufWriter};

fn fail(message: impl std::fmt::Display) -> ! {
    println!("{}", json!({ "error": message.to_string() }));
    std::process::exit(1);
}

async fn run(config: CliConfig) -> credit_scoring::Result<String> {
    // 單筆模式只接受一個 JSON 參數
    let single = match (&config.batch, config.input.as_slice()) {
        (Some(_), _) => None,
        (None, [raw]) => Some(serde_json::from_str::<serde_json::Value>(raw)?),
        (None, _) => return Err(ScoringError::invalid_arguments()),
    };

    let app_config = config.common.resolve()?;
    app_config.validate()?;

    let store = LocalArtifactStore::default();
    let scorer = CreditScorer::load(&store, &app_config)
        .await?
        .with_monitoring(app_config.monitoring.enabled);

    if let Some(path) = &config.batch {
        tracing::info!("📁 Scoring batch file: {}", path);
        let input = BufReader::new(File::open(path)?);
        return match &config.output {
            Some(out) => {
                let summary = batch::score_csv(&scorer, input, BufWriter::new(File::create(out)?))?;
                Ok(format!(
                    "{}\n",
                    json!({ "rows": summary.rows, "high_risk": summary.high_risk, "output": out })
                ))
            }
            None => {
                // 全部成功才輸出，失敗時 stdout 只留錯誤 JSON
                let mut buffer = Vec::new();
                batch::score_csv(&scorer, input, &mut buffer)?;
                String::from_utf8(buffer)
                    .map_err(|e| ScoringError::invalid_input(format!("non UTF-8 CSV output: {}", e)))
            }
        };
    }

    let payload = single.ok_or_else(ScoringError::invalid_arguments)?;
    let assessment = scorer.assess(&payload)?;
    Ok(format!("{}\n", serde_json::to_string(&assessment)?))
}

#[tokio::main]
async fn main() {
    let config = match CliConfig::try_parse() {
        Ok(config) => config,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(_) => fail("Invalid arguments"),
    };

    logger::init_cli_logger(config.common.verbose);
    tracing::debug!("CLI config: {:?}", config);

    match run(config).await {
        Ok(output) => print!("{}", output),
        Err(e) => {
            tracing::error!(
                "❌ Scoring failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            fail(e);
        }
    }
}
