//! Modelprobe binary
//!
//! Runs the full probe-and-recommend cycle: probe every candidate, check
//! function-calling on the first success, print the summary and
//! recommendation. Exits non-zero if and only if no candidate succeeded.

use clap::Parser;
use modelprobe::cli::{Cli, Command, generate_config_template};
use modelprobe::client::GeminiClient;
use modelprobe::config::Config;
use modelprobe::error::{AppError, AppResult};
use modelprobe::probe::{CapabilityProbe, recommend};
use modelprobe::report::ProbeReport;
use modelprobe::telemetry;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("Error: {}", error);
            std::process::exit(2);
        }
    }
}

/// Run the selected command; returns whether any candidate succeeded
async fn run(cli: Cli) -> AppResult<bool> {
    if let Some(Command::Config { output }) = &cli.command {
        return write_config_template(output.as_deref()).map(|_| true);
    }

    let config = Config::load_or_builtin(&cli.config)?;
    telemetry::init(&config.observability.log_level);

    let api_key = config.resolve_api_key()?;
    let client = GeminiClient::new(
        config.api.base_url.clone(),
        api_key,
        config.api.request_timeout_seconds.seconds(),
    )?;
    let probe = CapabilityProbe::new(Arc::new(client));

    tracing::info!(
        run_id = %probe.run_id(),
        candidates = config.probe.candidates.len(),
        base_url = %config.api.base_url,
        "Starting probe run"
    );

    let results = probe
        .probe_all(&config.probe.candidates, &config.probe.prompt)
        .await;

    // Function-calling is probed on the first success only, to spare quota
    let tool_call = match results.iter().find(|r| r.is_success()) {
        Some(first_success) => Some(
            probe
                .probe_tool_call(
                    &first_success.candidate,
                    &config.probe.prompt,
                    &config.probe.tool.to_declaration(),
                )
                .await,
        ),
        None => None,
    };

    let recommendation =
        recommend(&results, &config.probe.preference).map(|model| model.to_string());

    let report = ProbeReport {
        results,
        tool_call,
        recommendation,
    };

    let any_success = report.any_success();
    tracing::info!(
        run_id = %probe.run_id(),
        any_success = any_success,
        recommendation = report.recommendation.as_deref().unwrap_or("(none)"),
        "Probe run finished"
    );

    println!("{}", report.render(&config.api.base_url));

    Ok(any_success)
}

/// Write the config template to a file or stdout
fn write_config_template(output: Option<&str>) -> AppResult<()> {
    let template = generate_config_template();
    match output {
        Some(path) => {
            std::fs::write(path, template).map_err(|e| {
                AppError::Config(format!("Failed to write template to {}: {}", path, e))
            })?;
            println!("Wrote configuration template to {}", path);
        }
        None => print!("{}", template),
    }
    Ok(())
}
