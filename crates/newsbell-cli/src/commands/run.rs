use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use tracing::{info, warn};

use newsbell_core::{
    feed::truncate_chars,
    notify::PushStatus,
    AppConfig, Pipeline, RunOptions, RunOutcome,
};

/// Exit status for `--strict` runs where every attempted channel failed
const EXIT_PUSH_FAILED: u8 = 2;

/// Exit status after a settings or sources file could not be loaded
pub fn load_failure_exit(strict: bool) -> ExitCode {
    if strict {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

pub async fn run(
    config: AppConfig,
    sources_path: &Path,
    options: RunOptions,
    strict: bool,
) -> Result<ExitCode> {
    let pipeline = Pipeline::new(config, sources_path).with_options(options);

    let summary = match pipeline.run().await {
        Ok(RunOutcome::Completed(summary)) => summary,
        Ok(RunOutcome::NothingFetched { sources_failed }) => {
            info!("Done: no news fetched ({} sources failed)", sources_failed);
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => {
            tracing::error!("Run aborted: {}", e);
            return Ok(load_failure_exit(strict));
        }
    };

    info!(
        "Fetched {} items from {} sources ({} failed), {} in report{}",
        summary.fetched,
        summary.sources_ok,
        summary.sources_failed,
        summary.kept,
        if summary.used_fallback { " (unfiltered fallback)" } else { "" }
    );

    let Some(dispatch) = summary.dispatch else {
        println!("{}", summary.report);
        return Ok(ExitCode::SUCCESS);
    };

    for (channel, status) in &dispatch.outcomes {
        match status {
            PushStatus::Delivered => info!("  {}: delivered", channel),
            PushStatus::Failed(reason) => warn!("  {}: failed ({})", channel, reason),
            PushStatus::Skipped(reason) => info!("  {}: skipped ({})", channel, reason),
        }
    }

    if dispatch.any_delivered() {
        info!("Done: digest pushed");
        return Ok(ExitCode::SUCCESS);
    }

    warn!("Done, but no channel accepted the digest");
    println!("{}", truncate_chars(&summary.report, 500));

    if strict && dispatch.all_failed() {
        return Ok(ExitCode::from(EXIT_PUSH_FAILED));
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING: &str = "/nonexistent/news_sources.json";

    #[tokio::test]
    async fn test_missing_sources_exits_cleanly() {
        let code = run(AppConfig::default(), Path::new(MISSING), RunOptions::default(), false)
            .await
            .unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn test_missing_sources_fails_when_strict() {
        let code = run(AppConfig::default(), Path::new(MISSING), RunOptions::default(), true)
            .await
            .unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }
}
