//! loudtag - ReplayGain 2.0 loudness scanner and tagger
use clap::Parser;
use loudtag::{run, Cli, OutputFormat, Reporter, Settings};
use loudtag_loudness::SymphoniaAnalyzer;
use loudtag_tags::LoftyTagStore;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // stdout carries results only
    let default_filter = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::load(cli.config.as_deref())?;
    let config = settings.run_config(&cli)?;

    let format = if cli.output {
        OutputFormat::Tab
    } else {
        OutputFormat::Human
    };
    let mut reporter = Reporter::new(std::io::stdout().lock(), format, config.unit());
    let mut store = LoftyTagStore::new();

    let summary = run(
        &cli.files,
        &config,
        &SymphoniaAnalyzer::new(),
        &mut store,
        &mut reporter,
    )?;
    drop(reporter.finish()?);

    if summary.has_failures() {
        tracing::warn!("{} file(s) failed", summary.failed.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
