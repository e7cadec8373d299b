use anyhow::{Context, Result};
use canvas_export_core::{CanvasApi, Exporter, HttpClient, RateLimitedExecutor, RetryAfterPolicy};
use clap::Parser;
use tracing::{debug, error, info};

use crate::ProcessExit;
use crate::app::{credentials, directory_prompt, terminal};
use crate::cli::Args;

pub(crate) async fn run_export() -> Result<ProcessExit> {
    // Parse before tracing so --help works without logs
    let args = Args::parse();

    let default_level = terminal::resolve_default_log_level(args.quiet, args.verbose);
    let no_color = terminal::is_no_color_requested(&args);
    terminal::init_tracing(default_level, no_color);

    debug!(?args, "CLI arguments parsed");
    info!("Canvas export starting");

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let settings =
        credentials::resolve_settings(&args, &credentials::EnvValues::from_process(), &cwd)?;
    debug!(?settings, "settings resolved");

    // No API contact before the user has picked a directory
    let explicit_dir = args.output_dir.clone();
    let Some(output_dir) =
        tokio::task::spawn_blocking(move || directory_prompt::choose_output_dir(explicit_dir))
            .await
            .context("Directory prompt did not complete")?
            .context("Failed to read download directory")?
    else {
        error!("No download directory chosen");
        return Ok(ProcessExit::Failure);
    };
    tokio::fs::create_dir_all(&output_dir)
        .await
        .with_context(|| format!("Failed to create output directory '{}'", output_dir.display()))?;
    info!(dir = %output_dir.display(), "Exporting into directory");

    let client = HttpClient::try_new()?;
    let executor = RateLimitedExecutor::new(client, RetryAfterPolicy::default());
    let api = CanvasApi::new(executor, &settings.base_url, settings.token)
        .with_context(|| format!("Invalid API base URL '{}'", settings.base_url))?
        .with_per_page(args.per_page);

    api.validate_token().await.context("Token not valid")?;
    debug!("token accepted");

    let stats = Exporter::new(&api, &output_dir)
        .run()
        .await
        .context("Nothing to export")?;

    info!(
        downloaded = stats.downloaded(),
        skipped = stats.skipped(),
        failed = stats.failed(),
        "Done"
    );
    Ok(ProcessExit::Success)
}
