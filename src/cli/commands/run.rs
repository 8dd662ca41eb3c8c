//! Run Command
//!
//! Start the discovery pipeline and keep it running until Ctrl+C.

use std::path::Path;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing::{error, info};

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::pipeline::{Pipeline, PipelineSettings};
use crate::types::Result;

/// Command-line overrides for the domain length bounds
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

pub fn run(config_path: Option<&Path>, options: RunOptions) -> Result<()> {
    let mut ctx = CommandContext::load(config_path)?;

    let pipeline_config = &mut ctx.config.pipeline;
    if let Some(min) = options.min_length {
        pipeline_config.min_length = min;
    }
    if let Some(max) = options.max_length {
        pipeline_config.max_length = max;
    }
    pipeline_config.validate_lengths()?;

    let rt = Runtime::new()?;
    rt.block_on(run_pipeline(ctx))
}

async fn run_pipeline(ctx: CommandContext) -> Result<()> {
    let output = Output::new();
    let pipeline_config = &ctx.config.pipeline;

    let collab = ctx.collaborators().await?;
    let cache = Arc::new(ctx.open_cache().await);

    output.header("DomainTerm");
    output.info(&format!(
        "Words: {} | Cache: {} | Length: {}-{}",
        pipeline_config.base_words_file.display(),
        pipeline_config.db_file.display(),
        pipeline_config.min_length,
        pipeline_config.max_length
    ));
    output.info("Press Ctrl+C to stop");

    let settings = PipelineSettings::from_config(pipeline_config);
    Pipeline::new(cache, collab, settings)
        .run(shutdown_signal())
        .await?;

    output.success("Pipeline stopped, cache saved");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => error!("Failed to listen for Ctrl+C, shutting down: {}", e),
    }
}
