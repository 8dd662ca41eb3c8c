//! Results Command
//!
//! Rank available domains from the persisted cache. Read-only.

use std::path::Path;

use tokio::runtime::Runtime;

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::pipeline::ResultsReport;
use crate::types::Result;

pub fn run(config_path: Option<&Path>, limit: usize) -> Result<()> {
    let ctx = CommandContext::load(config_path)?;
    let rt = Runtime::new()?;
    let cache = rt.block_on(ctx.open_cache());

    let report = cache.read(ResultsReport::from_cache);
    Output::new().results(&report, limit);
    Ok(())
}
