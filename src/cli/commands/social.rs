//! Social Command
//!
//! One-off handle check across every supported platform. Bypasses the
//! pipeline and the cache.

use std::path::Path;

use tokio::runtime::Runtime;

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::pipeline::check_social_handles;
use crate::types::{Result, social_available_count};

/// Handles are probed as typed, minus surrounding whitespace
fn handle_from_arg(name: &str) -> &str {
    name.trim()
}

/// Returns whether the handle is available on every platform
pub fn run(config_path: Option<&Path>, name: &str) -> Result<bool> {
    let ctx = CommandContext::load(config_path)?;
    let output = Output::new();
    let handle = handle_from_arg(name);

    let collab = ctx.collaborators_without_llm()?;
    let rt = Runtime::new()?;
    let results = rt.block_on(check_social_handles(&collab, handle));

    output.social(handle, &results);

    let available = social_available_count(&results);
    println!("\nSummary: {}/{} platforms available", available, results.len());
    Ok(available == results.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_kept_as_typed() {
        assert_eq!(handle_from_arg("john_doe"), "john_doe");
        assert_eq!(handle_from_arg("  Zynk-HQ \n"), "Zynk-HQ");
    }
}
