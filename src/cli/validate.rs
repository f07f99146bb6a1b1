use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use stepwright_core_types::validate_plan;

use super::runtime::read_plan;
use crate::config::AppConfig;

#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Plan file: a JSON array of steps
    #[arg(short, long, value_name = "FILE")]
    pub plan: PathBuf,

    /// Alternate locator cap (defaults to maxAltLocatorsPerStep)
    #[arg(long)]
    pub max_alternates: Option<usize>,
}

pub async fn cmd_validate(args: ValidateArgs, config: &AppConfig) -> Result<()> {
    let steps = read_plan(&args.plan).await?;
    let max = args
        .max_alternates
        .unwrap_or(config.grounding.max_alt_locators_per_step);

    let issues = validate_plan(&steps, max);
    if issues.is_empty() {
        println!("{}: {} steps, no issues", args.plan.display(), steps.len());
        return Ok(());
    }

    for issue in &issues {
        println!("{}", issue);
    }
    bail!("{} issue(s) found in {}", issues.len(), args.plan.display())
}
