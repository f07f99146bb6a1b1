use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use run_recorder::plan_to_jsonl;
use tokio::fs;
use tracing::info;

use super::runtime::read_plan;

#[derive(Args, Clone, Debug)]
pub struct ExportArgs {
    /// Plan file: a JSON array of steps
    #[arg(short, long, value_name = "FILE")]
    pub plan: PathBuf,

    /// Output file; prints to stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

pub async fn cmd_export(args: ExportArgs) -> Result<()> {
    let steps = read_plan(&args.plan).await?;
    let mut jsonl = plan_to_jsonl(&steps)?;
    if !jsonl.is_empty() {
        jsonl.push('\n');
    }

    match args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(&path, jsonl)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            info!(steps = steps.len(), path = %path.display(), "Exported plan");
            println!("Wrote {} lines to {}", steps.len(), path.display());
        }
        None => print!("{}", jsonl),
    }
    Ok(())
}
