use std::path::PathBuf;
use std::sync::Arc;

use action_primitives::{DocumentPort, ScriptedDocument};
use anyhow::{bail, Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::runtime::read_plan;
use crate::config::AppConfig;
use crate::session::RunSession;

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Plan file: a JSON array of steps
    #[arg(short, long, value_name = "FILE")]
    pub plan: PathBuf,

    /// Site fixture the plan runs against (YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub fixture: PathBuf,

    /// Parent directory for the run output (overrides outputDir)
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Exit with an error when any step fails
    #[arg(long)]
    pub strict: bool,
}

pub async fn cmd_run(args: RunArgs, config: &AppConfig) -> Result<()> {
    let mut steps = read_plan(&args.plan).await?;
    let document = ScriptedDocument::from_path(&args.fixture)
        .with_context(|| format!("loading fixture {}", args.fixture.display()))?;
    let document: Arc<dyn DocumentPort> = Arc::new(document);

    let out_root = args.out_dir.unwrap_or_else(|| config.output_dir.clone());
    let session = RunSession::new(config.clone(), &out_root);

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, stopping the run");
                cancel.cancel();
            }
        })
    };

    let result = session.execute(document, &mut steps, &cancel).await;
    interrupt.abort();
    let report = result?;

    if !report.plan_issues.is_empty() {
        println!(
            "Plan has {} issue(s); run `stepwright validate` for details",
            report.plan_issues.len()
        );
    }
    let summary = report.exports.summary;
    println!(
        "Run finished: {} passed, {} failed, {} total",
        summary.passed, summary.failed, summary.total
    );
    if report.run.aborted {
        println!("Run was interrupted before all steps executed");
    }
    println!("Saved outputs to: {}", report.run_dir.display());
    for path in &report.exports.written {
        println!("  {}", path.display());
    }

    if args.strict && !summary.all_passed() {
        bail!("{} of {} steps failed", summary.failed, summary.total);
    }
    Ok(())
}
