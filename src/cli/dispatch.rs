use super::config::cmd_config;
use super::env::CliArgs;
use super::export::cmd_export;
use super::run::cmd_run;
use super::validate::cmd_validate;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Run(args) => cmd_run(args, ctx.config()).await,
        Commands::Validate(args) => cmd_validate(args, ctx.config()).await,
        Commands::Export(args) => cmd_export(args).await,
        Commands::Config(args) => cmd_config(args, ctx).await,
    }
}
