use clap::Subcommand;

use super::config::ConfigArgs;
use super::export::ExportArgs;
use super::run::RunArgs;
use super::validate::ValidateArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Execute a plan against a site fixture and save the run outputs
    Run(RunArgs),

    /// Check a plan for structural problems without executing it
    Validate(ValidateArgs),

    /// Project a plan into code-generation JSONL
    Export(ExportArgs),

    /// Inspect Stepwright configuration
    Config(ConfigArgs),
}
