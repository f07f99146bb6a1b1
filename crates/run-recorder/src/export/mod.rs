pub mod codegen;
pub mod json;
pub mod jsonl;

use stepwright_core_types::Step;

use crate::errors::RecResult;

/// Codegen projection of a plan, one JSON object per line
pub fn plan_to_jsonl(steps: &[Step]) -> RecResult<String> {
    let lines = jsonl::serialize_lines(&codegen::project_plan(steps))?;
    Ok(lines.join("\n"))
}
