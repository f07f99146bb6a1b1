pub mod api;
pub mod errors;
pub mod model;
pub mod policy;

mod dispatch;
mod overlay;
mod runner;

pub use api::{DefaultStepEngine, StepEngine, StepEngineBuilder};
pub use errors::StepError;
pub use model::{RunContext, RunReport, StepOutcome, StepPhase};
pub use policy::EnginePolicyView;
