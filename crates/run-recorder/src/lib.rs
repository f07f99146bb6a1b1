pub mod api;
pub mod errors;
pub mod export;
pub mod model;
pub mod policy;

pub use api::{Recorder, RunRecorder};
pub use errors::{RecResult, RecorderError};
pub use export::codegen::{project_plan, project_step, CodegenLine, Expectation, LocatorCall};
pub use export::plan_to_jsonl;
pub use model::{ExportReq, ExportResult, RunLog, RunMeta, RunSummary};
pub use policy::{BrowserMeta, RecorderPolicyView, Verbosity};
