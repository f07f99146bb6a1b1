//! Locator resolution over ordered candidate descriptors
//!
//! Candidates are examined strictly in the order given (primary first). The
//! first one that matches exactly one visible element wins; an ambiguous or
//! empty candidate is never accepted as a best guess. Every examined
//! candidate leaves a [`CandidateProbe`] behind for the run log.

pub mod errors;
pub mod resolver;
pub mod strategies;
pub mod types;

pub use errors::*;
pub use resolver::*;
pub use strategies::*;
pub use types::*;
