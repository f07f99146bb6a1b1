//! Artifact capture policy
//!
//! Decides after each step whether to snapshot the document structure and
//! the rendered page, writes both under the run directory, and keeps the
//! append-only artifact map with its two independent id sequences.

pub mod api;
pub mod errors;
pub mod fs;
pub mod hash;
pub mod policy;

pub use api::{ArtifactCapture, ArtifactCaptureBuilder, CaptureOutcome, FsArtifactCapture};
pub use errors::{SnapErrKind, SnapError};
pub use policy::{CapturePolicyView, CaptureReason};
