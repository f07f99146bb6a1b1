//! Action primitives and the document capability they act on
//!
//! This crate provides:
//! - `DocumentPort` / `ElementHandle`: the only way the engine touches a page
//! - primitives for every step action, including expectation-style assertions
//! - the post-action stability wait
//! - `ScriptedDocument`, a deterministic fixture-backed document

pub mod document;
pub mod errors;
pub mod fixture;
pub mod pattern;
mod primitives;
pub mod types;
mod waiting;

pub use document::*;
pub use errors::*;
pub use fixture::{
    Effect, ElementFixture, FixtureError, PageFixture, ScriptedDocument, SiteFixture,
};
pub use pattern::{normalize_whitespace, TextPattern};
pub use primitives::*;
pub use types::*;
pub use waiting::*;
