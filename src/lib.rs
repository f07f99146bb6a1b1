//! Stepwright command line surface
//!
//! Loads configuration, wires the step engine to a document and persists
//! the run outputs.

pub mod cli;
pub mod config;
pub mod session;

pub use config::AppConfig;
pub use session::{RunSession, SessionReport};
