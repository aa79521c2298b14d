//! Shared foundation for the paydrip workspace: environment-driven
//! configuration and the workspace-wide error type.

pub mod config;
pub mod error;

pub use config::PaydripConfig;
pub use error::{PaydripError, Result};
