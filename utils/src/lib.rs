//! Shared utilities for the stele workspace.

pub mod logging;

pub use logging::init_tracing;
