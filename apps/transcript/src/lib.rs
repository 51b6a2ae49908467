//! # Transcript Library
//!
//! This library exposes the CLI modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;

// Re-export transcript_core for convenience
pub use transcript_core;
