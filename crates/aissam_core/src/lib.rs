//! aissam_core - Core types for the AISSAM tutoring client
//!
//! This crate provides the pieces shared by the client and rendering crates:
//! - `config` - explicit client configuration, no process-wide defaults
//! - `mathtext` - mixed-content math segmenter for chat messages

pub mod config;
pub mod mathtext;

// Re-export commonly used types
pub use config::ClientConfig;
pub use mathtext::{segment, segment_str, Segment};
