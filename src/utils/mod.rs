//! Utility modules for common functionality
//!
//! Provides the output streams shared between the dispatcher and handler tasks.

pub mod output;

pub use output::{CapturedOutput, OutputSink};
