//! palaver: streaming terminal client for chat and web-search models.
//!
//! The interesting machinery is the incremental streaming pipeline:
//! provider deltas flow through [`scanner::FenceScanner`], which emits
//! plain text immediately and buffers fenced code blocks in full, and
//! [`highlight::render_event`], which writes them to the terminal with
//! syntect highlighting. [`app`] orchestrates provider selection, prompt
//! assembly, and conversation persistence around that pipeline.

pub mod app;
pub mod cli;
pub mod error;
pub mod highlight;
pub mod scanner;

pub use app::{list_conversations, run, RunOptions};
pub use cli::Cli;
pub use error::AppError;
pub use highlight::{highlight_code, prewarm_highlighting, render_event};
pub use scanner::{FenceScanner, ScanEvent, ScanState};
