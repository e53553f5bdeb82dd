// src/lib.rs
//! SEC EDGAR data (company lookup, filing search, XBRL facts, insider and
//! 8-K summaries) exposed as text-in/text-out tools for agent frameworks.
pub mod config;
pub mod edgar;
pub mod extractors;
pub mod normalize;
pub mod tools;
pub mod utils;

pub use config::EdgarConfig;
pub use edgar::{Cik, EdgarClient, JsonFetcher};
pub use tools::{SecEdgarToolkit, ToolKind, ToolSpec};
pub use utils::{AppError, EdgarError, TransportError};
