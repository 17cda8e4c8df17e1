pub mod ai;
pub mod config;
pub mod error;
pub mod feed;
pub mod filter;
pub mod notify;
pub mod pipeline;
pub mod report;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use pipeline::{Pipeline, RunOptions, RunOutcome, RunSummary};
