pub mod aggregator;
pub mod config;
pub mod error;
pub mod generator;
pub mod lookup;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod protocols;
pub mod report;

pub use config::Config;
pub use error::{FlowTagError, Rejection, Result};
pub use pipeline::{parse_flow_logs, run, RunSummary};
