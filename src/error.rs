use std::path::PathBuf;

use thiserror::Error;

/// Why a single flow log line was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Wrong Version - flow log data is NOT in the default format")]
    WrongVersion,

    #[error("Incorrect Number of Fields - flow log data is NOT in the default format")]
    WrongFieldCount,

    #[error("Unknown Protocol {0} - flow log data uses a protocol outside icmp/tcp/udp")]
    UnknownProtocol(String),
}

#[derive(Debug, Error)]
pub enum FlowTagError {
    #[error("line {line}: {kind}")]
    Rejected { line: usize, kind: Rejection },

    #[error("lookup table not found: {}", .0.display())]
    LookupTableMissing(PathBuf),

    #[error("flow log not found: {}", .0.display())]
    FlowLogMissing(PathBuf),

    #[error("filename must be plain text (.txt): {}", .0.display())]
    BadExtension(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FlowTagError {
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            FlowTagError::Rejected { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FlowTagError>;
