use std::path::PathBuf;

use clap::ValueEnum;

pub const DEFAULT_OUTPUT: &str = "output.txt";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LookupStrategy {
    /// Load the lookup table once before reading the flow log.
    #[default]
    Indexed,
    /// Re-read the lookup table for every flow log line.
    Scan,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum InvalidLinePolicy {
    /// Stop at the first rejected line and write no report.
    #[default]
    Abort,
    /// Log rejected lines and keep going.
    Skip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Synthetic input to write before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateRequest {
    pub flow_log_entries: usize,
    pub lookup_entries: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub flow_log: PathBuf,
    pub lookup_table: PathBuf,
    pub output: PathBuf,
    pub lookup_strategy: LookupStrategy,
    pub on_invalid: InvalidLinePolicy,
    pub format: ReportFormat,
    pub generate: Option<GenerateRequest>,
}

impl Config {
    pub fn new(flow_log: impl Into<PathBuf>, lookup_table: impl Into<PathBuf>) -> Self {
        Config {
            flow_log: flow_log.into(),
            lookup_table: lookup_table.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            lookup_strategy: LookupStrategy::default(),
            on_invalid: InvalidLinePolicy::default(),
            format: ReportFormat::default(),
            generate: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_lookup_strategy(mut self, strategy: LookupStrategy) -> Self {
        self.lookup_strategy = strategy;
        self
    }

    pub fn with_on_invalid(mut self, policy: InvalidLinePolicy) -> Self {
        self.on_invalid = policy;
        self
    }

    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_generate(mut self, generate: Option<GenerateRequest>) -> Self {
        self.generate = generate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_behavior() {
        let config = Config::new("flow.txt", "lookup.txt");
        assert_eq!(config.output, PathBuf::from("output.txt"));
        assert_eq!(config.lookup_strategy, LookupStrategy::Indexed);
        assert_eq!(config.on_invalid, InvalidLinePolicy::Abort);
        assert_eq!(config.format, ReportFormat::Text);
        assert!(config.generate.is_none());
    }

    #[test]
    fn test_value_enum_names() {
        assert_eq!(
            LookupStrategy::from_str("scan", true),
            Ok(LookupStrategy::Scan)
        );
        assert_eq!(
            InvalidLinePolicy::from_str("skip", true),
            Ok(InvalidLinePolicy::Skip)
        );
        assert_eq!(
            ReportFormat::from_str("JSON", true),
            Ok(ReportFormat::Json)
        );
    }
}
