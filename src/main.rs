use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use flowtag::config::{
    Config, GenerateRequest, InvalidLinePolicy, LookupStrategy, ReportFormat, DEFAULT_OUTPUT,
};
use flowtag::{FlowTagError, RunSummary};

/// Parse VPC flow log data either via files with given data or ones with
/// randomly generated data.
///
/// Both --flow_log_entries and --lookup_entries must be set for random data
/// to be generated into the given files.
#[derive(Parser, Debug)]
#[command(name = "flowtag", version)]
struct Cli {
    /// File name for flow log data. Plain text (.txt) only
    flow_log_fn: PathBuf,

    /// File name for lookup table. Plain text (.txt) only
    lookup_table_fn: PathBuf,

    /// Number of randomly generated flow log entries
    #[arg(long = "flow_log_entries", visible_alias = "fle")]
    flow_log_entries: Option<usize>,

    /// Number of randomly generated lookup table entries
    #[arg(long = "lookup_entries", visible_alias = "le")]
    lookup_entries: Option<usize>,

    /// Seed for the random generator
    #[arg(long, env = "FLOWTAG_SEED")]
    seed: Option<u64>,

    /// Report destination (overwritten)
    #[arg(short, long, env = "FLOWTAG_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// How tags are looked up
    #[arg(
        long,
        env = "FLOWTAG_LOOKUP_STRATEGY",
        value_enum,
        default_value_t = LookupStrategy::Indexed
    )]
    lookup_strategy: LookupStrategy,

    /// What to do with a malformed flow log line
    #[arg(
        long,
        env = "FLOWTAG_ON_INVALID",
        value_enum,
        default_value_t = InvalidLinePolicy::Abort
    )]
    on_invalid: InvalidLinePolicy,

    /// Report layout
    #[arg(
        long,
        env = "FLOWTAG_REPORT_FORMAT",
        value_enum,
        default_value_t = ReportFormat::Text
    )]
    format: ReportFormat,
}

fn usage_error(err: FlowTagError) -> ! {
    Cli::command()
        .error(ErrorKind::ValueValidation, err)
        .exit()
}

fn has_txt_extension(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".txt")
}

impl Cli {
    /// Generation happens only when both counts are given and non-zero.
    fn generate_request(&self) -> Option<GenerateRequest> {
        match (self.flow_log_entries, self.lookup_entries) {
            (Some(flow_log_entries), Some(lookup_entries))
                if flow_log_entries > 0 && lookup_entries > 0 =>
            {
                Some(GenerateRequest {
                    flow_log_entries,
                    lookup_entries,
                    seed: self.seed,
                })
            }
            _ => None,
        }
    }

    /// Checks names and existence; errors here are usage errors.
    fn into_config(self) -> Result<Config, FlowTagError> {
        let generate = self.generate_request();

        for path in [&self.flow_log_fn, &self.lookup_table_fn] {
            if !has_txt_extension(path) {
                return Err(FlowTagError::BadExtension(path.clone()));
            }
        }
        if generate.is_none() {
            if !self.flow_log_fn.is_file() {
                return Err(FlowTagError::FlowLogMissing(self.flow_log_fn));
            }
            if !self.lookup_table_fn.is_file() {
                return Err(FlowTagError::LookupTableMissing(self.lookup_table_fn));
            }
            if self.flow_log_entries.is_some() || self.lookup_entries.is_some() {
                tracing::warn!(
                    "both --flow_log_entries and --lookup_entries are needed to generate data"
                );
            }
        }

        Ok(Config::new(self.flow_log_fn, self.lookup_table_fn)
            .with_output(self.output)
            .with_lookup_strategy(self.lookup_strategy)
            .with_on_invalid(self.on_invalid)
            .with_format(self.format)
            .with_generate(generate))
    }
}

fn execute(config: &Config) -> anyhow::Result<RunSummary> {
    flowtag::run(config)
        .with_context(|| format!("failed to analyze {}", config.flow_log.display()))
}

fn main() -> ExitCode {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "flowtag=info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    println!("\n--- VPC Flow Log Analysis ---\n");
    let config = Cli::parse()
        .into_config()
        .unwrap_or_else(|e| usage_error(e));

    match execute(&config) {
        Ok(summary) => {
            eprintln!("\telapsed time: {:.4} seconds", summary.elapsed.as_secs_f64());
            ExitCode::SUCCESS
        }
        Err(e) => {
            if let Some(FlowTagError::Rejected { kind, line }) = e.downcast_ref::<FlowTagError>() {
                println!("ERROR: {kind} (line {line})");
            } else {
                eprintln!("error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
