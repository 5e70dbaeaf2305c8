use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::aggregator::Aggregator;
use crate::config::{Config, InvalidLinePolicy, LookupStrategy};
use crate::error::{FlowTagError, Rejection, Result};
use crate::generator::LogGenerator;
use crate::lookup::{LookupFile, LookupIndex, TagLookup};
use crate::parser::parse_record;
use crate::protocols::protocol_name;
use crate::report::write_report;

#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub aggregator: Aggregator,
    pub accepted: u64,
    pub skipped: u64,
}

#[derive(Debug)]
pub struct RunSummary {
    pub accepted: u64,
    pub skipped: u64,
    pub elapsed: Duration,
}

fn classify<L: TagLookup + ?Sized>(
    line: &str,
    lookup: &L,
    agg: &mut Aggregator,
) -> Result<std::result::Result<(), Rejection>> {
    let record = match parse_record(line) {
        Ok(record) => record,
        Err(kind) => return Ok(Err(kind)),
    };
    let Some(protocol) = protocol_name(record.protocol_id()) else {
        return Ok(Err(Rejection::UnknownProtocol(
            record.protocol_id().to_string(),
        )));
    };

    let tag = lookup.find(record.dstport(), protocol)?;
    agg.observe(tag.as_deref(), record.dstport(), protocol);
    Ok(Ok(()))
}

/// Validates, classifies and tallies every line of a flow log.
///
/// Under `InvalidLinePolicy::Abort` the first rejected line ends the parse
/// with `FlowTagError::Rejected` and the partial tallies are dropped.
pub fn parse_flow_logs<R, L>(
    reader: R,
    lookup: &L,
    policy: InvalidLinePolicy,
) -> Result<ParseOutcome>
where
    R: BufRead,
    L: TagLookup + ?Sized,
{
    let mut outcome = ParseOutcome::default();

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        match classify(&line, lookup, &mut outcome.aggregator)? {
            Ok(()) => outcome.accepted += 1,
            Err(kind) => match policy {
                InvalidLinePolicy::Abort => {
                    return Err(FlowTagError::Rejected { line: n + 1, kind });
                }
                InvalidLinePolicy::Skip => {
                    warn!(line = n + 1, reason = %kind, "skipping rejected flow log line");
                    outcome.skipped += 1;
                }
            },
        }
    }
    Ok(outcome)
}

fn open_flow_log(path: &Path) -> Result<BufReader<File>> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(FlowTagError::FlowLogMissing(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

fn load_lookup(config: &Config) -> Result<Box<dyn TagLookup>> {
    Ok(match config.lookup_strategy {
        LookupStrategy::Indexed => Box::new(LookupIndex::load(&config.lookup_table)?),
        LookupStrategy::Scan => Box::new(LookupFile::new(&config.lookup_table)),
    })
}

/// Runs one batch: optional generation, parse, then the report.
/// Nothing is written to `config.output` unless the parse succeeds.
pub fn run(config: &Config) -> Result<RunSummary> {
    if let Some(request) = config.generate {
        let mut generator = LogGenerator::from_seed(request.seed);
        generator.generate_lookup_table(&config.lookup_table, request.lookup_entries)?;
        generator.generate_flow_logs(&config.flow_log, request.flow_log_entries)?;
    }

    let reader = open_flow_log(&config.flow_log)?;
    let start = Instant::now();

    let lookup = load_lookup(config)?;
    debug!(strategy = ?config.lookup_strategy, "lookup ready");

    let outcome = parse_flow_logs(reader, lookup.as_ref(), config.on_invalid)?;
    write_report(&config.output, config.format, &outcome.aggregator)?;
    let elapsed = start.elapsed();

    info!(
        accepted = outcome.accepted,
        observed = outcome.aggregator.observed(),
        skipped = outcome.skipped,
        tags = outcome.aggregator.tag_counts().len(),
        combos = outcome.aggregator.port_protocol_counts().len(),
        output = %config.output.display(),
        "report written"
    );

    Ok(RunSummary {
        accepted: outcome.accepted,
        skipped: outcome.skipped,
        elapsed,
    })
}
