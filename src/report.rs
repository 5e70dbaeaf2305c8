use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::aggregator::Aggregator;
use crate::config::ReportFormat;
use crate::error::Result;
use crate::models::dto::{PortProtocolCountDTO, ReportDTO, TagCountDTO};

pub fn write_text<W: Write>(out: &mut W, agg: &Aggregator) -> Result<()> {
    out.write_all(b"Tag Counts:\nTag,Count\n")?;
    for (tag, count) in agg.tag_counts().iter() {
        writeln!(out, "{},{}", tag.trim_end(), count)?;
    }

    out.write_all(b"\nPort/Protocol Combination Counts:\nPort,Protocol,Count\n")?;
    for (combo, count) in agg.port_protocol_counts().iter() {
        writeln!(out, "{},{}", combo.trim_end(), count)?;
    }
    Ok(())
}

pub fn to_dto(agg: &Aggregator) -> ReportDTO {
    ReportDTO {
        tag_counts: agg
            .tag_counts()
            .iter()
            .map(|(tag, count)| TagCountDTO {
                tag: tag.trim_end().to_string(),
                count,
            })
            .collect(),
        port_protocol_counts: agg
            .port_protocol_counts()
            .iter()
            .map(|(combo, count)| {
                // protocol keywords never contain a comma, ports might
                let combo = combo.trim_end();
                let (port, protocol) = combo.rsplit_once(',').unwrap_or((combo, ""));
                PortProtocolCountDTO {
                    port: port.to_string(),
                    protocol: protocol.to_string(),
                    count,
                }
            })
            .collect(),
    }
}

pub fn write_json<W: Write>(out: &mut W, agg: &Aggregator) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &to_dto(agg))?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Creates (or truncates) `path` and writes the report in the chosen layout.
pub fn write_report(path: &Path, format: ReportFormat, agg: &Aggregator) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    match format {
        ReportFormat::Text => write_text(&mut out, agg)?,
        ReportFormat::Json => write_json(&mut out, agg)?,
    }
    out.flush()?;
    Ok(())
}
