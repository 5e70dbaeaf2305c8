use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::Result;
use crate::models::domain::LookupEntry;
use crate::protocols::protocol_ids;

pub const LOOKUP_HEADER: &str = "dstport,protocol,tag";

const PROTOCOL_KEYWORDS: [&str; 6] = ["icmp", "tcp", "udp", "ICMP", "TCP", "UDP"];
const ACTIONS: [&str; 2] = ["ACCEPT", "REJECT"];
const HEX: &[u8] = b"abcdef0123456789";

/// Fabricates version 2 flow log records and lookup table rows.
pub struct LogGenerator<R: Rng> {
    rng: R,
}

impl LogGenerator<StdRng> {
    /// Seeded when `seed` is given, otherwise from OS entropy.
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        LogGenerator::new(rng)
    }
}

impl<R: Rng> LogGenerator<R> {
    pub fn new(rng: R) -> Self {
        LogGenerator { rng }
    }

    fn random_ip(&mut self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.rng.gen_range(1..=255),
            self.rng.gen_range(1..=255),
            self.rng.gen_range(1..=255),
            self.rng.gen_range(1..=255)
        )
    }

    fn random_interface_id(&mut self) -> String {
        let suffix: String = (0..16)
            .map(|_| *HEX.choose(&mut self.rng).unwrap_or(&b'0') as char)
            .collect();
        format!("eni-{suffix}")
    }

    /// One flow log line (without newline) in default field order.
    pub fn flow_log_entry(&mut self) -> String {
        let now = Utc::now().timestamp();
        let protocols: Vec<&str> = protocol_ids().collect();
        let account_id: u64 = self.rng.gen_range(100_000_000_000..=999_999_999_999);
        let action = *ACTIONS.choose(&mut self.rng).unwrap_or(&"ACCEPT");

        let fields = [
            "2".to_string(),
            account_id.to_string(),
            self.random_interface_id(),
            self.random_ip(),
            self.random_ip(),
            self.rng.gen_range(1024..=65535).to_string(),
            self.rng.gen_range(1..=65535).to_string(),
            protocols.choose(&mut self.rng).unwrap_or(&"6").to_string(),
            self.rng.gen_range(1..=1000).to_string(),
            self.rng.gen_range(50..=5000).to_string(),
            (now - self.rng.gen_range(10_000..=50_000)).to_string(),
            (now - self.rng.gen_range(1_000..=10_000)).to_string(),
            action.to_string(),
            "OK".to_string(),
        ];
        fields.join(" ")
    }

    pub fn lookup_entry(&mut self) -> LookupEntry {
        let tag = if self.rng.gen_bool(0.5) {
            "email".to_string()
        } else {
            format!("sv_P{}", self.rng.gen_range(1..=5))
        };
        LookupEntry {
            dstport: self.rng.gen_range(1..=65535).to_string(),
            protocol: PROTOCOL_KEYWORDS
                .choose(&mut self.rng)
                .unwrap_or(&"tcp")
                .to_string(),
            tag,
        }
    }

    /// Overwrites `path` with a header and `entries` random rows.
    pub fn generate_lookup_table(&mut self, path: &Path, entries: usize) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{LOOKUP_HEADER}")?;
        for _ in 0..entries {
            let entry = self.lookup_entry();
            writeln!(writer, "{},{},{}", entry.dstport, entry.protocol, entry.tag)?;
        }
        writer.flush()?;
        debug!(path = %path.display(), entries, "generated lookup table");
        Ok(())
    }

    /// Overwrites `path` with `entries` random flow log lines.
    pub fn generate_flow_logs(&mut self, path: &Path, entries: usize) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for _ in 0..entries {
            writeln!(writer, "{}", self.flow_log_entry())?;
        }
        writer.flush()?;
        debug!(path = %path.display(), entries, "generated flow log");
        Ok(())
    }
}
