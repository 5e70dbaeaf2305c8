// dstport/protocol -> tag lookup, loaded once or scanned per query.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use multimap::MultiMap;
use tracing::{debug, warn};

use crate::error::{FlowTagError, Result};
use crate::models::domain::LookupEntry;

/// Anything that can resolve a destination port and protocol keyword to a tag.
/// `Ok(None)` means the pair is untagged, not an error.
pub trait TagLookup {
    fn find(&self, dstport: &str, protocol: &str) -> Result<Option<String>>;
}

enum Row {
    Blank,
    Malformed,
    Entry(LookupEntry),
}

fn parse_row(line: &str) -> Row {
    if line.trim().is_empty() {
        return Row::Blank;
    }
    let cols: Vec<&str> = line.split(',').collect();
    if cols.len() < 3 {
        return Row::Malformed;
    }
    Row::Entry(LookupEntry {
        dstport: cols[0].to_string(),
        protocol: cols[1].to_string(),
        tag: cols[2].trim().to_string(),
    })
}

fn open_table(path: &Path) -> Result<BufReader<File>> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(FlowTagError::LookupTableMissing(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// In-memory lookup table keyed by (dstport, lower-cased protocol).
///
/// Every row is kept, in file order, under its key; queries return the first
/// one, so an earlier row shadows later duplicates.
#[derive(Debug)]
pub struct LookupIndex {
    entries: MultiMap<(String, String), String>,
}

impl LookupIndex {
    pub fn new() -> Self {
        LookupIndex {
            entries: MultiMap::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let index = Self::from_reader(open_table(path)?)?;
        debug!(
            path = %path.display(),
            keys = index.len(),
            shadowed = index.shadowed_keys(),
            "lookup table loaded"
        );
        Ok(index)
    }

    /// Reads a lookup table; the first line is a header and is skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut index = LookupIndex::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            if n == 0 {
                continue;
            }
            match parse_row(&line) {
                Row::Blank => {}
                Row::Malformed => warn!(line = n + 1, "skipping malformed lookup row"),
                Row::Entry(entry) => index.add(entry),
            }
        }
        Ok(index)
    }

    pub fn add(&mut self, entry: LookupEntry) {
        let key = entry.key();
        self.entries.insert(key, entry.tag);
    }

    pub fn get(&self, dstport: &str, protocol: &str) -> Option<&str> {
        self.entries
            .get(&(dstport.to_string(), protocol.to_lowercase()))
            .map(String::as_str)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys that appear on more than one row.
    pub fn shadowed_keys(&self) -> usize {
        self.entries
            .iter_all()
            .filter(|(_, tags)| tags.len() > 1)
            .count()
    }
}

impl Default for LookupIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl TagLookup for LookupIndex {
    fn find(&self, dstport: &str, protocol: &str) -> Result<Option<String>> {
        Ok(self.get(dstport, protocol).map(str::to_string))
    }
}

/// Re-reads the lookup table from disk on every query and stops at the
/// first matching row.
#[derive(Debug, Clone)]
pub struct LookupFile {
    path: PathBuf,
}

impl LookupFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LookupFile { path: path.into() }
    }
}

impl TagLookup for LookupFile {
    fn find(&self, dstport: &str, protocol: &str) -> Result<Option<String>> {
        let protocol = protocol.to_lowercase();
        for (n, line) in open_table(&self.path)?.lines().enumerate() {
            let line = line?;
            if n == 0 {
                continue;
            }
            if let Row::Entry(entry) = parse_row(&line) {
                if entry.dstport == dstport && entry.protocol.to_lowercase() == protocol {
                    return Ok(Some(entry.tag));
                }
            }
        }
        Ok(None)
    }
}
