use std::fs;
use std::path::Path;

use flowtag::config::{Config, GenerateRequest, InvalidLinePolicy, LookupStrategy, ReportFormat};
use flowtag::{FlowTagError, Rejection};
use tempfile::TempDir;

const LOOKUP: &str = "dstport,protocol,tag\n\
                      25,tcp,sv_P1\n\
                      68,udp,sv_P2\n\
                      23,tcp,sv_P1\n\
                      31,udp,SV_P3\n\
                      443,tcp,sv_P2\n\
                      443,tcp,duplicate\n\
                      110,tcp,email\n\
                      993,TCP,email\n\
                      143,tcp,email\n";

const FLOW_LOG: &str = "\
2 123456789012 eni-0a1b2c3d 10.0.1.201 198.51.100.2 443 49153 6 25 20000 1620140761 1620140821 ACCEPT OK
2 123456789012 eni-4d3c2b1a 192.168.1.100 203.0.113.101 23 49154 6 15 12000 1620140761 1620140821 REJECT OK
2 123456789012 eni-5e6f7g8h 192.168.1.101 198.51.100.3 25 49155 6 10 8000 1620140761 1620140821 ACCEPT OK
2 123456789012 eni-9h8g7f6e 172.16.0.100 203.0.113.102 110 49156 6 12 9000 1620140761 1620140821 ACCEPT OK
2 123456789012 eni-7i8j9k0l 172.16.0.101 192.0.2.203 993 49157 6 8 5000 1620140761 1620140821 ACCEPT OK
2 123456789012 eni-a1b2c3d4 10.0.1.102 172.217.7.228 1030 443 6 8 5000 1620140761 1620140821 ACCEPT OK
2 123456789012 eni-b5c6d7e8 10.0.2.103 52.26.198.183 56000 993 6 18 14000 1620140761 1620140821 ACCEPT OK
2 123456789012 eni-c9d0e1f2 10.0.3.104 52.26.198.183 49158 68 17 7 3000 1620140761 1620140821 ACCEPT OK
2 123456789012 eni-d3e4f5g6 10.0.4.105 52.26.198.183 49159 443 6 12 9000 1620140761 1620140821 ACCEPT OK
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(flow_log: &str, lookup: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("flow.txt"), flow_log).unwrap();
        fs::write(dir.path().join("lookup.txt"), lookup).unwrap();
        Fixture { dir }
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    fn config(&self) -> Config {
        Config::new(self.path("flow.txt"), self.path("lookup.txt"))
            .with_output(self.path("output.txt"))
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

const EXPECTED_REPORT: &str = "\
Tag Counts:
Tag,Count
Untagged,5
sv_P2,3
email,1

Port/Protocol Combination Counts:
Port,Protocol,Count
49153,tcp,1
49154,tcp,1
49155,tcp,1
49156,tcp,1
49157,tcp,1
443,tcp,2
993,tcp,1
68,udp,1
";

#[test]
fn test_full_run_text_report() {
    let fx = Fixture::new(FLOW_LOG, LOOKUP);
    let summary = flowtag::run(&fx.config()).unwrap();

    assert_eq!(summary.accepted, 9);
    assert_eq!(summary.skipped, 0);
    assert_eq!(read(&fx.path("output.txt")), EXPECTED_REPORT);
}

#[test]
fn test_scan_strategy_gives_same_report() {
    let fx = Fixture::new(FLOW_LOG, LOOKUP);
    flowtag::run(&fx.config().with_lookup_strategy(LookupStrategy::Scan)).unwrap();
    assert_eq!(read(&fx.path("output.txt")), EXPECTED_REPORT);
}

#[test]
fn test_rejected_line_leaves_existing_report_untouched() {
    let broken = format!("{FLOW_LOG}2 123456789012 eni-0a1b2c3d too few fields\n");
    let fx = Fixture::new(&broken, LOOKUP);
    fs::write(fx.path("output.txt"), "previous run\n").unwrap();

    let err = flowtag::run(&fx.config()).unwrap_err();
    assert!(matches!(
        err,
        FlowTagError::Rejected { line: 10, kind: Rejection::WrongFieldCount }
    ));
    assert_eq!(read(&fx.path("output.txt")), "previous run\n");
}

#[test]
fn test_wrong_version_writes_no_report() {
    let broken = FLOW_LOG.replacen("2 ", "3 ", 1);
    let fx = Fixture::new(&broken, LOOKUP);

    let err = flowtag::run(&fx.config()).unwrap_err();
    assert_eq!(err.rejection(), Some(&Rejection::WrongVersion));
    assert!(!fx.path("output.txt").exists());
}

#[test]
fn test_skip_policy_reports_valid_lines() {
    let noisy = format!("{FLOW_LOG}garbage\n");
    let fx = Fixture::new(&noisy, LOOKUP);

    let summary = flowtag::run(&fx.config().with_on_invalid(InvalidLinePolicy::Skip)).unwrap();
    assert_eq!(summary.accepted, 9);
    assert_eq!(summary.skipped, 1);
    assert_eq!(read(&fx.path("output.txt")), EXPECTED_REPORT);
}

#[test]
fn test_json_report() {
    let fx = Fixture::new(FLOW_LOG, LOOKUP);
    flowtag::run(&fx.config().with_format(ReportFormat::Json)).unwrap();

    let value: serde_json::Value = serde_json::from_str(&read(&fx.path("output.txt"))).unwrap();
    assert_eq!(value["tag_counts"].as_array().unwrap().len(), 3);
    assert_eq!(value["tag_counts"][0]["tag"], "Untagged");
    assert_eq!(value["port_protocol_counts"][5]["port"], "443");
    assert_eq!(value["port_protocol_counts"][5]["count"], 2);
}

#[test]
fn test_missing_flow_log() {
    let fx = Fixture::new(FLOW_LOG, LOOKUP);
    let config = Config::new(fx.path("absent.txt"), fx.path("lookup.txt"))
        .with_output(fx.path("output.txt"));
    assert!(matches!(
        flowtag::run(&config).unwrap_err(),
        FlowTagError::FlowLogMissing(_)
    ));
}

#[test]
fn test_generated_input_totals() {
    let fx = Fixture::new("", "");
    let config = fx.config().with_generate(Some(GenerateRequest {
        flow_log_entries: 300,
        lookup_entries: 50,
        seed: Some(1234),
    }));

    let summary = flowtag::run(&config).unwrap();
    assert_eq!(summary.accepted, 300);
    assert_eq!(read(&fx.path("flow.txt")).lines().count(), 300);
    assert_eq!(read(&fx.path("lookup.txt")).lines().count(), 51);

    let report = read(&fx.path("output.txt"));
    let (tags, combos) = report.split_once("\n\n").unwrap();
    let sum = |section: &str| -> u64 {
        section
            .lines()
            .skip(2)
            .map(|line| line.rsplit(',').next().unwrap().parse::<u64>().unwrap())
            .sum()
    };
    assert_eq!(sum(tags), 300);
    assert_eq!(sum(combos), 300);
}
