use crate::error::Rejection;
use crate::models::domain::{FlowRecord, FLOW_LOG_FIELDS, FLOW_LOG_VERSION};

/// Validates one raw flow log line.
///
/// The line is trimmed and split on single spaces, so doubled separators
/// produce empty fields. Version is checked before the field count, which
/// makes an empty line a `WrongVersion` rejection.
pub fn parse_record(line: &str) -> Result<FlowRecord, Rejection> {
    let fields: Vec<&str> = line.trim().split(' ').collect();

    if fields[0] != FLOW_LOG_VERSION {
        return Err(Rejection::WrongVersion);
    }
    if fields.len() != FLOW_LOG_FIELDS {
        return Err(Rejection::WrongFieldCount);
    }

    Ok(FlowRecord::from_fields(
        fields.into_iter().map(str::to_string).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str =
        "2 123456789012 eni-abc 10.0.0.1 10.0.0.2 5000 443 6 10 500 1000 2000 ACCEPT OK";

    #[test]
    fn test_valid_record() {
        let record = parse_record(VALID).unwrap();
        assert_eq!(record.fields().len(), 14);
        assert_eq!(record.dstport(), "443");
        assert_eq!(record.protocol_id(), "6");
    }

    #[test]
    fn test_trailing_newline_is_stripped() {
        let record = parse_record(&format!("{VALID}\r\n")).unwrap();
        assert_eq!(record.fields()[13], "OK");
    }

    #[test]
    fn test_wrong_version() {
        let line = VALID.replacen('2', "3", 1);
        assert_eq!(parse_record(&line), Err(Rejection::WrongVersion));
    }

    #[test]
    fn test_version_checked_before_field_count() {
        assert_eq!(parse_record("5 a b"), Err(Rejection::WrongVersion));
    }

    #[test]
    fn test_empty_line_is_wrong_version() {
        assert_eq!(parse_record(""), Err(Rejection::WrongVersion));
        assert_eq!(parse_record("   \n"), Err(Rejection::WrongVersion));
    }

    #[test]
    fn test_too_few_fields() {
        let line = "2 123456789012 eni-abc 10.0.0.1 10.0.0.2 5000 443 6 10 500 1000 2000 ACCEPT";
        assert_eq!(parse_record(line), Err(Rejection::WrongFieldCount));
    }

    #[test]
    fn test_too_many_fields() {
        let line = format!("{VALID} extra");
        assert_eq!(parse_record(&line), Err(Rejection::WrongFieldCount));
    }

    #[test]
    fn test_double_space_changes_field_count() {
        let line = VALID.replacen(' ', "  ", 1);
        assert_eq!(parse_record(&line), Err(Rejection::WrongFieldCount));
    }
}
