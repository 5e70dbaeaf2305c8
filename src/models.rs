pub mod domain {
    /// Field count of a version 2 default-format flow log record.
    pub const FLOW_LOG_FIELDS: usize = 14;
    pub const FLOW_LOG_VERSION: &str = "2";

    const DSTPORT_FIELD: usize = 6;
    const PROTOCOL_FIELD: usize = 7;

    /// One validated flow log line, fields in default order:
    /// version, account-id, interface-id, srcaddr, dstaddr, srcport, dstport,
    /// protocol, packets, bytes, start, end, action, log-status.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct FlowRecord {
        fields: Vec<String>,
    }

    impl FlowRecord {
        pub(crate) fn from_fields(fields: Vec<String>) -> Self {
            debug_assert_eq!(fields.len(), FLOW_LOG_FIELDS);
            FlowRecord { fields }
        }

        pub fn fields(&self) -> &[String] {
            &self.fields
        }

        pub fn dstport(&self) -> &str {
            &self.fields[DSTPORT_FIELD]
        }

        pub fn protocol_id(&self) -> &str {
            &self.fields[PROTOCOL_FIELD]
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct LookupEntry {
        pub dstport: String,
        pub protocol: String,
        pub tag: String,
    }

    impl LookupEntry {
        /// Index key: port verbatim, protocol lower-cased.
        pub fn key(&self) -> (String, String) {
            (self.dstport.clone(), self.protocol.to_lowercase())
        }
    }
}

pub mod dto {
    use serde::Serialize;

    #[derive(Debug, Serialize, Clone, PartialEq, Eq)]
    pub struct TagCountDTO {
        pub tag: String,
        pub count: u64,
    }

    #[derive(Debug, Serialize, Clone, PartialEq, Eq)]
    pub struct PortProtocolCountDTO {
        pub port: String,
        pub protocol: String,
        pub count: u64,
    }

    #[derive(Debug, Serialize, Clone, PartialEq, Eq)]
    pub struct ReportDTO {
        pub tag_counts: Vec<TagCountDTO>,
        pub port_protocol_counts: Vec<PortProtocolCountDTO>,
    }
}
