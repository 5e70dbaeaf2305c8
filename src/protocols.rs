// IANA protocol numbers that appear in version 2 flow logs.

const PROTOCOLS: [(&str, &str); 3] = [("1", "icmp"), ("6", "tcp"), ("17", "udp")];

/// Maps the numeric protocol field of a flow log record to its keyword.
pub fn protocol_name(id: &str) -> Option<&'static str> {
    PROTOCOLS
        .iter()
        .find(|(num, _)| *num == id)
        .map(|(_, name)| *name)
}

pub fn protocol_ids() -> impl Iterator<Item = &'static str> {
    PROTOCOLS.iter().map(|(num, _)| *num)
}
