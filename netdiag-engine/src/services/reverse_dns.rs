//! Reverse DNS (PTR) lookup.

use log::{debug, warn};

use crate::types::{DnsOutcome, RecordType, ReverseLookupReport};

use super::{address, doh};

/// Look up the PTR record for an IP address via the default resolver.
///
/// Returns the first answer, already trailing-dot normalized. A failed query
/// and a missing record both yield `hostname: None`; the difference shows up
/// only in the log.
pub async fn lookup(ip: &str) -> ReverseLookupReport {
    let query = address::reverse_lookup_name(ip);
    let outcome = doh::query(doh::DEFAULT_ENDPOINT, &query, RecordType::Ptr).await;

    let hostname = match outcome {
        DnsOutcome::Answered(records) => {
            let first = records.into_iter().next();
            if first.is_none() {
                debug!("[reverse] no PTR record for {ip} ({query})");
            }
            first
        }
        DnsOutcome::Failed => {
            warn!("[reverse] PTR lookup failed for {ip} ({query})");
            None
        }
    };

    ReverseLookupReport {
        ip: ip.to_string(),
        query,
        hostname,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_lookup_real() {
        let report = lookup("8.8.8.8").await;
        assert_eq!(report.query, "8.8.8.8.in-addr.arpa");
        assert_eq!(report.hostname.as_deref(), Some("dns.google"));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_lookup_unassigned_ip_has_no_hostname() {
        // TEST-NET-1, no PTR delegation
        let report = lookup("192.0.2.1").await;
        assert!(report.hostname.is_none());
    }
}
