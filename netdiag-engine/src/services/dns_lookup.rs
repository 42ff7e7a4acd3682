//! Multi-record-type lookup for a single domain.

use futures::future::join_all;

use crate::types::{DomainRecordsReport, RecordSetOutcome, RecordType};

use super::doh;

/// Record types queried for a domain lookup, in report order.
const LOOKUP_TYPES: [RecordType; 5] = [
    RecordType::A,
    RecordType::Aaaa,
    RecordType::Mx,
    RecordType::Ns,
    RecordType::Txt,
];

/// Query every lookup record type concurrently against the default resolver.
///
/// One type failing never affects the others; each slot in the report keeps
/// its own outcome, in fixed type order.
pub async fn lookup(domain: &str) -> DomainRecordsReport {
    let futures: Vec<_> = LOOKUP_TYPES
        .into_iter()
        .map(|record_type| async move {
            let outcome = doh::query(doh::DEFAULT_ENDPOINT, domain, record_type).await;
            RecordSetOutcome {
                record_type,
                outcome,
            }
        })
        .collect();

    DomainRecordsReport {
        domain: domain.to_string(),
        records: join_all(futures).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_types_fixed_order() {
        assert_eq!(
            LOOKUP_TYPES,
            [
                RecordType::A,
                RecordType::Aaaa,
                RecordType::Mx,
                RecordType::Ns,
                RecordType::Txt,
            ]
        );
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_lookup_real() {
        let report = lookup("google.com").await;
        assert_eq!(report.domain, "google.com");
        assert_eq!(report.records.len(), 5);
        assert_eq!(report.records[0].record_type, RecordType::A);
        assert!(report.records[0].outcome.is_propagated());
    }
}
