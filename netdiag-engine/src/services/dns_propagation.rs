//! DNS propagation check across a fixed set of global resolvers.

use std::time::Instant;

use futures::future::join_all;
use log::debug;

use crate::types::{DnsResolver, PropagationResult, RecordType, ResolverOutcome};

use super::doh;

/// Return the fixed set of propagation resolvers, each with its own DoH
/// endpoint.
fn propagation_resolvers() -> Vec<DnsResolver> {
    fn resolver(name: &str, ip: &str, country_code: &str) -> DnsResolver {
        DnsResolver {
            name: name.to_string(),
            endpoint: format!("https://{ip}/dns-query"),
            country_code: country_code.to_string(),
        }
    }

    vec![
        resolver("Cloudflare", "1.1.1.1", "US"),
        resolver("IIJ", "202.232.2.16", "JP"),
        resolver("KT", "168.126.63.1", "KR"),
        resolver("OpenDNS", "208.67.222.222", "SG"),
        resolver("Telstra", "139.130.4.5", "AU"),
        resolver("AdGuard", "94.140.14.14", "FR"),
        resolver("DNS.Watch", "84.200.69.80", "DE"),
        resolver("CleanBrowsing", "185.228.168.9", "GB"),
        resolver("Shaw", "64.59.144.16", "CA"),
    ]
}

/// Compute the propagation percentage.
fn ratio(propagated: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    // usize -> f64: small resolver counts, well within f64's precise range
    #[allow(clippy::cast_precision_loss)]
    let percentage = (propagated as f64 / total as f64) * 100.0;
    // f64 -> f32: a percentage (0.0..=100.0) fits f32 comfortably
    #[allow(clippy::cast_possible_truncation)]
    {
        percentage as f32
    }
}

/// Query every resolver in the fixed set concurrently and aggregate.
///
/// Each query is independent: a failure or timeout on one resolver never
/// delays or cancels the others. Every future carries its resolver identity,
/// and `join_all` preserves input order, so the report is always in resolver
/// declaration order regardless of completion order.
pub async fn check(domain: &str, record_type: RecordType) -> PropagationResult {
    let resolvers = propagation_resolvers();
    let total_count = resolvers.len();

    let futures: Vec<_> = resolvers
        .into_iter()
        .map(|resolver| {
            let domain = domain.to_string();
            async move {
                let query_start = Instant::now();
                let outcome = doh::query(&resolver.endpoint, &domain, record_type).await;
                // u128 -> u64: elapsed millis for a DNS query never exceed u64::MAX
                #[allow(clippy::cast_possible_truncation)]
                let response_time_ms = query_start.elapsed().as_millis() as u64;
                ResolverOutcome {
                    resolver,
                    outcome,
                    response_time_ms,
                }
            }
        })
        .collect();

    let per_resolver = join_all(futures).await;

    let propagated_count = per_resolver
        .iter()
        .filter(|r| r.outcome.is_propagated())
        .count();

    debug!(
        "[propagation] {domain} {record_type}: {propagated_count}/{total_count} resolvers answered"
    );

    PropagationResult {
        domain: domain.to_string(),
        record_type,
        per_resolver,
        propagated_count,
        total_count,
        ratio: ratio(propagated_count, total_count),
    }
}
