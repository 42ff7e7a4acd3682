//! DNS-over-HTTPS query client.
//!
//! Single entry point for every DNS query in the engine. Failures never
//! propagate past this boundary: network errors, HTTP error statuses,
//! timeouts, and malformed bodies all map to [`DnsOutcome::Failed`], and a
//! response without an `Answer` section is an empty success.

use std::sync::LazyLock;
use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;
use tokio::time::timeout;

use crate::types::{DnsOutcome, RecordType};

/// DNS query timeout in seconds.
const QUERY_TIMEOUT_SECS: u64 = 5;

/// Default DoH endpoint for single-resolver operations.
pub const DEFAULT_ENDPOINT: &str = "https://1.1.1.1/dns-query";

/// Shared HTTP client for DoH queries.
static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(QUERY_TIMEOUT_SECS))
        .build()
        .unwrap_or_default()
});

/// JSON body of a DoH response. Absent fields deserialize to defaults, so a
/// reply without an `Answer` section is an empty record list.
#[derive(Debug, Deserialize)]
pub(crate) struct DohResponse {
    #[serde(default, rename = "Status")]
    pub(crate) status: i32,
    #[serde(default, rename = "Answer")]
    pub(crate) answer: Vec<DohAnswer>,
}

/// A single answer entry; only the record data is used.
#[derive(Debug, Deserialize)]
pub(crate) struct DohAnswer {
    #[serde(default)]
    pub(crate) data: String,
}

/// Issue one DNS query against a DoH endpoint.
///
/// `GET <endpoint>?name=<name>&type=<TYPE>` with `Accept:
/// application/dns-json`, bounded by an explicit 5 s deadline on top of the
/// client timeout.
pub async fn query(endpoint: &str, name: &str, record_type: RecordType) -> DnsOutcome {
    let record_type_label = record_type.to_string();
    let request = HTTP_CLIENT
        .get(endpoint)
        .query(&[("name", name), ("type", record_type_label.as_str())])
        .header(reqwest::header::ACCEPT, "application/dns-json")
        .send();

    let response = match timeout(Duration::from_secs(QUERY_TIMEOUT_SECS), request).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            warn!("[doh] {record_type} query for {name} via {endpoint} failed: {e}");
            return DnsOutcome::Failed;
        }
        Err(_) => {
            warn!("[doh] {record_type} query for {name} via {endpoint} timed out ({QUERY_TIMEOUT_SECS}s)");
            return DnsOutcome::Failed;
        }
    };

    if !response.status().is_success() {
        warn!(
            "[doh] {endpoint} returned HTTP {} for {name} {record_type}",
            response.status()
        );
        return DnsOutcome::Failed;
    }

    match response.json::<DohResponse>().await {
        Ok(body) => {
            debug!(
                "[doh] {name} {record_type} via {endpoint}: status={}, {} record(s)",
                body.status,
                body.answer.len()
            );
            records_from(body, record_type)
        }
        Err(e) => {
            warn!("[doh] failed to parse response from {endpoint}: {e}");
            DnsOutcome::Failed
        }
    }
}

/// Map a parsed response body to an outcome, normalizing PTR data.
pub(crate) fn records_from(body: DohResponse, record_type: RecordType) -> DnsOutcome {
    let records = body
        .answer
        .into_iter()
        .map(|answer| normalize_data(answer.data, record_type))
        .collect();
    DnsOutcome::Answered(records)
}

/// Record data is returned verbatim except for PTR results, which have a
/// single trailing dot stripped from the domain name.
fn normalize_data(data: String, record_type: RecordType) -> String {
    if record_type == RecordType::Ptr {
        match data.strip_suffix('.') {
            Some(stripped) => stripped.to_string(),
            None => data,
        }
    } else {
        data
    }
}
