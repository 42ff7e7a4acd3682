//! IP metadata lookup via ipinfo.io.
//!
//! Unlike the DNS and probe services, a network failure here is fatal to the
//! operation and surfaces as an [`EngineError`] to the caller.

use std::sync::LazyLock;
use std::time::Duration;

use log::debug;
use serde::Deserialize;
use tokio::time::timeout;

use crate::error::{EngineError, EngineResult};
use crate::types::IpInfoReport;

/// ipinfo.io request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Shared HTTP client for ipinfo.io calls.
static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_default()
});

/// Response structure from the ipinfo.io JSON API. Every field is optional.
#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    ip: Option<String>,
    org: Option<String>,
    country: Option<String>,
    region: Option<String>,
}

/// Fetch metadata for an IP address, or for the caller's own address when
/// `ip` is `None`.
///
/// Absent response fields default to `"N/A"`.
pub async fn fetch(ip: Option<&str>) -> EngineResult<IpInfoReport> {
    let url = match ip {
        Some(ip) => format!("https://ipinfo.io/{ip}/json"),
        None => "https://ipinfo.io/json".to_string(),
    };

    // Explicit deadline on top of the client timeout, so the bound holds
    // even when the client fell back to default construction
    let request = HTTP_CLIENT.get(&url).send();
    let response = match timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS), request).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            return Err(if e.is_timeout() {
                EngineError::Timeout(format!("ipinfo.io request: {e}"))
            } else {
                EngineError::Network(format!("ipinfo.io request failed: {e}"))
            });
        }
        Err(_) => {
            return Err(EngineError::Timeout(format!(
                "ipinfo.io request exceeded {REQUEST_TIMEOUT_SECS}s"
            )));
        }
    };

    if !response.status().is_success() {
        return Err(EngineError::Network(format!(
            "ipinfo.io returned HTTP {}",
            response.status()
        )));
    }

    let body: IpInfoResponse = response
        .json()
        .await
        .map_err(|e| EngineError::Network(format!("failed to parse ipinfo.io response: {e}")))?;

    let report = report_from(body, ip);
    debug!("[ipinfo] resolved {url} to {}", report.ip);
    Ok(report)
}

/// Assemble the report, preferring the response's own address over the
/// requested one. When neither is known the detail link falls back to the
/// bare site URL instead of embedding the `"N/A"` placeholder.
fn report_from(body: IpInfoResponse, requested: Option<&str>) -> IpInfoReport {
    let resolved_ip = body.ip.or_else(|| requested.map(String::from));
    let details_url = match &resolved_ip {
        Some(ip) => format!("https://ipinfo.io/{ip}"),
        None => "https://ipinfo.io".to_string(),
    };

    IpInfoReport {
        details_url,
        ip: resolved_ip.unwrap_or_else(|| "N/A".to_string()),
        org: body.org.unwrap_or_else(|| "N/A".to_string()),
        country: body.country.unwrap_or_else(|| "N/A".to_string()),
        region: body.region.unwrap_or_else(|| "N/A".to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_response_fields_all_optional() {
        let body: IpInfoResponse = serde_json::from_str("{}").unwrap();
        assert!(body.ip.is_none());
        assert!(body.org.is_none());
        assert!(body.country.is_none());
        assert!(body.region.is_none());
    }

    #[test]
    fn test_response_ignores_extra_fields() {
        let body: IpInfoResponse = serde_json::from_str(
            r#"{"ip": "8.8.8.8", "org": "AS15169 Google LLC", "hostname": "dns.google"}"#,
        )
        .unwrap();
        assert_eq!(body.ip.as_deref(), Some("8.8.8.8"));
        assert_eq!(body.org.as_deref(), Some("AS15169 Google LLC"));
    }

    #[test]
    fn test_report_prefers_response_ip() {
        let body: IpInfoResponse =
            serde_json::from_str(r#"{"ip": "8.8.8.8", "country": "US"}"#).unwrap();
        let report = report_from(body, Some("1.1.1.1"));
        assert_eq!(report.ip, "8.8.8.8");
        assert_eq!(report.details_url, "https://ipinfo.io/8.8.8.8");
        assert_eq!(report.country, "US");
        assert_eq!(report.org, "N/A");
    }

    #[test]
    fn test_report_falls_back_to_requested_ip() {
        let body: IpInfoResponse = serde_json::from_str("{}").unwrap();
        let report = report_from(body, Some("1.1.1.1"));
        assert_eq!(report.ip, "1.1.1.1");
        assert_eq!(report.details_url, "https://ipinfo.io/1.1.1.1");
    }

    #[test]
    fn test_report_without_any_ip_uses_bare_details_url() {
        let body: IpInfoResponse = serde_json::from_str("{}").unwrap();
        let report = report_from(body, None);
        assert_eq!(report.ip, "N/A");
        assert_eq!(report.details_url, "https://ipinfo.io");
        assert_eq!(report.region, "N/A");
    }

    // ==================== integration tests ====================

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_fetch_specific_ip_real() {
        let report = fetch(Some("8.8.8.8")).await.unwrap();
        assert_eq!(report.ip, "8.8.8.8");
        assert_eq!(report.details_url, "https://ipinfo.io/8.8.8.8");
        assert_ne!(report.org, "N/A");
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_fetch_own_ip_real() {
        let report = fetch(None).await.unwrap();
        assert!(!report.ip.is_empty());
    }
}
