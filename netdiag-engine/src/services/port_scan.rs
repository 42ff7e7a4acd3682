//! Batched TCP-reachability port probing.
//!
//! Ports are probed in fixed-size batches to bound concurrency, with a short
//! pause between batches so a target is never hammered. Each probe tries a
//! direct TCP connect first and falls back to a minimal HTTP HEAD exchange
//! when the connect errors; the whole probe sits under one hard deadline.
//! Probe failures are never fatal to the scan.

use std::time::{Duration, Instant};

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use log::{debug, trace};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};

use crate::types::{PortProbeResult, PortScanReport, PortSpec, PortStatus, ScanProgress};

use super::address;

/// Hard deadline for a single probe, covering connect and fallback.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for the HTTP HEAD fallback exchange.
const FALLBACK_TIMEOUT: Duration = Duration::from_secs(3);

/// Ports probed concurrently per batch.
const BATCH_SIZE: usize = 10;

/// Pause between batches.
const BATCH_PAUSE: Duration = Duration::from_millis(100);

/// Best-effort service name for a well-known port.
fn service_name(port: u16) -> &'static str {
    match port {
        21 => "FTP",
        22 => "SSH",
        23 => "Telnet",
        25 => "SMTP",
        53 => "DNS",
        80 => "HTTP",
        110 => "POP3",
        143 => "IMAP",
        443 => "HTTPS",
        993 => "IMAPS",
        995 => "POP3S",
        3000 | 3001 | 9000 => "Dev Server",
        8080 => "HTTP Alt",
        8443 => "HTTPS Alt",
        _ => "Unknown",
    }
}

/// Render a connectable `host:port` string, bracketing IPv6 literals.
fn host_port(target: &str, port: u16) -> String {
    if address::is_ipv6(target) {
        format!("[{target}]:{port}")
    } else {
        format!("{target}:{port}")
    }
}

/// Minimal HTTP HEAD exchange used when the direct connect errors.
///
/// Opens a fresh connection, sends a HEAD request, and accepts any response
/// that starts with `HTTP/` as proof of reachability.
async fn head_probe(target: &str, port: u16) -> bool {
    let result = timeout(FALLBACK_TIMEOUT, async {
        let mut stream = TcpStream::connect(host_port(target, port)).await.ok()?;
        let request = format!("HEAD / HTTP/1.1\r\nHost: {target}\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.ok()?;
        let mut response = vec![0u8; 128];
        let _ = stream.read(&mut response).await.ok()?;
        Some(String::from_utf8_lossy(&response).starts_with("HTTP/"))
    })
    .await;

    result.unwrap_or(None).unwrap_or(false)
}

/// Probe a single port.
///
/// Primary strategy is a direct TCP connect; if that *errors* (as opposed to
/// timing out), the HTTP HEAD fallback gets one chance before the port is
/// declared closed. The outer deadline guarantees the probe settles within
/// [`PROBE_TIMEOUT`] no matter which path it takes.
async fn probe_port(target: &str, port: u16) -> PortProbeResult {
    let started = Instant::now();

    let opened = timeout(PROBE_TIMEOUT, async {
        match TcpStream::connect((target, port)).await {
            Ok(_) => true,
            Err(e) => {
                trace!("[scan] connect to {target}:{port} failed ({e}), trying HEAD fallback");
                head_probe(target, port).await
            }
        }
    })
    .await
    .unwrap_or(false);

    let response_time_ms = if opened {
        // u128 -> u64: elapsed millis under a 5s deadline
        #[allow(clippy::cast_possible_truncation)]
        Some(started.elapsed().as_millis() as u64)
    } else {
        None
    };

    PortProbeResult {
        port,
        status: if opened {
            PortStatus::Open
        } else {
            PortStatus::Closed
        },
        service: service_name(port).to_string(),
        response_time_ms,
    }
}

/// Scan the ports in `spec` against `target`.
///
/// `on_progress` fires after every individual probe settles, not just after
/// each batch. The final result list is reordered to ascending port order
/// regardless of which probes finished first.
///
/// Privacy and syntax preconditions are enforced by the caller before this
/// function runs; nothing here re-validates the target.
pub async fn scan<F>(target: &str, spec: &PortSpec, mut on_progress: F) -> PortScanReport
where
    F: FnMut(ScanProgress),
{
    let ports = spec.ports();
    let total = ports.len();
    let started = Instant::now();

    debug!("[scan] probing {total} port(s) on {target}");

    let mut results: Vec<PortProbeResult> = Vec::with_capacity(total);
    let mut completed = 0usize;

    for (batch_index, batch) in ports.chunks(BATCH_SIZE).enumerate() {
        if batch_index > 0 {
            // Pacing between batches; deliberate, not a correctness need
            sleep(BATCH_PAUSE).await;
        }

        let mut probes: FuturesUnordered<_> = batch
            .iter()
            .map(|&port| probe_port(target, port))
            .collect();

        while let Some(result) = probes.next().await {
            results.push(result);
            completed += 1;
            on_progress(ScanProgress { completed, total });
        }
    }

    results.sort_unstable_by_key(|r| r.port);
    let open_count = results
        .iter()
        .filter(|r| r.status == PortStatus::Open)
        .count();

    // u128 -> u64: scan wall-clock time in millis never exceeds u64::MAX
    #[allow(clippy::cast_possible_truncation)]
    let total_time_ms = started.elapsed().as_millis() as u64;

    debug!("[scan] {target}: {open_count}/{total} open in {total_time_ms}ms");

    PortScanReport {
        target: target.to_string(),
        results,
        open_count,
        total_count: total,
        total_time_ms,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    // ==================== service_name tests ====================

    #[test]
    fn test_service_name_well_known() {
        assert_eq!(service_name(22), "SSH");
        assert_eq!(service_name(53), "DNS");
        assert_eq!(service_name(443), "HTTPS");
        assert_eq!(service_name(8443), "HTTPS Alt");
        assert_eq!(service_name(3001), "Dev Server");
    }

    #[test]
    fn test_service_name_default() {
        assert_eq!(service_name(1234), "Unknown");
        assert_eq!(service_name(65535), "Unknown");
    }

    // ==================== host_port tests ====================

    #[test]
    fn test_host_port_brackets_ipv6_literals() {
        assert_eq!(host_port("::1", 80), "[::1]:80");
        assert_eq!(host_port("2001:db8::1", 8080), "[2001:db8::1]:8080");
    }

    #[test]
    fn test_host_port_plain_for_ipv4_and_domains() {
        assert_eq!(host_port("8.8.8.8", 53), "8.8.8.8:53");
        assert_eq!(host_port("example.com", 443), "example.com:443");
    }

    // ==================== probe tests (loopback only) ====================

    async fn local_listener() -> (TcpListener, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    #[tokio::test]
    async fn test_probe_open_port() {
        let (_listener, port) = local_listener().await;
        let result = probe_port("127.0.0.1", port).await;
        assert_eq!(result.status, PortStatus::Open);
        assert!(result.response_time_ms.is_some());
    }

    #[tokio::test]
    async fn test_probe_closed_port() {
        // Bind then drop to get a port nothing is listening on
        let port = {
            let (listener, port) = local_listener().await;
            drop(listener);
            port
        };
        let result = probe_port("127.0.0.1", port).await;
        assert_eq!(result.status, PortStatus::Closed);
        assert!(result.response_time_ms.is_none());
    }

    #[tokio::test]
    async fn test_head_probe_reaches_ipv6_literal_target() {
        let listener = TcpListener::bind("[::1]:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut request = vec![0u8; 256];
                let _ = stream.read(&mut request).await;
                let _ = stream.write_all(b"HTTP/1.1 200 OK\r\n\r\n").await;
            }
        });
        assert!(head_probe("::1", port).await);
    }

    #[tokio::test]
    async fn test_scan_results_sorted_and_progress_monotonic() {
        let (_listener, open_port) = local_listener().await;
        let closed_port = {
            let (listener, port) = local_listener().await;
            drop(listener);
            port
        };

        let expression = format!("{open_port},{closed_port}");
        let spec = PortSpec::parse(&expression).unwrap();

        let mut progress_seen: Vec<ScanProgress> = Vec::new();
        let report = scan("127.0.0.1", &spec, |p| progress_seen.push(p)).await;

        assert_eq!(report.total_count, 2);
        assert_eq!(report.open_count, 1);
        let ports: Vec<u16> = report.results.iter().map(|r| r.port).collect();
        let mut sorted = ports.clone();
        sorted.sort_unstable();
        assert_eq!(ports, sorted);

        assert_eq!(progress_seen.len(), 2);
        assert_eq!(progress_seen[0].completed, 1);
        assert_eq!(progress_seen[1].completed, 2);
        assert!(progress_seen.iter().all(|p| p.total == 2));
    }

    #[tokio::test]
    async fn test_scan_single_open_port_report_shape() {
        let (_listener, port) = local_listener().await;
        let spec = PortSpec::parse(&port.to_string()).unwrap();
        let report = scan("127.0.0.1", &spec, |_| {}).await;
        assert_eq!(report.target, "127.0.0.1");
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].port, port);
        assert_eq!(report.results[0].status, PortStatus::Open);
    }
}
