//! Stateless service façade exposing all diagnostic operations.
//!
//! Every method on [`DiagnosticsService`] is an async associated function.
//! Input validation happens here, before any network I/O: a misuse fails
//! fast with its own diagnostic and never issues a partial request.

pub mod address;
mod dns_lookup;
mod dns_propagation;
mod doh;
mod ip_info;
mod port_scan;
mod reverse_dns;

use crate::error::{EngineError, EngineResult};
use crate::types::{
    Address, DomainRecordsReport, IpInfoReport, PortScanReport, PortSpec, PropagationResult,
    RecordType, ReverseLookupReport, ScanProgress,
};

/// Validate a domain name input.
fn validate_domain(domain: &str) -> EngineResult<&str> {
    let domain = domain.trim();
    if domain.is_empty() {
        return Err(EngineError::InvalidInput(
            "domain name is required".to_string(),
        ));
    }
    if !address::is_valid_domain(domain) {
        return Err(EngineError::InvalidInput(format!(
            "not a valid domain name: {domain}"
        )));
    }
    Ok(domain)
}

/// Validate an IP address input (IPv4 or IPv6 syntax).
fn validate_ip(ip: &str) -> EngineResult<&str> {
    let ip = ip.trim();
    match address::classify(ip) {
        Address::Ipv4 | Address::Ipv6 => Ok(ip),
        Address::Domain | Address::Invalid => Err(EngineError::InvalidInput(format!(
            "not a valid IP address: {ip}"
        ))),
    }
}

/// Entry point for all diagnostic operations.
///
/// All methods are stateless associated functions — call them directly on
/// the type.
///
/// ```rust,no_run
/// use netdiag_engine::DiagnosticsService;
/// # async fn demo() -> netdiag_engine::EngineResult<()> {
/// let report = DiagnosticsService::dns_lookup("example.com").await?;
/// # Ok(())
/// # }
/// ```
pub struct DiagnosticsService;

impl DiagnosticsService {
    /// Fetch IP metadata (organisation, country, region) for `ip`, or for
    /// the caller's own address when `ip` is `None`.
    pub async fn ip_info(ip: Option<&str>) -> EngineResult<IpInfoReport> {
        let ip = ip.map(validate_ip).transpose()?;
        ip_info::fetch(ip).await
    }

    /// Resolve A, AAAA, MX, NS, and TXT records for a domain concurrently.
    pub async fn dns_lookup(domain: &str) -> EngineResult<DomainRecordsReport> {
        let domain = validate_domain(domain)?;
        Ok(dns_lookup::lookup(domain).await)
    }

    /// Check DNS propagation for a domain across the fixed resolver set.
    pub async fn propagation_check(
        domain: &str,
        record_type: RecordType,
    ) -> EngineResult<PropagationResult> {
        let domain = validate_domain(domain)?;
        Ok(dns_propagation::check(domain, record_type).await)
    }

    /// Look up the PTR record for an IP address.
    pub async fn reverse_lookup(ip: &str) -> EngineResult<ReverseLookupReport> {
        let ip = validate_ip(ip)?;
        Ok(reverse_dns::lookup(ip).await)
    }

    /// Probe the ports given by `ports` (a comma-separated port expression)
    /// against `target`.
    ///
    /// `on_progress` fires after every individual probe settles. Private and
    /// loopback targets are rejected before any probe is issued, with a
    /// diagnostic distinct from plain invalid input.
    pub async fn port_scan<F>(
        target: &str,
        ports: &str,
        on_progress: F,
    ) -> EngineResult<PortScanReport>
    where
        F: FnMut(ScanProgress),
    {
        let target = target.trim();
        if target.is_empty() {
            return Err(EngineError::InvalidInput(
                "scan target is required".to_string(),
            ));
        }
        if address::classify(target) == Address::Invalid {
            return Err(EngineError::InvalidInput(format!(
                "not a valid scan target: {target}"
            )));
        }
        if address::is_private_target(target) {
            return Err(EngineError::PrivateTarget(target.to_string()));
        }
        let spec = PortSpec::parse(ports)?;
        Ok(port_scan::scan(target, &spec, on_progress).await)
    }

    /// Parse a port expression without scanning, exposing the validated
    /// port list and any range diagnostics.
    pub fn parse_ports(ports: &str) -> EngineResult<PortSpec> {
        PortSpec::parse(ports)
    }
}
