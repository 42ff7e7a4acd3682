//! Public types returned by diagnostic operations.
//!
//! Everything here is a value object: created once per operation, never
//! mutated afterwards, serialized in camelCase for structured consumers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Maximum number of ports a single scan may probe.
pub const MAX_PORTS_PER_SCAN: usize = 5;

/// Maximum span a single `a-b` range token may cover.
pub const MAX_RANGE_SPAN: usize = 5;

/// DNS record type for lookup, propagation, and reverse operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Mail exchange record.
    Mx,
    /// Name server record.
    Ns,
    /// Text record.
    Txt,
    /// Pointer record (reverse DNS).
    Ptr,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::Aaaa => write!(f, "AAAA"),
            Self::Mx => write!(f, "MX"),
            Self::Ns => write!(f, "NS"),
            Self::Txt => write!(f, "TXT"),
            Self::Ptr => write!(f, "PTR"),
        }
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "MX" => Ok(Self::Mx),
            "NS" => Ok(Self::Ns),
            "TXT" => Ok(Self::Txt),
            "PTR" => Ok(Self::Ptr),
            _ => Err(format!("Unsupported DNS record type: {s}")),
        }
    }
}

/// Syntactic classification of an input string.
///
/// Classification is pure and total: every string maps to exactly one
/// variant, with no I/O and no resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Address {
    /// Four dot-separated decimal groups. Octets are deliberately not bounded
    /// to 0-255, so `999.999.999.999` still classifies here.
    Ipv4,
    /// Full, loopback, or `::`-compressed IPv6 form.
    Ipv6,
    /// Label-wise valid hostname.
    Domain,
    /// None of the above.
    Invalid,
}

/// A DNS resolver endpoint used for propagation checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsResolver {
    /// Human-readable label (e.g. `"Cloudflare"`).
    pub name: String,
    /// DNS-over-HTTPS endpoint URL.
    pub endpoint: String,
    /// ISO country code.
    pub country_code: String,
}

/// Outcome of a single DNS query.
///
/// An empty `Answered` list means the resolver replied with zero records,
/// which is distinct from `Failed` (network error, HTTP error, or timeout).
/// Queries never propagate an error past this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "records", rename_all = "lowercase")]
pub enum DnsOutcome {
    /// The resolver answered, possibly with zero records.
    Answered(Vec<String>),
    /// The query failed at the network or HTTP layer.
    Failed,
}

impl DnsOutcome {
    /// Whether this outcome counts as propagated: answered and non-empty.
    pub fn is_propagated(&self) -> bool {
        matches!(self, Self::Answered(records) if !records.is_empty())
    }

    /// Human-readable rendering of the outcome.
    ///
    /// Record data is joined with newlines; an empty answer renders as
    /// `"no records"` and a failure as `"error"`.
    pub fn summary(&self) -> String {
        match self {
            Self::Failed => "error".to_string(),
            Self::Answered(records) if records.is_empty() => "no records".to_string(),
            Self::Answered(records) => records.join("\n"),
        }
    }
}

/// Result from a single propagation resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverOutcome {
    /// Resolver that was queried.
    pub resolver: DnsResolver,
    /// Query outcome.
    pub outcome: DnsOutcome,
    /// Query round-trip time in milliseconds.
    pub response_time_ms: u64,
}

/// DNS propagation check result across the fixed resolver set.
///
/// `per_resolver` is ordered by resolver declaration order, not by query
/// completion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagationResult {
    /// Queried domain.
    pub domain: String,
    /// Queried record type.
    pub record_type: RecordType,
    /// Per-resolver outcomes in declaration order.
    pub per_resolver: Vec<ResolverOutcome>,
    /// Resolvers that answered with at least one record.
    pub propagated_count: usize,
    /// Total resolvers queried.
    pub total_count: usize,
    /// Propagation percentage (0-100).
    pub ratio: f32,
}

impl PropagationResult {
    /// The ratio rendered to one decimal place (e.g. `"66.7"`).
    pub fn ratio_percent(&self) -> String {
        format!("{:.1}", self.ratio)
    }
}

/// Verdict for a single probed port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    Open,
    Closed,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Result of probing a single port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortProbeResult {
    /// Probed port.
    pub port: u16,
    /// Open or closed verdict.
    pub status: PortStatus,
    /// Well-known service name, `"Unknown"` when not in the table.
    pub service: String,
    /// Time to open in milliseconds; absent for closed ports.
    pub response_time_ms: Option<u64>,
}

/// Full port scan result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortScanReport {
    /// Scan target as supplied.
    pub target: String,
    /// Per-port results in ascending port order.
    pub results: Vec<PortProbeResult>,
    /// Number of ports that probed open.
    pub open_count: usize,
    /// Total ports probed.
    pub total_count: usize,
    /// Total wall-clock time in milliseconds.
    pub total_time_ms: u64,
}

/// Scan progress snapshot, recomputed after each individual probe completes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanProgress {
    /// Ports settled so far.
    pub completed: usize,
    /// Total ports in the scan.
    pub total: usize,
}

/// A validated, deduplicated, ascending port list.
///
/// Constructed only through [`PortSpec::parse`], which enforces the
/// [`MAX_PORTS_PER_SCAN`] and [`MAX_RANGE_SPAN`] bounds.
#[derive(Debug, Clone)]
pub struct PortSpec {
    ports: Vec<u16>,
    diagnostics: Vec<String>,
}

impl PortSpec {
    /// Parse a comma-separated port expression.
    ///
    /// Each token is either a single integer in `[1, 65535]` or a range
    /// `a-b` with `a <= b`, both in range. A well-formed range spanning more
    /// than [`MAX_RANGE_SPAN`] ports is rejected whole with a recorded
    /// diagnostic, while the remaining tokens continue to parse. Malformed
    /// tokens are skipped. The final list is deduplicated and sorted
    /// ascending.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when no token yields a valid port; `TooManyPorts` when
    /// the final list exceeds [`MAX_PORTS_PER_SCAN`] entries.
    pub fn parse(expression: &str) -> EngineResult<Self> {
        let mut ports: Vec<u16> = Vec::new();
        let mut diagnostics: Vec<String> = Vec::new();

        for token in expression.split(',') {
            let token = token.trim();
            if let Some((start, end)) = token.split_once('-') {
                let Some(start) = parse_port(start.trim()) else {
                    continue;
                };
                let Some(end) = parse_port(end.trim()) else {
                    continue;
                };
                if start > end {
                    continue;
                }
                let span = usize::from(end - start) + 1;
                if span > MAX_RANGE_SPAN {
                    diagnostics.push(format!(
                        "range {start}-{end} covers {span} ports, limit is {MAX_RANGE_SPAN} per range"
                    ));
                    continue;
                }
                ports.extend(start..=end);
            } else if let Some(port) = parse_port(token) {
                ports.push(port);
            }
        }

        ports.sort_unstable();
        ports.dedup();

        if ports.is_empty() {
            return Err(EngineError::InvalidInput(format!(
                "no valid ports in {expression:?}"
            )));
        }
        if ports.len() > MAX_PORTS_PER_SCAN {
            return Err(EngineError::TooManyPorts(format!(
                "{} ports requested, limit is {MAX_PORTS_PER_SCAN} per scan",
                ports.len()
            )));
        }

        Ok(Self { ports, diagnostics })
    }

    /// The validated ports, deduplicated and ascending.
    pub fn ports(&self) -> &[u16] {
        &self.ports
    }

    /// Diagnostics recorded for rejected range tokens.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Number of ports in the spec.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Always false: parsing rejects empty specs.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

/// Parse a single port token into `[1, 65535]`, `None` when out of range or
/// malformed.
fn parse_port(token: &str) -> Option<u16> {
    token.parse::<u32>().ok().and_then(|n| {
        if (1..=65535).contains(&n) {
            // u32 -> u16: bounds checked above
            #[allow(clippy::cast_possible_truncation)]
            Some(n as u16)
        } else {
            None
        }
    })
}

/// IP metadata report from the ipinfo.io lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpInfoReport {
    /// The looked-up IP address.
    pub ip: String,
    /// Owning organisation / ISP, `"N/A"` when absent.
    pub org: String,
    /// Country code, `"N/A"` when absent.
    pub country: String,
    /// Region name, `"N/A"` when absent.
    pub region: String,
    /// Detail page URL for the address.
    pub details_url: String,
}

/// Outcome of one record-type query within a domain lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSetOutcome {
    /// Queried record type.
    pub record_type: RecordType,
    /// Query outcome.
    pub outcome: DnsOutcome,
}

/// Multi-record-type lookup result for a single domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecordsReport {
    /// Queried domain.
    pub domain: String,
    /// Per-type outcomes in fixed type order (A, AAAA, MX, NS, TXT).
    pub records: Vec<RecordSetOutcome>,
}

/// Reverse DNS lookup result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseLookupReport {
    /// The looked-up IP address.
    pub ip: String,
    /// The `.in-addr.arpa` / `.ip6.arpa` query name that was issued.
    pub query: String,
    /// First PTR answer, `None` when there is no record or the query failed.
    pub hostname: Option<String>,
}
