//! Concurrent network diagnostics engine.
//!
//! Issues many independent, timeout-bounded network operations — DNS-over-
//! HTTPS lookups fanned across multiple resolvers, batched TCP-reachability
//! probes across multiple ports — and aggregates per-operation outcomes into
//! typed reports. Per-item failures are captured, never fatal to a batch.
//! All operations are stateless; see [`DiagnosticsService`].

mod error;
mod services;
mod types;

pub use error::{EngineError, EngineResult};
pub use services::DiagnosticsService;
pub use services::address;
pub use types::{
    Address, DnsOutcome, DnsResolver, DomainRecordsReport, IpInfoReport, MAX_PORTS_PER_SCAN,
    MAX_RANGE_SPAN, PortProbeResult, PortScanReport, PortSpec, PortStatus, PropagationResult,
    RecordSetOutcome, RecordType, ResolverOutcome, ReverseLookupReport, ScanProgress,
};
