use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "netdiag")]
#[command(about = "Network diagnostics: IP info, DNS lookups, propagation checks, port probes.")]
pub struct CommandLine {
    /// Emit structured JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show IP metadata and reverse DNS (own address when no IP is given)
    Ip { ip: Option<String> },
    /// Resolve A, AAAA, MX, NS, and TXT records for a domain
    Lookup { domain: String },
    /// Check DNS propagation for a domain across global resolvers
    Propagation {
        domain: String,
        /// Record type to check (A, AAAA, MX, NS, TXT, PTR)
        #[arg(short = 't', long, default_value = "A")]
        record_type: String,
    },
    /// Probe TCP reachability of up to 5 ports on a public target
    Scan {
        target: String,
        /// Comma-separated ports, e.g. "80,443" or "8080-8084"
        ports: String,
    },
    /// Look up the PTR record for an IP address
    Reverse { ip: String },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
