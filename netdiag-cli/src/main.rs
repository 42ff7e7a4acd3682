//! Command-line front end for the netdiag diagnostics engine.
//!
//! A thin presenter: parses arguments, initializes logging, calls the
//! engine façade, and renders the structured results either as text or as
//! JSON. No diagnostic logic lives here.

mod cmd;

use anyhow::{Context, Result, anyhow};
use log::warn;

use netdiag_engine::{
    DiagnosticsService, DomainRecordsReport, IpInfoReport, PortScanReport, PropagationResult,
    RecordType, ReverseLookupReport, ScanProgress,
};

use cmd::{CommandLine, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = CommandLine::parse_args();
    match cli.command {
        Commands::Ip { ip } => run_ip(ip.as_deref(), cli.json).await,
        Commands::Lookup { domain } => run_lookup(&domain, cli.json).await,
        Commands::Propagation {
            domain,
            record_type,
        } => run_propagation(&domain, &record_type, cli.json).await,
        Commands::Scan { target, ports } => run_scan(&target, &ports, cli.json).await,
        Commands::Reverse { ip } => run_reverse(&ip, cli.json).await,
    }
}

async fn run_ip(ip: Option<&str>, json: bool) -> Result<()> {
    let info = DiagnosticsService::ip_info(ip)
        .await
        .context("IP info lookup failed")?;

    // Reverse DNS is best-effort here; a failure is reported, not fatal
    let reverse = match DiagnosticsService::reverse_lookup(&info.ip).await {
        Ok(report) => Some(report),
        Err(e) => {
            warn!("reverse DNS lookup skipped: {e}");
            None
        }
    };

    if json {
        let value = serde_json::json!({ "info": info, "reverse": reverse });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_ip(&info, reverse.as_ref());
    }
    Ok(())
}

async fn run_lookup(domain: &str, json: bool) -> Result<()> {
    let report = DiagnosticsService::dns_lookup(domain)
        .await
        .context("DNS lookup failed")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_lookup(&report);
    }
    Ok(())
}

async fn run_propagation(domain: &str, record_type: &str, json: bool) -> Result<()> {
    let record_type: RecordType = record_type.parse().map_err(|e: String| anyhow!(e))?;
    let result = DiagnosticsService::propagation_check(domain, record_type)
        .await
        .context("propagation check failed")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_propagation(&result);
    }
    Ok(())
}

async fn run_scan(target: &str, ports: &str, json: bool) -> Result<()> {
    // Surface range diagnostics before scanning starts
    let spec = DiagnosticsService::parse_ports(ports).context("invalid port expression")?;
    for diagnostic in spec.diagnostics() {
        eprintln!("warning: {diagnostic}");
    }

    let on_progress = |progress: ScanProgress| {
        if !json {
            eprint!("\r{} / {} ports done", progress.completed, progress.total);
        }
    };

    let report = DiagnosticsService::port_scan(target, ports, on_progress)
        .await
        .context("port scan failed")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        eprintln!();
        print_scan(&report);
    }
    Ok(())
}

async fn run_reverse(ip: &str, json: bool) -> Result<()> {
    let report = DiagnosticsService::reverse_lookup(ip)
        .await
        .context("reverse DNS lookup failed")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("query   : {}", report.query);
        println!(
            "hostname: {}",
            report.hostname.as_deref().unwrap_or("no reverse record")
        );
    }
    Ok(())
}

fn print_ip(info: &IpInfoReport, reverse: Option<&ReverseLookupReport>) {
    let hostname = reverse
        .and_then(|r| r.hostname.as_deref())
        .unwrap_or("no reverse record");
    println!("IP address : {}", info.ip);
    println!("Reverse DNS: {hostname}");
    println!("ISP        : {}", info.org);
    println!("Country    : {}", info.country);
    println!("Region     : {}", info.region);
    println!("Details    : {}", info.details_url);
}

fn print_lookup(report: &DomainRecordsReport) {
    println!("{}", report.domain);
    for record_set in &report.records {
        println!("{} records:", record_set.record_type);
        for line in record_set.outcome.summary().lines() {
            println!("  {line}");
        }
    }
}

fn print_propagation(result: &PropagationResult) {
    println!(
        "{} {} records: resolved on {}/{} resolvers ({}%)",
        result.domain,
        result.record_type,
        result.propagated_count,
        result.total_count,
        result.ratio_percent()
    );
    for entry in &result.per_resolver {
        let status = if entry.outcome.is_propagated() {
            "resolved"
        } else {
            "-"
        };
        println!(
            "  [{}] {:<14} {:<9} {:>5}ms  {}",
            entry.resolver.country_code,
            entry.resolver.name,
            status,
            entry.response_time_ms,
            entry.outcome.summary().replace('\n', ", ")
        );
    }
}

fn print_scan(report: &PortScanReport) {
    println!(
        "{}: {}/{} ports open ({}ms)",
        report.target, report.open_count, report.total_count, report.total_time_ms
    );
    for result in &report.results {
        let time = result
            .response_time_ms
            .map_or_else(|| "-".to_string(), |ms| format!("{ms}ms"));
        println!(
            "  {:>5}  {:<10} {:<7} {time}",
            result.port, result.service, result.status
        );
    }
}
