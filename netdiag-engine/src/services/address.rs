//! Syntactic address classification and reverse-lookup name construction.
//!
//! Everything here is pure string work: no resolution, no I/O. The IPv4 and
//! IPv6 patterns are deliberately permissive (octets are not bounded to
//! 0-255, and the compressed IPv6 pattern admits some malformed strings);
//! downstream probes fail honestly at connect time instead.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::Address;

/// Compile a hardcoded pattern.
#[allow(clippy::expect_used)]
fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("hardcoded pattern compiles")
}

/// Four dot-separated groups of 1-3 decimal digits.
static IPV4: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\d{1,3}\.){3}\d{1,3}$"));

/// Full 8-group hextet form, plus the literal loopback/unspecified forms.
static IPV6_FULL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^([0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}$|^::1$|^::$"));

/// Any `::`-compressed form. Looser than RFC 4291; kept that way.
static IPV6_COMPRESSED: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^([0-9a-fA-F]{0,4}:){0,7}:([0-9a-fA-F]{0,4}:){0,7}[0-9a-fA-F]{0,4}$")
});

/// Label-wise hostname syntax: alphanumeric labels up to 63 characters with
/// internal hyphens, dot-separated.
static DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
});

/// Private IPv4 prefixes: 127.0.0.0/8, 10.0.0.0/8, 172.16.0.0/12,
/// 192.168.0.0/16.
static PRIVATE_V4: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^(127\.|10\.|172\.(1[6-9]|2[0-9]|3[01])\.|192\.168\.)"));

/// Whether the string is IPv4-shaped.
///
/// Octets are not range-checked, so `999.999.999.999` passes.
pub fn is_ipv4(s: &str) -> bool {
    IPV4.is_match(s)
}

/// Whether the string is IPv6-shaped (full or compressed form).
pub fn is_ipv6(s: &str) -> bool {
    IPV6_FULL.is_match(s) || IPV6_COMPRESSED.is_match(s)
}

/// Whether the string is a syntactically valid hostname.
pub fn is_valid_domain(s: &str) -> bool {
    DOMAIN.is_match(s)
}

/// Classify an input string. Pure and total; IPv4 wins over domain syntax
/// for dotted-digit strings.
pub fn classify(s: &str) -> Address {
    if is_ipv4(s) {
        Address::Ipv4
    } else if is_ipv6(s) {
        Address::Ipv6
    } else if is_valid_domain(s) {
        Address::Domain
    } else {
        Address::Invalid
    }
}

/// Whether the target is a private or loopback address.
///
/// The check is syntactic only: `localhost`, `::1`, and the private IPv4
/// prefixes. A domain name that merely *resolves* to a private address is
/// not caught here.
pub fn is_private_target(target: &str) -> bool {
    if target.eq_ignore_ascii_case("localhost") || target == "::1" {
        return true;
    }
    PRIVATE_V4.is_match(target)
}

/// Expand a compressed IPv6 literal to 8 zero-padded 4-hex-digit groups.
///
/// The single `::` run is filled with the number of all-zero groups needed
/// to reach 8; output is truncated or padded to exactly 8 groups.
pub fn expand_ipv6(ip: &str) -> String {
    let mut groups: Vec<String> = if let Some((head, tail)) = ip.split_once("::") {
        let left: Vec<&str> = head.split(':').filter(|g| !g.is_empty()).collect();
        let right: Vec<&str> = tail.split(':').filter(|g| !g.is_empty()).collect();
        let fill = 8usize.saturating_sub(left.len() + right.len());
        left.iter()
            .map(|g| pad_group(g))
            .chain(std::iter::repeat_n("0000".to_string(), fill))
            .chain(right.iter().map(|g| pad_group(g)))
            .collect()
    } else {
        ip.split(':').map(pad_group).collect()
    };
    groups.resize(8, "0000".to_string());
    groups.truncate(8);
    groups.join(":")
}

/// Zero-pad a hextet group to 4 lowercase hex digits.
fn pad_group(group: &str) -> String {
    format!("{:0>4}", group.to_lowercase())
}

/// Build the reverse-lookup query name for an IP address.
///
/// IPv4: reversed dotted octets + `.in-addr.arpa`. IPv6: expanded nibble
/// string reversed, dot-joined + `.ip6.arpa`.
pub fn reverse_lookup_name(ip: &str) -> String {
    if is_ipv4(ip) {
        let mut octets: Vec<&str> = ip.split('.').collect();
        octets.reverse();
        format!("{}.in-addr.arpa", octets.join("."))
    } else {
        let nibbles: String = expand_ipv6(ip)
            .chars()
            .filter(|c| *c != ':')
            .rev()
            .map(|c| format!("{c}."))
            .collect();
        format!("{nibbles}ip6.arpa")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== classification tests ====================

    #[test]
    fn test_is_ipv4_basic() {
        assert!(is_ipv4("8.8.8.8"));
        assert!(is_ipv4("192.168.1.1"));
        assert!(!is_ipv4("8.8.8"));
        assert!(!is_ipv4("8.8.8.8.8"));
        assert!(!is_ipv4("a.b.c.d"));
    }

    #[test]
    fn test_is_ipv4_permissive_octets() {
        // Octet ranges are deliberately not validated
        assert!(is_ipv4("999.999.999.999"));
        assert!(is_ipv4("256.1.1.1"));
    }

    #[test]
    fn test_is_ipv6_forms() {
        assert!(is_ipv6("2001:0db8:0000:0000:0000:0000:0000:0001"));
        assert!(is_ipv6("2001:db8::1"));
        assert!(is_ipv6("::1"));
        assert!(is_ipv6("::"));
        assert!(is_ipv6("fe80::1"));
        assert!(!is_ipv6("example.com"));
        assert!(!is_ipv6("8.8.8.8"));
    }

    #[test]
    fn test_is_valid_domain() {
        assert!(is_valid_domain("example.com"));
        assert!(is_valid_domain("sub.example.co.jp"));
        assert!(is_valid_domain("my-host.example.com"));
        assert!(is_valid_domain("localhost"));
        assert!(!is_valid_domain("-bad.example.com"));
        assert!(!is_valid_domain("bad-.example.com"));
        assert!(!is_valid_domain(""));
        assert!(!is_valid_domain("exa mple.com"));
    }

    #[test]
    fn test_classify_precedence() {
        assert_eq!(classify("8.8.8.8"), Address::Ipv4);
        // IPv4 shape wins over domain syntax
        assert_eq!(classify("999.999.999.999"), Address::Ipv4);
        assert_eq!(classify("::1"), Address::Ipv6);
        assert_eq!(classify("example.com"), Address::Domain);
        assert_eq!(classify("!nope"), Address::Invalid);
        assert_eq!(classify(""), Address::Invalid);
    }

    // ==================== privacy tests ====================

    #[test]
    fn test_private_targets() {
        for target in ["127.0.0.1", "10.0.0.5", "172.16.0.1", "172.31.200.1", "192.168.1.1"] {
            assert!(is_private_target(target), "{target} should be private");
        }
        assert!(is_private_target("localhost"));
        assert!(is_private_target("LocalHost"));
        assert!(is_private_target("::1"));
    }

    #[test]
    fn test_public_targets() {
        for target in ["8.8.8.8", "1.1.1.1", "172.15.0.1", "172.32.0.1", "example.com"] {
            assert!(!is_private_target(target), "{target} should not be private");
        }
    }

    // ==================== expansion tests ====================

    #[test]
    fn test_expand_ipv6_loopback() {
        assert_eq!(expand_ipv6("::1"), "0000:0000:0000:0000:0000:0000:0000:0001");
    }

    #[test]
    fn test_expand_ipv6_compressed_middle() {
        assert_eq!(
            expand_ipv6("2001:db8::1"),
            "2001:0db8:0000:0000:0000:0000:0000:0001"
        );
    }

    #[test]
    fn test_expand_ipv6_unspecified() {
        assert_eq!(expand_ipv6("::"), "0000:0000:0000:0000:0000:0000:0000:0000");
    }

    #[test]
    fn test_expand_ipv6_full_form_padded() {
        assert_eq!(
            expand_ipv6("2001:DB8:0:0:0:0:0:1"),
            "2001:0db8:0000:0000:0000:0000:0000:0001"
        );
    }

    // ==================== reverse name tests ====================

    #[test]
    fn test_reverse_lookup_name_ipv4() {
        assert_eq!(reverse_lookup_name("8.8.8.8"), "8.8.8.8.in-addr.arpa");
        assert_eq!(reverse_lookup_name("1.2.3.4"), "4.3.2.1.in-addr.arpa");
    }

    #[test]
    fn test_reverse_lookup_name_ipv6() {
        let name = reverse_lookup_name("::1");
        assert!(name.ends_with(".ip6.arpa"));
        assert!(name.starts_with("1.0.0.0."));
        // 32 nibbles, each followed by a dot, plus the suffix
        assert_eq!(name.matches('.').count(), 34);
    }

    #[test]
    fn test_reverse_lookup_name_ipv6_ordering() {
        let name = reverse_lookup_name("2001:db8::1");
        assert!(name.starts_with("1.0.0.0."));
        assert!(name.contains("8.b.d.0.1.0.0.2.ip6.arpa"));
    }
}
