//! Well-known string formats.

use regex::Regex;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use std::sync::LazyLock;
use url::Url;

static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid pattern compiles")
});

// Base for resolving relative URI references.
static URI_REF_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("http://localhost/").expect("base url parses"));

/// A well-known string format understood by [`Rule::Format`](super::Rule::Format).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnown {
    /// Hyphenated hexadecimal UUID.
    Uuid,
    /// Email address, optionally in `Name <addr>` form.
    Email,
    /// RFC 1034 hostname.
    Hostname,
    /// Absolute URI.
    Uri,
    /// Absolute or relative URI reference.
    UriRef,
    /// Hostname or IP address.
    Address,
    /// IPv4 or IPv6 address.
    Ip,
    /// IPv4 address.
    Ipv4,
    /// IPv6 address.
    Ipv6,
    /// IPv4 or IPv6 address with prefix length (CIDR).
    IpPrefix,
    /// IPv4 address with prefix length.
    Ipv4Prefix,
    /// IPv6 address with prefix length.
    Ipv6Prefix,
}

impl WellKnown {
    /// Whether `value` is in this format.
    pub fn check(self, value: &str) -> bool {
        match self {
            WellKnown::Uuid => is_uuid(value),
            WellKnown::Email => is_email(value),
            WellKnown::Hostname => is_hostname(value),
            WellKnown::Uri => is_uri(value),
            WellKnown::UriRef => is_uri_ref(value),
            WellKnown::Address => is_address(value),
            WellKnown::Ip => is_ip(value),
            WellKnown::Ipv4 => is_ipv4(value),
            WellKnown::Ipv6 => is_ipv6(value),
            WellKnown::IpPrefix => is_ip_prefix(value),
            WellKnown::Ipv4Prefix => is_ipv4_prefix(value),
            WellKnown::Ipv6Prefix => is_ipv6_prefix(value),
        }
    }

    /// Canonical failure reason.
    pub fn reason(self) -> &'static str {
        match self {
            WellKnown::Uuid => "value must be a valid UUID",
            WellKnown::Email => "value must be a valid email address",
            WellKnown::Hostname => "value must be a valid hostname",
            WellKnown::Uri | WellKnown::UriRef => "value must be a valid URI",
            WellKnown::Address => "value must be a valid hostname, or ip address",
            WellKnown::Ip => "value must be a valid IP address",
            WellKnown::Ipv4 => "value must be a valid IPv4 address",
            WellKnown::Ipv6 => "value must be a valid IPv6 address",
            WellKnown::IpPrefix => "value must be a valid IP prefix",
            WellKnown::Ipv4Prefix => "value must be a valid IPv4 prefix",
            WellKnown::Ipv6Prefix => "value must be a valid IPv6 prefix",
        }
    }
}

/// Hyphenated UUID, any case.
pub fn is_uuid(value: &str) -> bool {
    UUID_PATTERN.is_match(value)
}

/// Email address. Accepts the `Name <local@domain>` form.
pub fn is_email(value: &str) -> bool {
    let addr = match (value.rfind('<'), value.strip_suffix('>')) {
        (Some(open), Some(inner)) => &inner[open + 1..],
        _ => value,
    };
    if addr.len() > 254 {
        return false;
    }
    let Some((local, domain)) = addr.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && local.len() <= 64
        && !local
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '@'))
        && is_hostname(domain)
}

/// Hostname: dot separated labels of ASCII letters, digits and hyphens.
pub fn is_hostname(value: &str) -> bool {
    let host = value.strip_suffix('.').unwrap_or(value);
    if host.is_empty() || host.len() > 253 {
        return false;
    }
    host.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}

/// Absolute URI.
pub fn is_uri(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// Absolute URI or relative reference.
pub fn is_uri_ref(value: &str) -> bool {
    is_uri(value) || URI_REF_BASE.join(value).is_ok()
}

/// Hostname or IP address.
pub fn is_address(value: &str) -> bool {
    is_ip(value) || is_hostname(value)
}

/// IPv4 or IPv6 address.
pub fn is_ip(value: &str) -> bool {
    IpAddr::from_str(value).is_ok()
}

/// IPv4 address.
pub fn is_ipv4(value: &str) -> bool {
    Ipv4Addr::from_str(value).is_ok()
}

/// IPv6 address.
pub fn is_ipv6(value: &str) -> bool {
    Ipv6Addr::from_str(value).is_ok()
}

/// `addr/len` for either address family.
pub fn is_ip_prefix(value: &str) -> bool {
    is_ipv4_prefix(value) || is_ipv6_prefix(value)
}

/// IPv4 `addr/len` with `len <= 32`.
pub fn is_ipv4_prefix(value: &str) -> bool {
    split_prefix(value).is_some_and(|(addr, len)| is_ipv4(addr) && len <= 32)
}

/// IPv6 `addr/len` with `len <= 128`.
pub fn is_ipv6_prefix(value: &str) -> bool {
    split_prefix(value).is_some_and(|(addr, len)| is_ipv6(addr) && len <= 128)
}

fn split_prefix(value: &str) -> Option<(&str, u8)> {
    let (addr, len) = value.split_once('/')?;
    if len.is_empty() || len.len() > 3 || !len.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    len.parse().ok().map(|len| (addr, len))
}
