//! Dot-decimal IPv4 helpers used by sorting and validation.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

/// Four 0–255 octets. Up to three digits per octet, so `010.001.000.255`
/// is accepted the way the inventory forms always have.
#[allow(clippy::unwrap_used)]
static IPV4_RE: LazyLock<Regex> = LazyLock::new(|| {
    let octet = r"(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)";
    Regex::new(&format!(r"^{octet}\.{octet}\.{octet}\.{octet}$")).unwrap()
});

/// Whether `value` is a well-formed dotted IPv4 address. Empty is allowed.
pub fn is_valid_ipv4(value: &str) -> bool {
    value.is_empty() || IPV4_RE.is_match(value)
}

/// Sort key of a possibly malformed address.
///
/// Missing or empty values are `0.0.0.0`. Each of the first four
/// `.`-separated parts is trimmed and parsed; a part that is absent or
/// fails to parse counts as `0`, which keeps the comparator a total order.
pub fn octets(value: Option<&str>) -> [u64; 4] {
    let mut out = [0; 4];
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        for (slot, part) in out.iter_mut().zip(value.split('.')) {
            *slot = part.trim().parse().unwrap_or(0);
        }
    }
    out
}

/// Octet-by-octet comparison (not a 32-bit compare).
pub fn compare_ip(a: Option<&str>, b: Option<&str>) -> Ordering {
    octets(a).cmp(&octets(b))
}
