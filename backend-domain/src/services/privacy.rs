// IP privacy helpers
// The masked form is the only form that may be persisted or logged.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Mask a client IP for storage. IPv4 keeps the first two octets, IPv6 the
/// first two groups; everything else becomes `*`. Unparseable input is
/// masked entirely.
pub fn mask_ip(ip: &str) -> String {
    let trimmed = ip.trim();
    if trimmed.contains(':') {
        let groups: Vec<&str> = trimmed.split(':').collect();
        return groups
            .iter()
            .enumerate()
            .map(|(idx, group)| if idx < 2 { *group } else { "*" })
            .collect::<Vec<_>>()
            .join(":");
    }
    let octets: Vec<&str> = trimmed.split('.').collect();
    if octets.len() != 4 {
        return "*".to_string();
    }
    format!("{}.{}.*.*", octets[0], octets[1])
}

/// Loopback and private-range clients (RFC1918, IPv6 loopback, and their
/// IPv4-mapped IPv6 forms) never reach the geolocation provider.
pub fn is_private_or_loopback(ip: &str) -> bool {
    match ip.trim().parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => is_private_v4(v4),
        Ok(IpAddr::V6(v6)) => is_private_v6(v6),
        // Not an address we can classify; treat it as local rather than
        // leak it to an external service.
        Err(_) => true,
    }
}

fn is_private_v4(ip: Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified()
}

fn is_private_v6(ip: Ipv6Addr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() {
        return true;
    }
    if let Some(mapped) = ip.to_ipv4_mapped() {
        return is_private_v4(mapped);
    }
    // fc00::/7 unique-local and fe80::/10 link-local
    let first = ip.segments()[0];
    (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_mask_keeps_first_two_octets() {
        assert_eq!(mask_ip("203.0.113.7"), "203.0.*.*");
        assert_eq!(mask_ip("10.1.2.3"), "10.1.*.*");
    }

    #[test]
    fn ipv6_mask_keeps_first_two_groups() {
        assert_eq!(
            mask_ip("2001:db8:85a3:0:0:8a2e:370:7334"),
            "2001:db8:*:*:*:*:*:*"
        );
        assert_eq!(mask_ip("2001:db8::1"), "2001:db8:*:*");
    }

    #[test]
    fn garbage_is_fully_masked() {
        assert_eq!(mask_ip("not-an-ip"), "*");
    }

    #[test]
    fn rfc1918_ranges_are_private() {
        assert!(is_private_or_loopback("10.0.0.1"));
        assert!(is_private_or_loopback("172.16.0.1"));
        assert!(is_private_or_loopback("172.31.255.254"));
        assert!(is_private_or_loopback("192.168.1.10"));
        assert!(is_private_or_loopback("127.0.0.1"));
        assert!(!is_private_or_loopback("172.32.0.1"));
        assert!(!is_private_or_loopback("8.8.8.8"));
    }

    #[test]
    fn ipv6_loopback_and_mapped_forms_are_private() {
        assert!(is_private_or_loopback("::1"));
        assert!(is_private_or_loopback("::ffff:192.168.1.1"));
        assert!(is_private_or_loopback("fd12:3456:789a::1"));
        assert!(!is_private_or_loopback("2606:4700:4700::1111"));
    }
}
