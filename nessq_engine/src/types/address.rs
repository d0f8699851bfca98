//! Binary ordering of host addresses
//!
//! IPv4 addresses are compared in their IPv6-mapped form so that mixed
//! collections still have a total order. Strings that are not addresses sort
//! before every address and among themselves lexically.

use std::cmp::Ordering;
use std::net::IpAddr;

fn address_octets(ip: &str) -> Option<[u8; 16]> {
    match ip.trim().parse::<IpAddr>().ok()? {
        IpAddr::V4(v4) => Some(v4.to_ipv6_mapped().octets()),
        IpAddr::V6(v6) => Some(v6.octets()),
    }
}

pub fn compare_addresses(a: &str, b: &str) -> Ordering {
    address_octets(a)
        .cmp(&address_octets(b))
        .then_with(|| a.cmp(b))
}
