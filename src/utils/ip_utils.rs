//! IPv6 prefix arithmetic shared by the allocators.

use ipnet::Ipv6Net;
use std::net::Ipv6Addr;

/// Number of addresses covered by a prefix, saturating at `u128::MAX` for `::/0`
pub fn address_count(prefix: &Ipv6Net) -> u128 {
    match 128 - u32::from(prefix.prefix_len()) {
        128 => u128::MAX,
        host_bits => 1u128 << host_bits,
    }
}

/// The address `offset` positions after the network address, if it lies inside the prefix
pub fn nth_address(prefix: &Ipv6Net, offset: u128) -> Option<Ipv6Addr> {
    if offset >= address_count(prefix) {
        return None;
    }
    let base = u128::from(prefix.network());
    base.checked_add(offset).map(Ipv6Addr::from)
}

/// Same as [`nth_address`], keeping the prefix length (`addr/len`)
pub fn nth_host(prefix: &Ipv6Net, offset: u128) -> Option<Ipv6Net> {
    nth_address(prefix, offset).and_then(|addr| Ipv6Net::new(addr, prefix.prefix_len()).ok())
}

/// The `index`-th sub-block of length `sub_len` inside `prefix`
pub fn nth_subnet(prefix: &Ipv6Net, sub_len: u8, index: u128) -> Option<Ipv6Net> {
    if sub_len > 128 || sub_len < prefix.prefix_len() {
        return None;
    }
    let block_size = match 128 - u32::from(sub_len) {
        128 => return None,
        host_bits => 1u128 << host_bits,
    };
    let offset = index.checked_mul(block_size)?;
    let start = nth_address(prefix, offset)?;
    Ipv6Net::new(start, sub_len).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> Ipv6Net {
        s.parse().unwrap()
    }

    #[test]
    fn test_address_count() {
        assert_eq!(address_count(&net("2001:db8::/126")), 4);
        assert_eq!(address_count(&net("2001:db8::/128")), 1);
        assert_eq!(address_count(&net("2001:db8::/64")), 1u128 << 64);
        assert_eq!(address_count(&net("::/0")), u128::MAX);
    }

    #[test]
    fn test_nth_address_bounds() {
        let prefix = net("2001:db8::/126");
        assert_eq!(nth_address(&prefix, 0), Some("2001:db8::".parse().unwrap()));
        assert_eq!(nth_address(&prefix, 3), Some("2001:db8::3".parse().unwrap()));
        assert_eq!(nth_address(&prefix, 4), None);
        assert_eq!(nth_host(&prefix, 2).unwrap().to_string(), "2001:db8::2/126");
    }

    #[test]
    fn test_nth_subnet() {
        let prefix = net("2001:db8:100::/124");
        assert_eq!(nth_subnet(&prefix, 126, 0).unwrap().to_string(), "2001:db8:100::/126");
        assert_eq!(nth_subnet(&prefix, 126, 1).unwrap().to_string(), "2001:db8:100::4/126");
        assert_eq!(nth_subnet(&prefix, 126, 3).unwrap().to_string(), "2001:db8:100::c/126");
        assert_eq!(nth_subnet(&prefix, 126, 4), None);
        assert_eq!(nth_subnet(&net("2001:db8::/127"), 126, 0), None);
    }
}
