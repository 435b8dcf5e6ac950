//! Per-AS link subnet bookkeeping.
//!
//! Each autonomous system hands out /126 blocks from its link prefix with its
//! own strictly increasing block index, so blocks within one AS never overlap
//! and never get reused.

use crate::error::ResolveError;
use crate::utils::ip_utils::nth_subnet;
use ipnet::Ipv6Net;
use std::collections::HashMap;

/// Prefix length of a point-to-point block
pub const LINK_PREFIX_LEN: u8 = 126;

/// Hands out consecutive /126 blocks per AS
#[derive(Debug, Default)]
pub struct AsSubnetManager {
    subnet_counters: HashMap<u32, u128>,
}

impl AsSubnetManager {
    pub fn new() -> Self {
        AsSubnetManager::default()
    }

    /// Carve the next unused /126 out of `prefix` on behalf of `asn`
    pub fn next_link_subnet(&mut self, asn: u32, prefix: &Ipv6Net) -> Result<Ipv6Net, ResolveError> {
        let counter = self.subnet_counters.entry(asn).or_insert(0);
        let subnet = nth_subnet(prefix, LINK_PREFIX_LEN, *counter).ok_or(
            ResolveError::AddressExhausted {
                prefix: *prefix,
                purpose: "point-to-point links",
            },
        )?;
        *counter += 1;
        Ok(subnet)
    }

    /// Number of blocks handed out for `asn` so far
    pub fn allocated(&self, asn: u32) -> u128 {
        self.subnet_counters.get(&asn).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_are_consecutive_per_as() {
        let mut manager = AsSubnetManager::new();
        let p1: Ipv6Net = "2001:db8:1::/64".parse().unwrap();
        let p2: Ipv6Net = "2001:db8:2::/64".parse().unwrap();

        assert_eq!(manager.next_link_subnet(1, &p1).unwrap().to_string(), "2001:db8:1::/126");
        assert_eq!(manager.next_link_subnet(2, &p2).unwrap().to_string(), "2001:db8:2::/126");
        assert_eq!(manager.next_link_subnet(1, &p1).unwrap().to_string(), "2001:db8:1::4/126");
        assert_eq!(manager.allocated(1), 2);
        assert_eq!(manager.allocated(2), 1);
        assert_eq!(manager.allocated(3), 0);
    }

    #[test]
    fn test_exhaustion_is_reported() {
        let mut manager = AsSubnetManager::new();
        let small: Ipv6Net = "2001:db8::/125".parse().unwrap();

        assert!(manager.next_link_subnet(1, &small).is_ok());
        assert!(manager.next_link_subnet(1, &small).is_ok());
        let err = manager.next_link_subnet(1, &small).unwrap_err();
        assert!(matches!(err, ResolveError::AddressExhausted { prefix, .. } if prefix == small));
        // A failed request does not consume an index
        assert_eq!(manager.allocated(1), 2);
    }
}
