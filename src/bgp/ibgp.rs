//! iBGP full-mesh synthesis.
//!
//! In an AS whose IGP is iBGP every router peers with every other router of
//! the AS on its loopback. Entries already present are left alone, so running
//! the synthesis twice yields the same blocks.

use crate::error::ResolveError;
use crate::topology::{BgpNeighbor, IgpKind, Topology};
use log::{debug, info};
use std::net::Ipv6Addr;

/// Add the full mesh for every iBGP autonomous system
pub fn synthesize_ibgp(mut topology: Topology) -> Result<Topology, ResolveError> {
    for autonomous_system in &mut topology.autonomous_systems {
        match autonomous_system.igp {
            IgpKind::Ibgp => {}
            IgpKind::Ospf | IgpKind::Rip => continue,
        }

        let asn = autonomous_system.number;
        let loopbacks = autonomous_system
            .routers
            .iter()
            .map(|router| {
                router.loopback.ok_or_else(|| ResolveError::MissingLoopback {
                    router: router.reference().to_string(),
                })
            })
            .collect::<Result<Vec<Ipv6Addr>, _>>()?;

        let mut added = 0usize;
        for (index, router) in autonomous_system.routers.iter_mut().enumerate() {
            let block = router.bgp_block();
            for (_, address) in loopbacks.iter().enumerate().filter(|(other, _)| *other != index) {
                let neighbor = BgpNeighbor {
                    address: *address,
                    remote_as: asn,
                };
                if block.add_neighbor(neighbor) {
                    added += 1;
                }
            }
            debug!("{}:{} has {} BGP neighbours", asn, block.router_id, block.neighbors.len());
        }

        info!(
            "AS {}: iBGP full mesh over {} routers ({} new sessions)",
            asn,
            loopbacks.len(),
            added
        );
    }

    Ok(topology)
}
