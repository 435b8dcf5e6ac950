//! Loopback address allocation.
//!
//! Routers receive `network + 1`, `network + 2`, ... from their AS's loopback
//! prefix in declaration order. The network address itself is never used.
//! Reordering routers in the input reorders the assignments.

use crate::error::ResolveError;
use crate::topology::Topology;
use crate::utils::ip_utils::nth_address;
use log::{debug, info};

/// Assign every router a loopback from its AS's prefix
pub fn allocate_loopbacks(mut topology: Topology) -> Result<Topology, ResolveError> {
    for autonomous_system in &mut topology.autonomous_systems {
        let prefix = autonomous_system.loopback_prefix;

        for (index, router) in autonomous_system.routers.iter_mut().enumerate() {
            let offset = index as u128 + 1;
            let loopback = nth_address(&prefix, offset).ok_or(ResolveError::AddressExhausted {
                prefix,
                purpose: "loopbacks",
            })?;
            debug!("{}:{} loopback {}", router.asn, router.id, loopback);
            router.loopback = Some(loopback);
        }

        info!(
            "AS {}: assigned {} loopbacks from {}",
            autonomous_system.number,
            autonomous_system.routers.len(),
            prefix
        );
    }

    Ok(topology)
}
