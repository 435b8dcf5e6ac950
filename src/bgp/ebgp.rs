//! eBGP neighbour derivation.
//!
//! BGP-flagged interfaces mark their router as a BGP speaker and name the
//! peer router. Each pending reference is resolved to the first address of
//! the reciprocal interface, i.e. the peer's directly connected address.

use crate::error::ResolveError;
use crate::topology::{find_reciprocal, BgpNeighbor, InterfaceId, RouterRef, Topology};
use log::{debug, info};

/// A BGP-flagged interface waiting for its peer address
#[derive(Debug, Clone)]
pub struct PendingNeighbor {
    pub interface: InterfaceId,
    pub reference: RouterRef,
}

/// Collect every BGP-flagged interface in declaration order
pub fn pending_neighbors(topology: &Topology) -> Result<Vec<PendingNeighbor>, ResolveError> {
    topology
        .interface_ids()
        .into_iter()
        .filter(|id| topology.interface(*id).bgp)
        .map(|id| -> Result<PendingNeighbor, ResolveError> {
            let interface = topology.interface(id);
            let reference = interface
                .neighbor
                .clone()
                .ok_or_else(|| ResolveError::MissingNeighbor {
                    router: topology.router(id.router).reference().to_string(),
                    interface: interface.name.clone(),
                })?;
            Ok(PendingNeighbor {
                interface: id,
                reference,
            })
        })
        .collect()
}

/// Resolve one pending reference to a concrete neighbour entry
pub fn resolve_neighbor(topology: &Topology, pending: &PendingNeighbor) -> Result<BgpNeighbor, ResolveError> {
    let peer = find_reciprocal(topology, pending.interface)?;
    let address = topology
        .interface(peer)
        .addresses
        .first()
        .map(|net| net.addr())
        .ok_or_else(|| ResolveError::UnaddressedPeer {
            router: topology.router(pending.interface.router).reference().to_string(),
            interface: topology.interface(pending.interface).name.clone(),
            peer: topology.describe(peer),
        })?;

    Ok(BgpNeighbor {
        address,
        remote_as: pending.reference.asn,
    })
}

/// Add eBGP neighbours for every BGP-flagged interface
pub fn derive_ebgp(mut topology: Topology) -> Result<Topology, ResolveError> {
    let pending = pending_neighbors(&topology)?;
    info!("Resolving {} BGP neighbour references", pending.len());

    for entry in &pending {
        let neighbor = resolve_neighbor(&topology, entry)?;
        debug!(
            "{} peers with {} ({} AS {})",
            topology.describe(entry.interface),
            entry.reference,
            neighbor.address,
            neighbor.remote_as
        );
        topology
            .router_mut(entry.interface.router)
            .bgp_block()
            .add_neighbor(neighbor);
    }

    Ok(topology)
}
