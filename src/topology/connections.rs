//! Link discovery between interfaces.
//!
//! A link is never declared as such: it is implied by two interfaces whose
//! neighbour references point at each other's routers. This file holds the
//! rules shared by every stage that needs to walk from one end of a link to
//! the other.

use crate::error::ResolveError;
use crate::topology::types::{InterfaceId, RouterRef, Topology};
use std::fmt;

/// Unordered pair of routers, stored sorted so both ends produce the same key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionKey(RouterRef, RouterRef);

impl ConnectionKey {
    pub fn new(a: RouterRef, b: RouterRef) -> Self {
        if a <= b {
            ConnectionKey(a, b)
        } else {
            ConnectionKey(b, a)
        }
    }
}

impl fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.0, self.1)
    }
}

/// Connection key of an interface, if it declares a neighbour
pub fn connection_key(topology: &Topology, id: InterfaceId) -> Option<ConnectionKey> {
    let local = topology.router(id.router).reference();
    topology
        .interface(id)
        .neighbor
        .clone()
        .map(|remote| ConnectionKey::new(local, remote))
}

/// Find the interface at the other end of `id`'s link.
///
/// The reciprocal is the interface on the neighbour router whose own
/// neighbour reference points back at `id`'s router. Exactly one must exist.
pub fn find_reciprocal(topology: &Topology, id: InterfaceId) -> Result<InterfaceId, ResolveError> {
    let local_router = topology.router(id.router);
    let local = local_router.reference();
    let interface = topology.interface(id);

    let remote = interface
        .neighbor
        .as_ref()
        .ok_or_else(|| ResolveError::MissingNeighbor {
            router: local.to_string(),
            interface: interface.name.clone(),
        })?;

    let remote_index = topology
        .locate(remote)
        .ok_or_else(|| ResolveError::UnknownNeighbor {
            router: local.to_string(),
            interface: interface.name.clone(),
            neighbor: remote.to_string(),
        })?;

    let matches: Vec<InterfaceId> = topology
        .router(remote_index)
        .interfaces
        .iter()
        .enumerate()
        .filter(|(_, candidate)| candidate.neighbor.as_ref() == Some(&local))
        .map(|(interface, _)| InterfaceId {
            router: remote_index,
            interface,
        })
        .collect();

    match matches.as_slice() {
        [reciprocal] => Ok(*reciprocal),
        _ => Err(ResolveError::UnresolvedNeighbor {
            router: local.to_string(),
            interface: interface.name.clone(),
            neighbor: remote.to_string(),
            matches: matches.len(),
        }),
    }
}
