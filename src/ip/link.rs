//! Point-to-point address allocation.
//!
//! Interfaces that declare a neighbour but carry no explicit address are
//! grouped into connections, and each connection receives a fresh /126:
//! host offset 1 for the interface discovered first, offset 2 for its peer.

use crate::error::ResolveError;
use crate::ip::as_manager::AsSubnetManager;
use crate::topology::{connection_key, ConnectionKey, InterfaceId, Topology};
use crate::utils::ip_utils::nth_host;
use ipnet::Ipv6Net;
use log::{debug, info};
use std::collections::HashMap;

/// Host offsets handed to the two ends of a link; 0 and 3 stay unused
const LINK_HOST_OFFSETS: [u128; 2] = [1, 2];

/// An implicit link: every unaddressed interface sharing one key
#[derive(Debug)]
struct Connection {
    key: ConnectionKey,
    members: Vec<InterfaceId>,
}

/// Group unaddressed interfaces by connection, in first-discovery order
fn discover_connections(topology: &Topology) -> Vec<Connection> {
    let mut connections: Vec<Connection> = Vec::new();
    let mut index_by_key: HashMap<ConnectionKey, usize> = HashMap::new();

    for id in topology.interface_ids() {
        if !topology.interface(id).addresses.is_empty() {
            continue;
        }
        let Some(key) = connection_key(topology, id) else {
            continue;
        };

        match index_by_key.get(&key) {
            Some(&index) => connections[index].members.push(id),
            None => {
                index_by_key.insert(key.clone(), connections.len());
                connections.push(Connection {
                    key,
                    members: vec![id],
                });
            }
        }
    }

    connections
}

/// Link prefix used for a connection: the first member's AS, else the peer's
fn link_prefix_for(topology: &Topology, first: InterfaceId, second: InterfaceId) -> Option<(u32, Ipv6Net)> {
    [first, second].iter().find_map(|id| {
        let autonomous_system = &topology.autonomous_systems[id.router.autonomous_system];
        autonomous_system
            .link_prefix
            .map(|prefix| (autonomous_system.number, prefix))
    })
}

/// Assign a shared /126 to both ends of every unaddressed link
pub fn allocate_link_addresses(mut topology: Topology) -> Result<Topology, ResolveError> {
    let connections = discover_connections(&topology);
    info!("Assigning /126 networks to {} unaddressed links", connections.len());

    let mut subnet_manager = AsSubnetManager::new();

    for connection in connections {
        let (first, second) = match connection.members.as_slice() {
            [first, second] => (*first, *second),
            members => {
                return Err(ResolveError::DanglingConnection {
                    connection: connection.key.to_string(),
                    members: members.len(),
                })
            }
        };

        let (asn, prefix) = link_prefix_for(&topology, first, second).ok_or_else(|| {
            ResolveError::MissingLinkPrefix {
                connection: connection.key.to_string(),
            }
        })?;
        let subnet = subnet_manager.next_link_subnet(asn, &prefix)?;

        for (member, offset) in [first, second].into_iter().zip(LINK_HOST_OFFSETS) {
            let address = nth_host(&subnet, offset).ok_or(ResolveError::AddressExhausted {
                prefix,
                purpose: "point-to-point links",
            })?;
            debug!("{} -> {}", topology.describe(member), address);
            topology.interface_mut(member).addresses.push(address);
        }
    }

    Ok(topology)
}
