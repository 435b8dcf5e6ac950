//! BGP resolution.
//!
//! Two independent passes fill the per-router BGP blocks: eBGP neighbours
//! derived from BGP-flagged interfaces, and the iBGP full mesh of ASes whose
//! IGP is iBGP. Afterwards every block advertises the router's connected
//! networks.

pub mod ebgp;
pub mod ibgp;

pub use ebgp::{derive_ebgp, pending_neighbors, resolve_neighbor, PendingNeighbor};
pub use ibgp::synthesize_ibgp;

use crate::error::ResolveError;
use crate::topology::Topology;
use log::debug;

/// Run eBGP derivation, iBGP synthesis and network advertisement
pub fn resolve_bgp(topology: Topology) -> Result<Topology, ResolveError> {
    let topology = derive_ebgp(topology)?;
    let topology = synthesize_ibgp(topology)?;
    Ok(advertise_connected_networks(topology))
}

/// Fill each BGP block with the networks of the router's interface addresses
pub fn advertise_connected_networks(mut topology: Topology) -> Topology {
    for router in topology
        .autonomous_systems
        .iter_mut()
        .flat_map(|a| a.routers.iter_mut())
    {
        let networks: Vec<_> = router
            .interfaces
            .iter()
            .flat_map(|iface| iface.addresses.iter().map(|net| net.trunc()))
            .collect();

        let Some(block) = router.bgp.as_mut() else {
            continue;
        };
        for network in networks {
            if !block.networks.contains(&network) {
                block.networks.push(network);
            }
        }
        debug!(
            "{}:{} advertises {} networks",
            block.asn,
            block.router_id,
            block.networks.len()
        );
    }
    topology
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TopologyConfig;
    use crate::ip::{allocate_link_addresses, allocate_loopbacks};

    #[test]
    fn test_advertised_networks_are_connected_prefixes() {
        let config: TopologyConfig = serde_yaml::from_str(
            r#"
1:
  igp: rip
  loopback_space: "2001:db8:1::/64"
  networks_space: "2001:db8:100::/48"
  routers:
    R1:
      interfaces:
        eth0:
          neighbour: R2
          bgp: true
        eth1:
          neighbour: R3
          addresses: ["2001:db8:aaaa::1/64", "2001:db8:aaaa::9/64"]
    R2:
      interfaces:
        eth0:
          neighbour: R1
    R3:
      interfaces:
        eth0:
          neighbour: R1
          addresses: ["2001:db8:aaaa::2/64"]
"#,
        )
        .unwrap();
        let topo = Topology::from_config(&config).unwrap();
        let topo = allocate_loopbacks(allocate_link_addresses(topo).unwrap()).unwrap();
        let topo = resolve_bgp(topo).unwrap();

        let r1 = topo.autonomous_systems[0].routers[0].bgp.as_ref().unwrap();
        let networks: Vec<String> = r1.networks.iter().map(|n| n.to_string()).collect();
        assert_eq!(networks, vec!["2001:db8:100::/126", "2001:db8:aaaa::/64"]);
        assert_eq!(r1.neighbors.len(), 1);
        assert_eq!(r1.neighbors[0].remote_as, 1);
        assert!(topo.autonomous_systems[0].routers[1].bgp.is_none());
    }
}
