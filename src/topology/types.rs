//! Topology type definitions.
//!
//! Autonomous systems own their routers, routers own their interfaces, all in
//! declaration order. Resolved fields (loopback, link addresses, BGP block,
//! OSPF metric and area) start empty and are filled by the pipeline stages.

use ipnet::Ipv6Net;
use serde::Serialize;
use std::fmt;
use std::net::Ipv6Addr;

/// Re-export from the config layer; the model and the document share the enum
pub use crate::config::IgpKind;

/// Composite router identifier, written `AS:router`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouterRef {
    pub asn: u32,
    pub router: String,
}

impl RouterRef {
    pub fn new(asn: u32, router: impl Into<String>) -> Self {
        RouterRef {
            asn,
            router: router.into(),
        }
    }

    /// Parse a neighbour reference. A bare id refers to a router in `local_asn`.
    pub fn parse(raw: &str, local_asn: u32) -> Result<Self, String> {
        let raw = raw.trim();
        match raw.split_once(':') {
            Some((asn, router)) => {
                let asn = asn
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| format!("invalid AS number '{}': {}", asn, e))?;
                let router = router.trim();
                if router.is_empty() || router.contains(':') {
                    return Err(format!("invalid router id '{}'", router));
                }
                Ok(RouterRef::new(asn, router))
            }
            None if raw.is_empty() => Err("empty reference".to_string()),
            None => Ok(RouterRef::new(local_asn, raw)),
        }
    }
}

impl fmt::Display for RouterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.asn, self.router)
    }
}

/// Position of a router inside a [`Topology`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouterIndex {
    pub autonomous_system: usize,
    pub router: usize,
}

/// Position of an interface inside a [`Topology`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterfaceId {
    pub router: RouterIndex,
    pub interface: usize,
}

/// The whole network, in declaration order
#[derive(Debug, Clone)]
pub struct Topology {
    pub autonomous_systems: Vec<AutonomousSystem>,
}

#[derive(Debug, Clone)]
pub struct AutonomousSystem {
    pub number: u32,
    pub igp: IgpKind,
    /// Prefix loopbacks are drawn from (host bits cleared)
    pub loopback_prefix: Ipv6Net,
    /// Prefix point-to-point /126 blocks are carved from (host bits cleared)
    pub link_prefix: Option<Ipv6Net>,
    pub routers: Vec<Router>,
}

#[derive(Debug, Clone)]
pub struct Router {
    pub id: String,
    /// Number of the owning AS
    pub asn: u32,
    pub border: bool,
    pub loopback: Option<Ipv6Addr>,
    pub interfaces: Vec<Interface>,
    pub bgp: Option<BgpBlock>,
}

impl Router {
    pub fn reference(&self) -> RouterRef {
        RouterRef::new(self.asn, self.id.clone())
    }

    /// BGP block of this router, created empty on first use
    pub fn bgp_block(&mut self) -> &mut BgpBlock {
        let (asn, id) = (self.asn, &self.id);
        self.bgp.get_or_insert_with(|| BgpBlock::new(asn, id.clone()))
    }
}

#[derive(Debug, Clone)]
pub struct Interface {
    pub name: String,
    /// Normalized neighbour reference
    pub neighbor: Option<RouterRef>,
    pub addresses: Vec<Ipv6Net>,
    pub bgp: bool,
    /// Metric as declared in the input, `None` means inherit from the peer
    pub declared_metric: Option<u32>,
    pub declared_area: Option<u32>,
    pub rip_enable: bool,
    /// Metric agreed by both ends of the link
    pub ospf_metric: Option<u32>,
    pub ospf_area: Option<u32>,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Interface {
            name: name.into(),
            neighbor: None,
            addresses: Vec::new(),
            bgp: false,
            declared_metric: None,
            declared_area: None,
            rip_enable: false,
            ospf_metric: None,
            ospf_area: None,
        }
    }
}

/// BGP process of one router
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BgpBlock {
    #[serde(rename = "as")]
    pub asn: u32,
    pub router_id: String,
    pub neighbors: Vec<BgpNeighbor>,
    pub networks: Vec<Ipv6Net>,
}

impl BgpBlock {
    pub fn new(asn: u32, router_id: impl Into<String>) -> Self {
        BgpBlock {
            asn,
            router_id: router_id.into(),
            neighbors: Vec::new(),
            networks: Vec::new(),
        }
    }

    /// Append a neighbour unless an identical entry exists. Returns whether it was added.
    pub fn add_neighbor(&mut self, neighbor: BgpNeighbor) -> bool {
        if self.neighbors.contains(&neighbor) {
            return false;
        }
        self.neighbors.push(neighbor);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BgpNeighbor {
    pub address: Ipv6Addr,
    pub remote_as: u32,
}

impl Topology {
    pub fn autonomous_system(&self, asn: u32) -> Option<&AutonomousSystem> {
        self.autonomous_systems.iter().find(|a| a.number == asn)
    }

    pub fn router(&self, index: RouterIndex) -> &Router {
        &self.autonomous_systems[index.autonomous_system].routers[index.router]
    }

    pub fn router_mut(&mut self, index: RouterIndex) -> &mut Router {
        &mut self.autonomous_systems[index.autonomous_system].routers[index.router]
    }

    pub fn interface(&self, id: InterfaceId) -> &Interface {
        &self.router(id.router).interfaces[id.interface]
    }

    pub fn interface_mut(&mut self, id: InterfaceId) -> &mut Interface {
        &mut self.router_mut(id.router).interfaces[id.interface]
    }

    /// Find a router by composite id
    pub fn locate(&self, reference: &RouterRef) -> Option<RouterIndex> {
        self.autonomous_systems
            .iter()
            .enumerate()
            .filter(|(_, a)| a.number == reference.asn)
            .find_map(|(as_index, a)| {
                a.routers
                    .iter()
                    .position(|r| r.id == reference.router)
                    .map(|router| RouterIndex {
                        autonomous_system: as_index,
                        router,
                    })
            })
    }

    /// Every router index in declaration order
    pub fn router_indices(&self) -> Vec<RouterIndex> {
        self.autonomous_systems
            .iter()
            .enumerate()
            .flat_map(|(as_index, a)| {
                (0..a.routers.len()).map(move |router| RouterIndex {
                    autonomous_system: as_index,
                    router,
                })
            })
            .collect()
    }

    /// Every interface id in declaration order (AS, then router, then interface)
    pub fn interface_ids(&self) -> Vec<InterfaceId> {
        self.router_indices()
            .into_iter()
            .flat_map(|router| {
                (0..self.router(router).interfaces.len())
                    .map(move |interface| InterfaceId { router, interface })
            })
            .collect()
    }

    /// `AS:router interface` label used in logs and errors
    pub fn describe(&self, id: InterfaceId) -> String {
        format!(
            "{} {}",
            self.router(id.router).reference(),
            self.interface(id).name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_ref_parse() {
        assert_eq!(RouterRef::parse("R2", 1).unwrap(), RouterRef::new(1, "R2"));
        assert_eq!(RouterRef::parse("2:R3", 1).unwrap(), RouterRef::new(2, "R3"));
        assert_eq!(RouterRef::parse(" 65000:edge ", 1).unwrap(), RouterRef::new(65000, "edge"));
        assert!(RouterRef::parse("", 1).is_err());
        assert!(RouterRef::parse("x:R3", 1).is_err());
        assert!(RouterRef::parse("2:", 1).is_err());
        assert_eq!(RouterRef::new(2, "R3").to_string(), "2:R3");
    }

    #[test]
    fn test_bgp_block_add_neighbor_is_idempotent() {
        let mut block = BgpBlock::new(2, "R3");
        let neighbor = BgpNeighbor {
            address: "2001:db8::1".parse().unwrap(),
            remote_as: 1,
        };
        assert!(block.add_neighbor(neighbor));
        assert!(!block.add_neighbor(neighbor));
        assert_eq!(block.neighbors.len(), 1);
    }

    #[test]
    fn test_bgp_block_created_on_first_use() {
        let mut router = Router {
            id: "R1".to_string(),
            asn: 7,
            border: false,
            loopback: None,
            interfaces: vec![Interface::new("eth0")],
            bgp: None,
        };
        router.bgp_block().networks.push("2001:db8::/126".parse().unwrap());
        router.bgp_block();
        let block = router.bgp.as_ref().unwrap();
        assert_eq!(block.asn, 7);
        assert_eq!(block.router_id, "R1");
        assert_eq!(block.networks.len(), 1);
    }
}
