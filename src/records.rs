//! Resolved router records.
//!
//! This is what the pipeline hands to a renderer: one record per router, in
//! declaration order, with every address, peering and IGP setting resolved.
//! All types serialize with serde.

use crate::error::ResolveError;
use crate::topology::{BgpBlock, IgpKind, Interface, Router, Topology};
use ipnet::Ipv6Net;
use serde::Serialize;

/// Name of the loopback interface in rendered configurations
pub const LOOPBACK_INTERFACE: &str = "Loopback0";

/// OSPF process number used on every router
pub const OSPF_PROCESS_ID: u32 = 1;

/// RIPng process name used on every router
pub const RIP_PROCESS_NAME: &str = "RIPNG";

/// Fully resolved configuration of one router
#[derive(Debug, Clone, Serialize)]
pub struct RouterRecord {
    /// Composite `AS:router` id
    pub hostname: String,
    pub border: bool,
    pub loopback: LoopbackRecord,
    pub interfaces: Vec<InterfaceRecord>,
    pub igp: IgpProcess,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bgp: Option<BgpBlock>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoopbackRecord {
    pub name: String,
    /// Loopback address as a /128
    pub ipv6: Ipv6Net,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterfaceRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighbour: Option<String>,
    pub ipv6_addresses: Vec<Ipv6Net>,
    pub bgp: bool,
    pub rip_enable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ospf_metric: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ospf_area: Option<u32>,
}

/// IGP process block of a router
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "protocol", rename_all = "lowercase")]
pub enum IgpProcess {
    Ospf { process_id: u32 },
    Rip { process_name: String },
    Ibgp,
}

impl From<IgpKind> for IgpProcess {
    fn from(kind: IgpKind) -> Self {
        match kind {
            IgpKind::Ospf => IgpProcess::Ospf {
                process_id: OSPF_PROCESS_ID,
            },
            IgpKind::Rip => IgpProcess::Rip {
                process_name: RIP_PROCESS_NAME.to_string(),
            },
            IgpKind::Ibgp => IgpProcess::Ibgp,
        }
    }
}

impl From<&Interface> for InterfaceRecord {
    fn from(interface: &Interface) -> Self {
        InterfaceRecord {
            name: interface.name.clone(),
            neighbour: interface.neighbor.as_ref().map(|n| n.to_string()),
            ipv6_addresses: interface.addresses.clone(),
            bgp: interface.bgp,
            rip_enable: interface.rip_enable,
            ospf_metric: interface.ospf_metric,
            ospf_area: interface.ospf_area,
        }
    }
}

impl RouterRecord {
    fn from_router(router: &Router, igp: IgpKind) -> Result<Self, ResolveError> {
        let loopback = router.loopback.ok_or_else(|| ResolveError::MissingLoopback {
            router: router.reference().to_string(),
        })?;
        Ok(RouterRecord {
            hostname: router.reference().to_string(),
            border: router.border,
            loopback: LoopbackRecord {
                name: LOOPBACK_INTERFACE.to_string(),
                ipv6: Ipv6Net::from(loopback),
            },
            interfaces: router.interfaces.iter().map(InterfaceRecord::from).collect(),
            igp: IgpProcess::from(igp),
            bgp: router.bgp.clone(),
        })
    }
}

/// Flatten a resolved topology into records, in declaration order
pub fn router_records(topology: &Topology) -> Result<Vec<RouterRecord>, ResolveError> {
    topology
        .autonomous_systems
        .iter()
        .flat_map(|a| a.routers.iter().map(move |r| RouterRecord::from_router(r, a.igp)))
        .collect()
}
