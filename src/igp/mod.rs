//! IGP reconciliation.
//!
//! Only OSPF needs work after allocation: link metrics are reconciled and
//! areas assigned. RIP and iBGP autonomous systems pass through unchanged.

pub mod ospf;

pub use ospf::{assign_areas, reconcile_metrics, LinkMetric, DEFAULT_AREA};

use crate::error::ResolveError;
use crate::topology::{IgpKind, Topology};
use log::info;

/// Which routers of an OSPF AS receive area assignments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AreaPolicy {
    /// Routers carrying a BGP block keep their areas unset
    #[default]
    SkipBgpRouters,
    /// Every router of the AS gets areas
    AllRouters,
}

/// Reconcile every OSPF autonomous system
pub fn reconcile_igp(mut topology: Topology, policy: AreaPolicy) -> Result<Topology, ResolveError> {
    for as_index in 0..topology.autonomous_systems.len() {
        let autonomous_system = &topology.autonomous_systems[as_index];
        match autonomous_system.igp {
            IgpKind::Ospf => {
                info!("AS {}: reconciling OSPF metrics", autonomous_system.number);
                topology = reconcile_metrics(topology, as_index)?;
                topology = assign_areas(topology, as_index, policy);
            }
            IgpKind::Rip | IgpKind::Ibgp => {}
        }
    }
    Ok(topology)
}
