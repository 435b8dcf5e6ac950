//! Resolution orchestrator.
//!
//! This module runs the resolution stages in their fixed order. The topology
//! is moved into each stage and handed back, so exactly one stage owns it at
//! any time. The first error aborts the run.

use crate::bgp::resolve_bgp;
use crate::config::TopologyConfig;
use crate::error::ResolveError;
use crate::igp::{reconcile_igp, AreaPolicy};
use crate::ip::{allocate_link_addresses, allocate_loopbacks};
use crate::records::{router_records, RouterRecord};
use crate::topology::Topology;
use log::info;

/// Knobs for one pipeline run
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub area_policy: AreaPolicy,
}

/// Run every stage over an already built topology
pub fn resolve_topology(topology: Topology, options: &PipelineOptions) -> Result<Topology, ResolveError> {
    info!("#STEP 1: assigning link networks");
    let topology = allocate_link_addresses(topology)?;

    info!("#STEP 2: assigning loopbacks");
    let topology = allocate_loopbacks(topology)?;

    info!("#STEP 3: resolving BGP neighbours");
    let topology = resolve_bgp(topology)?;

    info!("#STEP 4: reconciling IGP settings");
    let topology = reconcile_igp(topology, options.area_policy)?;

    Ok(topology)
}

/// Build, resolve and flatten a topology document into router records
pub fn generate_router_configs(
    config: &TopologyConfig,
    options: &PipelineOptions,
) -> Result<Vec<RouterRecord>, ResolveError> {
    let topology = Topology::from_config(config)?;
    let topology = resolve_topology(topology, options)?;
    let records = router_records(&topology)?;
    info!("Resolved configuration for {} routers", records.len());
    Ok(records)
}
