//! OSPF metric and area reconciliation.
//!
//! Both ends of a link must agree on one metric. A metric declared on one
//! side is copied to the other; two different declared values abort the run.

use crate::error::ResolveError;
use crate::igp::AreaPolicy;
use crate::topology::{find_reciprocal, Topology};
use log::{debug, info};

/// Area used when an interface declares none
pub const DEFAULT_AREA: u32 = 0;

/// Agreement state of one link's metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMetric {
    /// Neither end declares a metric
    Undeclared,
    /// Exactly one end declares it, or both declare the same value
    SingleSided(u32),
}

impl LinkMetric {
    pub fn from_declared(metric: Option<u32>) -> Self {
        metric.map_or(LinkMetric::Undeclared, LinkMetric::SingleSided)
    }

    /// Combine with the other end of the link; conflicting values yield `Err((mine, theirs))`
    pub fn reconcile(self, remote: Option<u32>) -> Result<Option<u32>, (u32, u32)> {
        match (self, remote) {
            (LinkMetric::Undeclared, remote) => Ok(remote),
            (LinkMetric::SingleSided(local), None) => Ok(Some(local)),
            (LinkMetric::SingleSided(local), Some(remote)) if local == remote => Ok(Some(local)),
            (LinkMetric::SingleSided(local), Some(remote)) => Err((local, remote)),
        }
    }
}

/// Reconcile metrics on every link of the AS at `as_index`
pub fn reconcile_metrics(mut topology: Topology, as_index: usize) -> Result<Topology, ResolveError> {
    let declaring: Vec<_> = topology
        .interface_ids()
        .into_iter()
        .filter(|id| id.router.autonomous_system == as_index)
        .filter(|id| topology.interface(*id).declared_metric.is_some())
        .collect();

    for id in declaring {
        let peer = find_reciprocal(&topology, id)?;
        let local = LinkMetric::from_declared(topology.interface(id).declared_metric);
        let remote = topology.interface(peer).declared_metric;

        let metric = local.reconcile(remote).map_err(|(local_metric, remote_metric)| {
            ResolveError::MetricMismatch {
                local: topology.describe(id),
                local_metric,
                remote: topology.describe(peer),
                remote_metric,
            }
        })?;

        debug!(
            "{} <-> {} metric {:?}",
            topology.describe(id),
            topology.describe(peer),
            metric
        );
        topology.interface_mut(id).ospf_metric = metric;
        topology.interface_mut(peer).ospf_metric = metric;
    }

    Ok(topology)
}

/// Give each interface of the AS its declared area, or the backbone
pub fn assign_areas(mut topology: Topology, as_index: usize, policy: AreaPolicy) -> Topology {
    let autonomous_system = &mut topology.autonomous_systems[as_index];
    let mut assigned = 0usize;

    for router in &mut autonomous_system.routers {
        if router.bgp.is_some() && policy == AreaPolicy::SkipBgpRouters {
            debug!("{}:{} runs BGP, leaving areas unset", router.asn, router.id);
            continue;
        }
        for interface in &mut router.interfaces {
            interface.ospf_area = Some(interface.declared_area.unwrap_or(DEFAULT_AREA));
            assigned += 1;
        }
    }

    info!(
        "AS {}: assigned OSPF areas to {} interfaces",
        autonomous_system.number, assigned
    );
    topology
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TopologyConfig;

    fn topology(yaml: &str) -> Topology {
        let config: TopologyConfig = serde_yaml::from_str(yaml).unwrap();
        Topology::from_config(&config).unwrap()
    }

    fn link(a: Option<u32>, b: Option<u32>) -> String {
        let field = |m: Option<u32>| m.map(|v| format!("ospf_metric: {}", v)).unwrap_or_default();
        format!(
            r#"
1:
  igp: ospf
  loopback_space: "2001:db8:1::/64"
  routers:
    A:
      interfaces:
        eth0:
          neighbour: B
          {}
    B:
      interfaces:
        eth0:
          neighbour: A
          {}
"#,
            field(a),
            field(b)
        )
    }

    fn metrics(topo: &Topology) -> (Option<u32>, Option<u32>) {
        let routers = &topo.autonomous_systems[0].routers;
        (
            routers[0].interfaces[0].ospf_metric,
            routers[1].interfaces[0].ospf_metric,
        )
    }

    #[test]
    fn test_link_metric_state_machine() {
        assert_eq!(LinkMetric::from_declared(None).reconcile(None), Ok(None));
        assert_eq!(LinkMetric::from_declared(None).reconcile(Some(7)), Ok(Some(7)));
        assert_eq!(LinkMetric::from_declared(Some(7)).reconcile(None), Ok(Some(7)));
        assert_eq!(LinkMetric::from_declared(Some(7)).reconcile(Some(7)), Ok(Some(7)));
        assert_eq!(LinkMetric::from_declared(Some(7)).reconcile(Some(9)), Err((7, 9)));
    }

    #[test]
    fn test_one_sided_metric_propagates() {
        let topo = reconcile_metrics(topology(&link(Some(10), None)), 0).unwrap();
        assert_eq!(metrics(&topo), (Some(10), Some(10)));

        let topo = reconcile_metrics(topology(&link(None, Some(30))), 0).unwrap();
        assert_eq!(metrics(&topo), (Some(30), Some(30)));
    }

    #[test]
    fn test_undeclared_metric_stays_unset() {
        let topo = reconcile_metrics(topology(&link(None, None)), 0).unwrap();
        assert_eq!(metrics(&topo), (None, None));
    }

    #[test]
    fn test_metric_mismatch_names_both_ends() {
        let err = reconcile_metrics(topology(&link(Some(10), Some(20))), 0).unwrap_err();
        match err {
            ResolveError::MetricMismatch {
                local,
                local_metric,
                remote,
                remote_metric,
            } => {
                assert_eq!(local, "1:A eth0");
                assert_eq!(local_metric, 10);
                assert_eq!(remote, "1:B eth0");
                assert_eq!(remote_metric, 20);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_areas_default_to_backbone() {
        let topo = topology(
            r#"
1:
  igp: ospf
  loopback_space: "2001:db8:1::/64"
  routers:
    A:
      interfaces:
        eth0:
          neighbour: B
          ospf_area: 3
        eth1:
          neighbour: C
    B:
      interfaces:
        eth0:
          neighbour: A
    C:
      interfaces:
        eth0:
          neighbour: A
"#,
        );
        let topo = assign_areas(topo, 0, AreaPolicy::SkipBgpRouters);
        let a = &topo.autonomous_systems[0].routers[0];
        assert_eq!(a.interfaces[0].ospf_area, Some(3));
        assert_eq!(a.interfaces[1].ospf_area, Some(DEFAULT_AREA));
    }
}
