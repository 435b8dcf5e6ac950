//! Construction of the topology model from the input document.
//!
//! All parsing of prefixes, addresses and neighbour references happens here,
//! so a malformed document is rejected before any allocation starts.

use crate::config::{AsConfig, InterfaceConfig, TopologyConfig};
use crate::error::ResolveError;
use crate::topology::types::{AutonomousSystem, Interface, Router, RouterRef, Topology};
use ipnet::Ipv6Net;
use log::{debug, info, warn};

impl Topology {
    /// Build the model, checking prefixes, addresses and neighbour references
    pub fn from_config(config: &TopologyConfig) -> Result<Self, ResolveError> {
        config.validate()?;

        let autonomous_systems = config
            .autonomous_systems
            .iter()
            .map(|(asn, as_config)| build_autonomous_system(*asn, as_config))
            .collect::<Result<Vec<_>, _>>()?;

        let topology = Topology { autonomous_systems };
        topology.check_neighbor_references()?;

        info!(
            "Built topology with {} autonomous systems and {} routers",
            topology.autonomous_systems.len(),
            config.router_count()
        );
        Ok(topology)
    }

    /// Every declared neighbour must name an existing router other than its own
    fn check_neighbor_references(&self) -> Result<(), ResolveError> {
        for id in self.interface_ids() {
            let router = self.router(id.router);
            let interface = self.interface(id);
            let Some(neighbor) = &interface.neighbor else {
                continue;
            };

            if *neighbor == router.reference() {
                return Err(ResolveError::MalformedNeighbor {
                    router: router.reference().to_string(),
                    interface: interface.name.clone(),
                    value: neighbor.to_string(),
                    reason: "a router cannot be its own neighbour".to_string(),
                });
            }
            if self.locate(neighbor).is_none() {
                return Err(ResolveError::UnknownNeighbor {
                    router: router.reference().to_string(),
                    interface: interface.name.clone(),
                    neighbor: neighbor.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn parse_prefix(asn: u32, field: &'static str, value: &str) -> Result<Ipv6Net, ResolveError> {
    value
        .trim()
        .parse::<Ipv6Net>()
        .map(|net| net.trunc())
        .map_err(|e| ResolveError::InvalidPrefix {
            asn,
            field,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn build_autonomous_system(asn: u32, config: &AsConfig) -> Result<AutonomousSystem, ResolveError> {
    let loopback_prefix = parse_prefix(asn, "loopback_space", &config.loopback_space)?;
    let link_prefix = config
        .networks_space
        .as_deref()
        .map(|space| parse_prefix(asn, "networks_space", space))
        .transpose()?;

    let routers = config
        .routers
        .iter()
        .map(|(id, router_config)| -> Result<Router, ResolveError> {
            let reference = RouterRef::new(asn, id.clone());
            let interfaces = router_config
                .interfaces
                .iter()
                .map(|(name, iface)| build_interface(&reference, name, iface))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Router {
                id: id.clone(),
                asn,
                border: router_config.border,
                loopback: None,
                interfaces,
                bgp: None,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "AS {} ({:?}): loopbacks from {}, links from {}, {} routers",
        asn,
        config.igp,
        loopback_prefix,
        link_prefix.map_or_else(|| "<none>".to_string(), |p| p.to_string()),
        routers.len()
    );

    Ok(AutonomousSystem {
        number: asn,
        igp: config.igp,
        loopback_prefix,
        link_prefix,
        routers,
    })
}

fn build_interface(
    router: &RouterRef,
    name: &str,
    config: &InterfaceConfig,
) -> Result<Interface, ResolveError> {
    let mut interface = Interface::new(name);

    interface.neighbor = match config.neighbour.as_deref() {
        Some(raw) => Some(RouterRef::parse(raw, router.asn).map_err(|reason| {
            ResolveError::MalformedNeighbor {
                router: router.to_string(),
                interface: name.to_string(),
                value: raw.to_string(),
                reason,
            }
        })?),
        None => {
            warn!("{} interface {} declares no neighbour", router, name);
            None
        }
    };

    interface.addresses = config
        .addresses
        .iter()
        .flatten()
        .map(|raw| {
            raw.trim()
                .parse::<Ipv6Net>()
                .map_err(|e| ResolveError::InvalidAddress {
                    router: router.to_string(),
                    interface: name.to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    interface.bgp = config.bgp;
    interface.declared_metric = config.ospf_metric;
    interface.declared_area = config.ospf_area;
    interface.rip_enable = config.rip_enable;

    Ok(interface)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<Topology, ResolveError> {
        let config: TopologyConfig = serde_yaml::from_str(yaml).unwrap();
        Topology::from_config(&config)
    }

    #[test]
    fn test_build_normalizes_prefixes_and_references() {
        let topo = parse(
            r#"
1:
  igp: ospf
  loopback_space: "2001:db8:1::7/64"
  networks_space: "2001:db8:100::/48"
  routers:
    R1:
      border: true
      interfaces:
        eth0:
          neighbour: R2
          ospf_metric: 5
          addresses: ["2001:db8:ffff::1/64"]
    R2:
      interfaces:
        eth0:
          neighbour: "1:R1"
"#,
        )
        .unwrap();

        let as1 = &topo.autonomous_systems[0];
        assert_eq!(as1.loopback_prefix.to_string(), "2001:db8:1::/64");
        assert_eq!(as1.link_prefix.unwrap().to_string(), "2001:db8:100::/48");

        let r1 = &as1.routers[0];
        assert!(r1.border);
        assert!(r1.loopback.is_none());
        let eth0 = &r1.interfaces[0];
        assert_eq!(eth0.neighbor, Some(RouterRef::new(1, "R2")));
        assert_eq!(eth0.declared_metric, Some(5));
        assert_eq!(eth0.addresses[0].to_string(), "2001:db8:ffff::1/64");
        assert_eq!(as1.routers[1].interfaces[0].neighbor, Some(RouterRef::new(1, "R1")));
    }

    #[test]
    fn test_build_rejects_malformed_prefix() {
        let err = parse(
            r#"
1:
  igp: rip
  loopback_space: "not-a-prefix"
"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidPrefix { asn: 1, field: "loopback_space", .. }
        ));

        let err = parse(
            r#"
1:
  igp: rip
  loopback_space: "2001:db8::/64"
  networks_space: "10.0.0.0/8"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidPrefix { field: "networks_space", .. }));
    }

    #[test]
    fn test_build_rejects_unknown_and_self_neighbors() {
        let err = parse(
            r#"
1:
  igp: rip
  loopback_space: "2001:db8::/64"
  routers:
    R1:
      interfaces:
        eth0:
          neighbour: "3:R1"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::UnknownNeighbor { .. }));

        let err = parse(
            r#"
1:
  igp: rip
  loopback_space: "2001:db8::/64"
  routers:
    R1:
      interfaces:
        eth0:
          neighbour: R1
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::MalformedNeighbor { .. }));
    }

    #[test]
    fn test_build_rejects_bad_address() {
        let err = parse(
            r#"
1:
  igp: rip
  loopback_space: "2001:db8::/64"
  routers:
    R1:
      interfaces:
        eth0:
          addresses: ["2001:db8::zz/64"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidAddress { .. }));
    }
}
