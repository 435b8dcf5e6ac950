//! Input topology document.
//!
//! These types mirror the YAML description of the network: autonomous
//! systems keyed by number, routers keyed by id and interfaces keyed by name.
//! All three mappings are kept as ordered `Vec`s so that declaration order
//! survives parsing; address allocation depends on it.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

/// Optional wrapper key around the AS mapping
const WRAPPER_KEY: &str = "ASs";

/// Interior routing protocol run inside an AS
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IgpKind {
    /// OSPFv3, with metric and area reconciliation
    Ospf,
    /// RIPng, no extra resolution
    Rip,
    /// Full mesh of iBGP sessions over loopbacks
    Ibgp,
}

/// The whole input document
#[derive(Debug, Clone)]
pub struct TopologyConfig {
    /// Autonomous systems in declaration order
    pub autonomous_systems: Vec<(u32, AsConfig)>,
}

impl<'de> Deserialize<'de> for TopologyConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Accept both `ASs: {1: ..., 2: ...}` and the bare mapping
        let value = match serde_yaml::Value::deserialize(deserializer)? {
            serde_yaml::Value::Mapping(mut mapping) => match mapping.remove(WRAPPER_KEY) {
                Some(inner) => inner,
                None => serde_yaml::Value::Mapping(mapping),
            },
            other => other,
        };

        let autonomous_systems = ordered_map(value).map_err(de::Error::custom)?;
        Ok(TopologyConfig { autonomous_systems })
    }
}

impl TopologyConfig {
    /// Structural checks that do not need address parsing
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.autonomous_systems.is_empty() {
            return Err(ValidationError::EmptyTopology);
        }

        let mut seen_as = HashSet::new();
        for (asn, as_config) in &self.autonomous_systems {
            if !seen_as.insert(*asn) {
                return Err(ValidationError::DuplicateAs(*asn));
            }
            if as_config.loopback_space.trim().is_empty() {
                return Err(ValidationError::InvalidAs {
                    asn: *asn,
                    reason: "loopback_space cannot be empty".to_string(),
                });
            }

            let mut seen_routers = HashSet::new();
            for (router_id, router) in &as_config.routers {
                if router_id.is_empty() || router_id.contains(':') {
                    return Err(ValidationError::InvalidRouter {
                        asn: *asn,
                        router: router_id.clone(),
                        reason: "router ids must be non-empty and must not contain ':'".to_string(),
                    });
                }
                if !seen_routers.insert(router_id.as_str()) {
                    return Err(ValidationError::InvalidRouter {
                        asn: *asn,
                        router: router_id.clone(),
                        reason: "router id declared twice".to_string(),
                    });
                }

                let mut seen_interfaces = HashSet::new();
                for (name, _) in &router.interfaces {
                    if !seen_interfaces.insert(name.as_str()) {
                        return Err(ValidationError::InvalidRouter {
                            asn: *asn,
                            router: router_id.clone(),
                            reason: format!("interface {} declared twice", name),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Total number of routers across all ASes
    pub fn router_count(&self) -> usize {
        self.autonomous_systems
            .iter()
            .map(|(_, as_config)| as_config.routers.len())
            .sum()
    }
}

/// One autonomous system
#[derive(Debug, Deserialize, Clone)]
pub struct AsConfig {
    pub igp: IgpKind,
    /// IPv6 prefix loopbacks are drawn from
    pub loopback_space: String,
    /// IPv6 prefix point-to-point /126 blocks are carved from
    #[serde(default)]
    pub networks_space: Option<String>,
    #[serde(default, deserialize_with = "ordered_map")]
    pub routers: Vec<(String, RouterConfig)>,
}

/// One router
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RouterConfig {
    #[serde(default)]
    pub border: bool,
    #[serde(default, deserialize_with = "ordered_map")]
    pub interfaces: Vec<(String, InterfaceConfig)>,
}

/// One interface
#[derive(Debug, Deserialize, Clone, Default)]
pub struct InterfaceConfig {
    /// Explicit addresses (`addr/len`); allocation skips interfaces that have any
    #[serde(default)]
    pub addresses: Option<Vec<String>>,
    /// Bare router id (same AS) or `AS:router`
    #[serde(default, alias = "neighbor")]
    pub neighbour: Option<String>,
    #[serde(default)]
    pub bgp: bool,
    #[serde(default)]
    pub ospf_metric: Option<u32>,
    #[serde(default)]
    pub ospf_area: Option<u32>,
    #[serde(default)]
    pub rip_enable: bool,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Topology declares no autonomous systems")]
    EmptyTopology,
    #[error("AS {0} is declared twice")]
    DuplicateAs(u32),
    #[error("Invalid AS {asn}: {reason}")]
    InvalidAs { asn: u32, reason: String },
    #[error("Invalid router {router} in AS {asn}: {reason}")]
    InvalidRouter {
        asn: u32,
        router: String,
        reason: String,
    },
}

/// Deserialize a mapping into a `Vec` of entries, keeping document order
fn ordered_map<'de, D, K, V>(deserializer: D) -> Result<Vec<(K, V)>, D::Error>
where
    D: Deserializer<'de>,
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    struct OrderedVisitor<K, V>(PhantomData<(K, V)>);

    impl<'de, K, V> Visitor<'de> for OrderedVisitor<K, V>
    where
        K: Deserialize<'de>,
        V: Deserialize<'de>,
    {
        type Value = Vec<(K, V)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a mapping")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedVisitor(PhantomData))
}
