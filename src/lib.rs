//! # asconf - Per-router configuration synthesis for multi-AS IPv6 topologies
//!
//! This library turns a declarative description of autonomous systems,
//! routers and interfaces into a fully resolved per-router configuration
//! model, ready to be handed to a template renderer.
//!
//! ## Overview
//!
//! The input only states relationships: which interface faces which router,
//! which links speak BGP, which metric an operator wants on a link. The
//! pipeline fills in everything else:
//!
//! - **Link addressing**: every unaddressed link gets a shared /126
//! - **Loopbacks**: one address per router from its AS's loopback prefix
//! - **BGP**: eBGP neighbours on connected addresses, iBGP full mesh on loopbacks
//! - **OSPF**: both ends of a link agree on one metric, areas default to 0
//!
//! ## Architecture
//!
//! - `config`: input document types and YAML parsing
//! - `config_loader`: loading the document from disk
//! - `topology`: the in-memory model and reciprocal-interface lookup
//! - `ip`: link and loopback allocation
//! - `bgp`: eBGP derivation and iBGP synthesis
//! - `igp`: OSPF metric and area reconciliation
//! - `orchestrator`: runs the stages in order
//! - `records`: serializable output handed to renderers
//! - `error`: the error taxonomy shared by all stages
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use asconf::{config_loader, orchestrator};
//! use std::path::Path;
//!
//! let config = config_loader::load_config(Path::new("topology.yaml"))?;
//! let options = orchestrator::PipelineOptions::default();
//! let routers = orchestrator::generate_router_configs(&config, &options)?;
//! println!("{}", serde_json::to_string_pretty(&routers)?);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Input Format
//!
//! ```yaml
//! ASs:
//!   1:
//!     igp: ospf                  # ospf / rip / ibgp
//!     loopback_space: "2001:db8:1::/64"
//!     networks_space: "2001:db8:100::/48"
//!     routers:
//!       R1:
//!         border: true
//!         interfaces:
//!           GigabitEthernet1/0:
//!             neighbour: R2      # same AS
//!             ospf_metric: 10
//!           GigabitEthernet2/0:
//!             neighbour: "2:R3"  # AS:router
//!             bgp: true
//! ```
//!
//! ## Error Handling
//!
//! Resolution stages return [`error::ResolveError`]. The loader and the
//! binary use `color_eyre` for reports with context.

pub mod bgp;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod igp;
pub mod ip;
pub mod orchestrator;
pub mod records;
pub mod topology;
pub mod utils;

pub use error::ResolveError;
pub use orchestrator::{generate_router_configs, resolve_topology, PipelineOptions};
