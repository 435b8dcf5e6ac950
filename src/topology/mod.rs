//! Network topology module.
//!
//! This module contains the in-memory model of autonomous systems, routers
//! and interfaces, its construction from the input document, and the
//! reciprocal-interface lookup shared by the resolution stages.

pub mod builder;
pub mod connections;
pub mod types;

// Re-export key types and functions for easier access
pub use connections::{connection_key, find_reciprocal, ConnectionKey};
pub use types::{
    AutonomousSystem, BgpBlock, BgpNeighbor, IgpKind, Interface, InterfaceId, Router, RouterIndex,
    RouterRef, Topology,
};
