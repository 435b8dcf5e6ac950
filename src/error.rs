//! Resolution errors.
//!
//! Every stage of the pipeline reports failures through [`ResolveError`].
//! A run stops at the first error; there is no partial output.

use crate::config::ValidationError;
use ipnet::Ipv6Net;

/// Errors raised while building or resolving a topology
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    // Malformed topology
    #[error("AS {asn}: invalid {field} '{value}': {reason}")]
    InvalidPrefix {
        asn: u32,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{router} interface {interface}: invalid address '{value}': {reason}")]
    InvalidAddress {
        router: String,
        interface: String,
        value: String,
        reason: String,
    },

    #[error("{router} interface {interface}: malformed neighbour reference '{value}': {reason}")]
    MalformedNeighbor {
        router: String,
        interface: String,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    // Unresolvable reference
    #[error("{router} interface {interface}: neighbour '{neighbor}' does not exist")]
    UnknownNeighbor {
        router: String,
        interface: String,
        neighbor: String,
    },

    #[error("{router} interface {interface}: expected exactly one reciprocal interface on '{neighbor}', found {matches}")]
    UnresolvedNeighbor {
        router: String,
        interface: String,
        neighbor: String,
        matches: usize,
    },

    #[error("{router} interface {interface}: BGP is enabled but no neighbour is declared")]
    MissingNeighbor { router: String, interface: String },

    #[error("{router} interface {interface}: peer interface {peer} has no address to peer with")]
    UnaddressedPeer {
        router: String,
        interface: String,
        peer: String,
    },

    #[error("connection {connection} has {members} unaddressed interfaces, expected 2")]
    DanglingConnection { connection: String, members: usize },

    #[error("connection {connection} needs a link address but neither AS declares networks_space")]
    MissingLinkPrefix { connection: String },

    #[error("{router} has no loopback address; loopbacks must be allocated first")]
    MissingLoopback { router: String },

    // Consistency violation
    #[error("OSPF metric mismatch between {local} ({local_metric}) and {remote} ({remote_metric})")]
    MetricMismatch {
        local: String,
        local_metric: u32,
        remote: String,
        remote_metric: u32,
    },

    // Resource exhaustion
    #[error("address space {prefix} exhausted while allocating {purpose}")]
    AddressExhausted {
        prefix: Ipv6Net,
        purpose: &'static str,
    },
}
