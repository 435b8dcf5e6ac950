//! IP address allocation module.
//!
//! This module assigns point-to-point link addresses and loopback addresses.
//! Link blocks are carved per AS from its `networks_space`, loopbacks from
//! its `loopback_space`.

pub mod as_manager;
pub mod link;
pub mod loopback;

// Re-export commonly used types
pub use as_manager::{AsSubnetManager, LINK_PREFIX_LEN};
pub use link::allocate_link_addresses;
pub use loopback::allocate_loopbacks;
