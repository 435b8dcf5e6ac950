//! Shared utilities: IPv6 prefix arithmetic.

pub mod ip_utils;

pub use ip_utils::{address_count, nth_address, nth_host, nth_subnet};
