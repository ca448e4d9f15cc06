//! Configuration types
//!
//! Board-agnostic link configuration, stored as postcard binary data.

pub mod link;

pub use link::*;
