//! Provisioning of a token bridge: an asset on a source network, its paired
//! asset on a destination network, a gateway linking the two and the
//! one-time initialization of the destination asset.

pub mod cli;
pub mod config;
pub mod deployment;
pub mod error;
pub mod manifest;
pub mod network;
pub mod serde_utils;
pub mod template;
pub mod types;
