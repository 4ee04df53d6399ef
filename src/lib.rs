//! Client library for HAL-style REST management APIs.
//!
//! - [`api`] - Session, transport and the self-reauthenticating client
//! - [`resource`] - Name-filtered lookups and hierarchical path resolution
//! - [`config`] - Persistent connection settings

pub mod api;
pub mod config;
pub mod resource;
