//! Networking modules for the admin REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` defines the service traits and their `gloo-net` implementation, and
//! `types` defines the wire schema plus the client session model.

pub mod api;
pub mod types;
