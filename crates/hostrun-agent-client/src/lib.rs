//! HTTP client for the remote-execution agent REST API.
//!
//! Implements the `hostrun-dispatch` backend traits over plain
//! request/response calls; no connection is held between polls.

pub mod client;
pub mod types;

pub use client::AgentClient;
