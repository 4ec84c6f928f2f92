//! Anteroom — standby cluster-membership agent.
//!
//! A standby node is not yet a voting member of a replicated-log
//! cluster. This crate implements the half of the node that waits in
//! the anteroom: it discovers the cluster topology and its elected
//! leader, polls on a timer trying to join as a full member, redirects
//! client traffic to the leader in the meantime, and persists the
//! last-known topology so a restart resumes where it left off.
//!
//! The consensus engine, the full-member storage layer, and the admin
//! API served by voting members are external collaborators; this crate
//! only consumes their contracts (see [`client::ClusterClient`]).

pub mod agent;
pub mod client;
pub mod config;
pub mod errors;
pub mod server;
pub mod snapshot;
pub mod types;

pub use agent::StandbyAgent;
pub use client::{ClusterClient, HttpClusterClient};
pub use errors::StandbyError;
pub use types::{ClusterSettings, JoinRequest, Machine, MachineState, StandbyInfo};
