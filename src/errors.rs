//! Standby agent error types.
//!
//! Every variant maps to a distinct failure category so operators can
//! tell "cluster unreachable" from "wrong version" from "cluster full"
//! in the logs.  The enum implements [`axum::response::IntoResponse`]
//! so the redirect handler can simply return
//! `Err(StandbyError::NoLeader)` and the caller receives the
//! structured standby-internal error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Error code carried in the standby-internal JSON error body.
pub const CODE_STANDBY_INTERNAL: u32 = 402;

/// Failure categories for the standby agent.
#[derive(Debug, Error)]
pub enum StandbyError {
    /// Every sync candidate failed its machine-list or config fetch.
    #[error("unreachable cluster")]
    UnreachableCluster,

    /// The target leader speaks a protocol version outside our range.
    #[error("incompatible version {version} (supported {min}-{max})")]
    IncompatibleVersion { version: u64, min: u64, max: u64 },

    /// The cluster has no room for another active member.
    #[error("out of quota: cluster is full with {active_size} nodes")]
    ClusterFull {
        active_size: usize,
        cluster_size: usize,
    },

    /// No member of the known cluster is currently in the leader state.
    #[error("no leader in cluster")]
    NoLeader,

    /// An outbound RPC to a peer failed.
    #[error("peer request failed: {0}")]
    Rpc(#[from] reqwest::Error),

    /// A peer answered with an unexpected body.
    #[error("malformed peer response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Disk I/O on the snapshot file failed.
    #[error("snapshot i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl StandbyError {
    /// Short machine-readable tag for logs.
    pub fn code(&self) -> &'static str {
        match self {
            StandbyError::UnreachableCluster => "UnreachableCluster",
            StandbyError::IncompatibleVersion { .. } => "IncompatibleVersion",
            StandbyError::ClusterFull { .. } => "ClusterFull",
            StandbyError::NoLeader => "NoLeader",
            StandbyError::Rpc(_) => "RpcError",
            StandbyError::Decode(_) => "DecodeError",
            StandbyError::Io(_) => "IoError",
        }
    }
}

impl IntoResponse for StandbyError {
    fn into_response(self) -> Response {
        let body = json!({
            "errorCode": CODE_STANDBY_INTERNAL,
            "message": "Standby Internal Error",
            "cause": self.to_string(),
            "index": 0,
        });

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
