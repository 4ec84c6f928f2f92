//! Wire and data types shared across the standby agent.
//!
//! Machine descriptors arrive from peers as JSON and are replaced
//! wholesale on every successful sync — they are never patched in
//! place. The persisted snapshot on disk uses the same types.

use serde::{Deserialize, Serialize};

/// Minimum internal protocol version this node can join.
pub const MIN_VERSION: u64 = 2;

/// Maximum internal protocol version this node can join.
pub const MAX_VERSION: u64 = 2;

/// Polling period, in seconds, used until a leader's cluster
/// configuration reports one.
pub const DEFAULT_SYNC_INTERVAL: f64 = 5.0;

/// Role of a cluster member as reported by a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineState {
    /// Accepts writes and join requests.
    Leader,
    /// Replicates the leader's log.
    Follower,
    /// Campaigning for leadership.
    Candidate,
}

/// One cluster member as observed from a peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    /// Logical node name.
    pub name: String,
    /// Cluster-internal (replication-facing) address.
    #[serde(rename = "peerURL")]
    pub peer_url: String,
    /// Address exposed for external client traffic.
    #[serde(rename = "clientURL")]
    pub client_url: String,
    /// Current role of the member.
    pub state: MachineState,
}

/// The agent's view of the cluster, mirrored to disk on every
/// successful sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandbyInfo {
    /// Members in the order the peer returned them.
    pub cluster: Vec<Machine>,
    /// Seconds between polling attempts. Always positive.
    #[serde(rename = "syncInterval")]
    pub sync_interval: f64,
}

impl Default for StandbyInfo {
    fn default() -> Self {
        StandbyInfo {
            cluster: Vec::new(),
            sync_interval: DEFAULT_SYNC_INTERVAL,
        }
    }
}

impl StandbyInfo {
    /// Peer URLs of the known members, in cluster order.
    pub fn peer_urls(&self) -> Vec<String> {
        self.cluster.iter().map(|m| m.peer_url.clone()).collect()
    }

    /// The member currently in the leader state, if any.
    pub fn leader(&self) -> Option<&Machine> {
        self.cluster
            .iter()
            .find(|m| m.state == MachineState::Leader)
    }
}

/// Cluster-wide settings fetched from a peer's admin config endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSettings {
    /// Maximum number of active (voting) members the cluster accepts.
    #[serde(rename = "activeSize")]
    pub active_size: usize,
    /// Seconds between standby polling attempts.
    #[serde(rename = "syncInterval")]
    pub sync_interval: f64,
}

/// Body of the join request sent to the leader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    /// Lowest protocol version this node speaks.
    #[serde(rename = "minVersion")]
    pub min_version: u64,
    /// Highest protocol version this node speaks.
    #[serde(rename = "maxVersion")]
    pub max_version: u64,
    /// This node's logical name.
    pub name: String,
    /// This node's replication-facing address.
    #[serde(rename = "peerURL")]
    pub peer_url: String,
    /// This node's client-facing address.
    #[serde(rename = "clientURL")]
    pub client_url: String,
}
