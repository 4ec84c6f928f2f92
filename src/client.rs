//! Wire client for talking to cluster peers.
//!
//! The agent only ever needs four calls against a peer: list machines,
//! fetch the cluster configuration, fetch the protocol version, and
//! issue a join request.  [`ClusterClient`] captures that contract
//! (manual desugaring with pinned futures so it stays object-safe),
//! and [`HttpClusterClient`] implements it over the peers' admin HTTP
//! API.  Every call is treated as potentially failing; retries happen
//! by moving to the next candidate peer or the next polling tick,
//! never by re-issuing a call in place.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::errors::StandbyError;
use crate::types::{ClusterSettings, JoinRequest, Machine};

/// Response body of a join request.
#[derive(Debug, Deserialize)]
pub struct JoinResponse {
    /// Replicated-log position at which the membership change committed.
    #[serde(rename = "commitIndex")]
    pub commit_index: u64,
}

/// Abstract peer client used by the standby agent.
///
/// Implemented over HTTP in production and by an in-memory mock in the
/// agent tests.
pub trait ClusterClient: Send + Sync {
    /// Fetch the current member list from `peer`.
    fn get_machines<'a>(
        &'a self,
        peer: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Machine>, StandbyError>> + Send + 'a>>;

    /// Fetch the cluster configuration from `peer`.
    fn get_cluster_config<'a>(
        &'a self,
        peer: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ClusterSettings, StandbyError>> + Send + 'a>>;

    /// Fetch the internal protocol version `peer` speaks.
    fn get_version<'a>(
        &'a self,
        peer: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<u64, StandbyError>> + Send + 'a>>;

    /// Ask `peer` (the leader) to add this node as a full member.
    fn add_machine<'a>(
        &'a self,
        peer: &'a str,
        join: &'a JoinRequest,
    ) -> Pin<Box<dyn Future<Output = Result<u64, StandbyError>> + Send + 'a>>;
}

/// [`ClusterClient`] over the peers' admin HTTP API.
pub struct HttpClusterClient {
    http: reqwest::Client,
}

impl HttpClusterClient {
    /// Build a client with the given per-request timeout.
    ///
    /// The timeout is the only retry-adjacent policy this layer owns;
    /// a timed-out call surfaces as an RPC error and the agent moves
    /// on to the next candidate or the next tick.
    pub fn new(request_timeout: Duration) -> Result<Self, StandbyError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(HttpClusterClient { http })
    }
}

impl ClusterClient for HttpClusterClient {
    fn get_machines<'a>(
        &'a self,
        peer: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Machine>, StandbyError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{peer}/v2/admin/machines");
            debug!("fetching machine list from {url}");
            let machines = self
                .http
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .json::<Vec<Machine>>()
                .await?;
            Ok(machines)
        })
    }

    fn get_cluster_config<'a>(
        &'a self,
        peer: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ClusterSettings, StandbyError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{peer}/v2/admin/config");
            debug!("fetching cluster config from {url}");
            let settings = self
                .http
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .json::<ClusterSettings>()
                .await?;
            Ok(settings)
        })
    }

    fn get_version<'a>(
        &'a self,
        peer: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<u64, StandbyError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{peer}/version");
            debug!("fetching version from {url}");
            let body = self
                .http
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?;
            // The version endpoint answers with a bare integer.
            let version: u64 = serde_json::from_str(body.trim())?;
            Ok(version)
        })
    }

    fn add_machine<'a>(
        &'a self,
        peer: &'a str,
        join: &'a JoinRequest,
    ) -> Pin<Box<dyn Future<Output = Result<u64, StandbyError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{peer}/v2/admin/machines/{}", join.name);
            debug!("sending join request to {url}");
            let resp = self
                .http
                .put(&url)
                .json(join)
                .send()
                .await?
                .error_for_status()?
                .json::<JoinResponse>()
                .await?;
            Ok(resp.commit_index)
        })
    }
}
