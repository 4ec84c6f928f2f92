//! The standby agent state machine.
//!
//! A standby node is not yet a voting member of the cluster.  The
//! agent discovers the current topology and leader, polls on a timer
//! trying to join as a full member, and keeps a disk snapshot of the
//! last-known topology so a restart does not lose the cluster view.
//!
//! All mutable shared state (topology, join index, run state, the
//! snapshot file) lives behind one exclusive lock.  Network calls are
//! made without holding it so a slow peer never blocks the redirect
//! handler's leader lookup or a concurrent `stop()`.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::ClusterClient;
use crate::config::NodeConfig;
use crate::errors::StandbyError;
use crate::snapshot::SnapshotStore;
use crate::types::{
    JoinRequest, Machine, StandbyInfo, DEFAULT_SYNC_INTERVAL, MAX_VERSION, MIN_VERSION,
};

/// Clamp a reported sync interval to something the loop timer can
/// use. Peers own the value, so a non-positive or non-finite report
/// must not be trusted: it would panic the timer conversion.
fn usable_sync_interval(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        warn!("ignoring unusable sync interval {seconds}, keeping default {DEFAULT_SYNC_INTERVAL}");
        DEFAULT_SYNC_INTERVAL
    }
}

/// State guarded by the agent's exclusive lock.
struct Inner {
    info: StandbyInfo,
    join_index: u64,
    snapshot: SnapshotStore,
    started: bool,
    shutdown_tx: Option<watch::Sender<bool>>,
    worker: Option<JoinHandle<()>>,
    stop_done_tx: Option<watch::Sender<bool>>,
    stop_done_rx: Option<watch::Receiver<bool>>,
    remove_tx: Option<oneshot::Sender<()>>,
    remove_rx: Option<oneshot::Receiver<()>>,
}

/// Cluster-membership agent for a node waiting to join.
pub struct StandbyAgent {
    config: NodeConfig,
    client: Arc<dyn ClusterClient>,
    inner: Mutex<Inner>,
}

impl StandbyAgent {
    /// Build an agent, opening (and if present, loading) the topology
    /// snapshot under the configured data directory.
    pub fn new(config: NodeConfig, client: Arc<dyn ClusterClient>) -> Result<Self, StandbyError> {
        std::fs::create_dir_all(&config.data_dir)?;
        let mut snapshot = SnapshotStore::open(Path::new(&config.data_dir))?;
        let info = snapshot.load().unwrap_or_default();

        Ok(StandbyAgent {
            config,
            client,
            inner: Mutex::new(Inner {
                info,
                join_index: 0,
                snapshot,
                started: false,
                shutdown_tx: None,
                worker: None,
                stop_done_tx: None,
                stop_done_rx: None,
                remove_tx: None,
                remove_rx: None,
            }),
        })
    }

    // -- Lifecycle -----------------------------------------------------------

    /// Launch the background polling loop. No-op if already running.
    pub fn start(self: &Arc<Self>) {
        let mut inner = self.inner.lock().unwrap();
        if inner.started {
            return;
        }
        inner.started = true;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (stop_done_tx, stop_done_rx) = watch::channel(false);
        let (remove_tx, remove_rx) = oneshot::channel();
        inner.shutdown_tx = Some(shutdown_tx);
        inner.stop_done_tx = Some(stop_done_tx);
        inner.stop_done_rx = Some(stop_done_rx);
        inner.remove_tx = Some(remove_tx);
        inner.remove_rx = Some(remove_rx);

        let agent = Arc::clone(self);
        inner.worker = Some(tokio::spawn(async move {
            agent.monitor_cluster(shutdown_rx).await;
        }));
        info!("standby agent started");
    }

    /// Stop the agent gracefully.
    ///
    /// Blocks until the polling loop has fully exited and the
    /// persisted snapshot is cleared, so the next standby episode
    /// starts fresh. Concurrent callers all block until that cleanup
    /// is done; no polling activity survives any `stop()` return.
    pub async fn stop(&self) {
        // The guard must go out of scope before any await so the
        // future stays `Send`; the not-started branch therefore hands
        // its receiver out of the block instead of awaiting inside it.
        let handoff = {
            let mut inner = self.inner.lock().unwrap();
            if !inner.started {
                // Another caller owns the shutdown; wait for its
                // cleanup to land before returning.
                Err(inner.stop_done_rx.clone())
            } else {
                inner.started = false;
                if let Some(tx) = inner.shutdown_tx.take() {
                    let _ = tx.send(true);
                }
                Ok((inner.worker.take(), inner.stop_done_tx.take()))
            }
        };
        let (worker, done_tx) = match handoff {
            Err(done_rx) => {
                if let Some(mut rx) = done_rx {
                    if !*rx.borrow() {
                        let _ = rx.changed().await;
                    }
                }
                return;
            }
            Ok(parts) => parts,
        };

        // Await the worker outside the lock: a mid-iteration commit
        // still needs the lock to land before the task can exit.
        if let Some(worker) = worker {
            let _ = worker.await;
        }

        {
            let mut inner = self.inner.lock().unwrap();
            if let Err(err) = inner.snapshot.clear() {
                warn!("error clearing cluster info for standby: {err}");
            }
        }

        if let Some(tx) = done_tx {
            let _ = tx.send(true);
        }
        info!("standby agent stopped");
    }

    /// One-shot notification fired when the node has joined the
    /// cluster and left standby mode. The owner consumes it exactly
    /// once; `None` if the agent was never started or it was already
    /// taken.
    pub fn remove_notify(&self) -> Option<oneshot::Receiver<()>> {
        self.inner.lock().unwrap().remove_rx.take()
    }

    /// Whether the polling loop is currently running.
    pub fn is_running(&self) -> bool {
        self.inner.lock().unwrap().started
    }

    // -- Accessors -----------------------------------------------------------

    /// Whether the on-disk snapshot reflects the in-memory topology.
    pub fn cluster_recorded(&self) -> bool {
        self.inner.lock().unwrap().snapshot.recorded()
    }

    /// Number of known cluster members.
    pub fn cluster_size(&self) -> usize {
        self.inner.lock().unwrap().info.cluster.len()
    }

    /// Peer URLs of the known members, in cluster order.
    pub fn cluster_urls(&self) -> Vec<String> {
        self.inner.lock().unwrap().info.peer_urls()
    }

    /// The member currently in the leader state, if any.
    pub fn cluster_leader(&self) -> Option<Machine> {
        self.inner.lock().unwrap().info.leader().cloned()
    }

    /// Log position recorded by a successful join; zero until then.
    pub fn join_index(&self) -> u64 {
        self.inner.lock().unwrap().join_index
    }

    /// Current polling interval, in seconds.
    pub fn sync_interval(&self) -> f64 {
        self.inner.lock().unwrap().info.sync_interval
    }

    /// Override the polling interval, in seconds. Non-positive and
    /// non-finite values are rejected in favor of the default.
    pub fn set_sync_interval(&self, seconds: f64) {
        self.inner.lock().unwrap().info.sync_interval = usable_sync_interval(seconds);
    }

    /// Replace the in-memory cluster view directly.
    #[cfg(test)]
    pub(crate) fn set_cluster(&self, cluster: Vec<Machine>) {
        self.inner.lock().unwrap().info.cluster = cluster;
    }

    // -- Cluster sync --------------------------------------------------------

    /// Refresh the topology from the first reachable candidate peer.
    ///
    /// `peers` are operator-supplied hints; they are normalized to the
    /// configured peer scheme and tried after the currently-known
    /// members, so a previously-synced topology wins over fresh hints.
    pub async fn sync_cluster(&self, peers: &[String]) -> Result<(), StandbyError> {
        let hinted: Vec<String> = peers.iter().map(|p| self.full_peer_url(p)).collect();

        match self.sync_cluster_inner(&hinted).await {
            Ok(()) => {
                info!("set cluster({:?}) for standby agent", self.cluster_urls());
                Ok(())
            }
            Err(err) => {
                info!("fail syncing cluster({:?}): {err}", self.cluster_urls());
                Err(err)
            }
        }
    }

    async fn sync_cluster_inner(&self, hinted: &[String]) -> Result<(), StandbyError> {
        let mut candidates = self.cluster_urls();
        candidates.extend_from_slice(hinted);

        for peer in &candidates {
            // Fetch the current member list, then the cluster config.
            // Both must succeed for this candidate to win.
            let machines = match self.client.get_machines(peer).await {
                Ok(machines) => machines,
                Err(err) => {
                    debug!("fail getting machine list from {peer}: {err}");
                    continue;
                }
            };
            let settings = match self.client.get_cluster_config(peer).await {
                Ok(settings) => settings,
                Err(err) => {
                    debug!("fail getting cluster config from {peer}: {err}");
                    continue;
                }
            };

            let mut inner = self.inner.lock().unwrap();
            inner.info.cluster = machines;
            inner.info.sync_interval = usable_sync_interval(settings.sync_interval);
            let info = inner.info.clone();
            if let Err(err) = inner.snapshot.save(&info) {
                // The in-memory update stands; the disk copy goes stale.
                warn!("fail saving cluster info to disk: {err}");
            }
            return Ok(());
        }

        Err(StandbyError::UnreachableCluster)
    }

    // -- Join ----------------------------------------------------------------

    /// Attempt to join the cluster through the leader at `peer`.
    ///
    /// Checks version compatibility and cluster capacity first; on
    /// success records the commit index of the membership change.
    pub async fn join(&self, peer: &str) -> Result<(), StandbyError> {
        let version = self.client.get_version(peer).await?;
        if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
            debug!("fail passing version compatibility({MIN_VERSION}-{MAX_VERSION}) using {version}");
            return Err(StandbyError::IncompatibleVersion {
                version,
                min: MIN_VERSION,
                max: MAX_VERSION,
            });
        }

        let settings = self.client.get_cluster_config(peer).await?;
        let cluster_size = self.cluster_size();
        if settings.active_size <= cluster_size {
            debug!("stop joining because the cluster is full with {cluster_size} nodes");
            return Err(StandbyError::ClusterFull {
                active_size: settings.active_size,
                cluster_size,
            });
        }

        let join = JoinRequest {
            min_version: MIN_VERSION,
            max_version: MAX_VERSION,
            name: self.config.name.clone(),
            peer_url: self.config.peer_url.clone(),
            client_url: self.config.client_url.clone(),
        };
        let commit_index = self.client.add_machine(peer, &join).await?;

        self.inner.lock().unwrap().join_index = commit_index;
        Ok(())
    }

    // -- Polling loop --------------------------------------------------------

    /// Background loop: wait, sync, find the leader, try to join.
    ///
    /// The wait comes first: the node is assumed to have already tried
    /// and failed to join once at startup, so it backs off before
    /// retrying. On a successful join the loop stops the agent and
    /// fires the removed notification, then exits.
    async fn monitor_cluster(self: Arc<Self>, mut shutdown_rx: watch::Receiver<bool>) {
        loop {
            let interval = {
                let inner = self.inner.lock().unwrap();
                Duration::from_secs_f64(inner.info.sync_interval)
            };
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown_rx.changed() => return,
            }
            if *shutdown_rx.borrow() {
                return;
            }

            if let Err(err) = self.sync_cluster_inner(&[]).await {
                warn!("fail syncing cluster({:?}): {err}", self.cluster_urls());
                continue;
            }

            let leader = match self.cluster_leader() {
                Some(leader) => leader,
                None => {
                    warn!("fail getting leader from cluster({:?})", self.cluster_urls());
                    continue;
                }
            };

            if let Err(err) = self.join(&leader.peer_url).await {
                debug!("fail joining through leader {}: {err}", leader.peer_url);
                continue;
            }

            info!("joined cluster through leader {}", leader.peer_url);
            let agent = Arc::clone(&self);
            tokio::spawn(async move {
                agent.stop().await;
                let remove_tx = agent.inner.lock().unwrap().remove_tx.take();
                if let Some(tx) = remove_tx {
                    let _ = tx.send(());
                }
            });
            return;
        }
    }

    // -- Helpers -------------------------------------------------------------

    /// Force the configured peer scheme onto an operator-supplied
    /// address, which may arrive with no scheme or the wrong one.
    fn full_peer_url(&self, addr: &str) -> String {
        let scheme = &self.config.peer_scheme;
        match addr.split_once("://") {
            Some((_, rest)) => format!("{scheme}://{rest}"),
            None => format!("{scheme}://{addr}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClusterSettings, MachineState};
    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// In-memory peer universe: only peers present in the maps answer.
    #[derive(Default)]
    struct MockClient {
        machines: HashMap<String, Vec<Machine>>,
        settings: HashMap<String, ClusterSettings>,
        versions: HashMap<String, u64>,
        commit_index: u64,
        reject_join: bool,
        /// Artificial latency applied to machine-list fetches.
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    fn unreachable(peer: &str) -> StandbyError {
        StandbyError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            format!("{peer} unreachable"),
        ))
    }

    impl ClusterClient for MockClient {
        fn get_machines<'a>(
            &'a self,
            peer: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<Machine>, StandbyError>> + Send + 'a>>
        {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }
                self.machines
                    .get(peer)
                    .cloned()
                    .ok_or_else(|| unreachable(peer))
            })
        }

        fn get_cluster_config<'a>(
            &'a self,
            peer: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<ClusterSettings, StandbyError>> + Send + 'a>>
        {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                self.settings
                    .get(peer)
                    .cloned()
                    .ok_or_else(|| unreachable(peer))
            })
        }

        fn get_version<'a>(
            &'a self,
            peer: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<u64, StandbyError>> + Send + 'a>> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                self.versions
                    .get(peer)
                    .copied()
                    .ok_or_else(|| unreachable(peer))
            })
        }

        fn add_machine<'a>(
            &'a self,
            peer: &'a str,
            _join: &'a JoinRequest,
        ) -> Pin<Box<dyn Future<Output = Result<u64, StandbyError>> + Send + 'a>> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if self.reject_join {
                    Err(unreachable(peer))
                } else {
                    Ok(self.commit_index)
                }
            })
        }
    }

    fn machine(name: &str, state: MachineState) -> Machine {
        Machine {
            name: name.to_string(),
            peer_url: format!("http://{name}:7001"),
            client_url: format!("http://{name}:4001"),
            state,
        }
    }

    fn node_config(tmp: &TempDir) -> NodeConfig {
        NodeConfig {
            name: "standby-1".to_string(),
            peer_scheme: "http".to_string(),
            peer_url: "http://standby-1:7001".to_string(),
            client_url: "http://standby-1:4001".to_string(),
            data_dir: tmp.path().to_str().unwrap().to_string(),
        }
    }

    /// Mock where peer "b" is the leader of a one-member cluster that
    /// has room for one more node.
    fn reachable_b() -> MockClient {
        let mut client = MockClient {
            commit_index: 42,
            ..MockClient::default()
        };
        let b = "http://b:7001".to_string();
        client
            .machines
            .insert(b.clone(), vec![machine("b", MachineState::Leader)]);
        client.settings.insert(
            b.clone(),
            ClusterSettings {
                active_size: 9,
                sync_interval: 0.05,
            },
        );
        client.versions.insert(b, 2);
        client
    }

    fn agent_with(client: MockClient, tmp: &TempDir) -> Arc<StandbyAgent> {
        Arc::new(StandbyAgent::new(node_config(tmp), Arc::new(client)).unwrap())
    }

    #[tokio::test]
    async fn sync_adopts_first_candidate_answering_both_calls() {
        let tmp = TempDir::new().unwrap();
        let agent = agent_with(reachable_b(), &tmp);

        // a and c never answer; b answers both calls.
        let hints = vec![
            "a:7001".to_string(),
            "b:7001".to_string(),
            "c:7001".to_string(),
        ];
        agent.sync_cluster(&hints).await.unwrap();

        assert_eq!(agent.cluster_size(), 1);
        assert_eq!(agent.cluster_urls(), vec!["http://b:7001".to_string()]);
        assert!(agent.cluster_recorded());
    }

    #[tokio::test]
    async fn sync_with_all_candidates_unreachable_leaves_state() {
        let tmp = TempDir::new().unwrap();
        let agent = agent_with(MockClient::default(), &tmp);

        let err = agent
            .sync_cluster(&["a:7001".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, StandbyError::UnreachableCluster));
        assert_eq!(agent.cluster_size(), 0);
        assert!(!agent.cluster_recorded());
    }

    #[tokio::test]
    async fn sync_normalizes_hint_scheme() {
        let tmp = TempDir::new().unwrap();
        let agent = agent_with(reachable_b(), &tmp);

        // The mock only knows "http://b:7001"; the hint carries the
        // wrong scheme and must be rewritten before the fetch.
        agent
            .sync_cluster(&["https://b:7001".to_string()])
            .await
            .unwrap();
        assert_eq!(agent.cluster_size(), 1);
    }

    #[tokio::test]
    async fn join_rejects_incompatible_version() {
        let tmp = TempDir::new().unwrap();
        let mut client = reachable_b();
        client.versions.insert("http://b:7001".to_string(), 1);
        let agent = agent_with(client, &tmp);

        let err = agent.join("http://b:7001").await.unwrap_err();
        assert!(matches!(err, StandbyError::IncompatibleVersion { version: 1, .. }));
        assert_eq!(agent.join_index(), 0);
    }

    #[tokio::test]
    async fn join_rejects_full_cluster() {
        let tmp = TempDir::new().unwrap();
        let mut client = reachable_b();
        client.settings.insert(
            "http://b:7001".to_string(),
            ClusterSettings {
                active_size: 1,
                sync_interval: 0.05,
            },
        );
        let agent = agent_with(client, &tmp);
        agent.sync_cluster(&["b:7001".to_string()]).await.unwrap();

        // Known cluster size is 1 and active_size is 1: no room.
        let err = agent.join("http://b:7001").await.unwrap_err();
        assert!(matches!(
            err,
            StandbyError::ClusterFull {
                active_size: 1,
                cluster_size: 1,
            }
        ));
        assert_eq!(agent.join_index(), 0);
    }

    #[tokio::test]
    async fn join_records_commit_index() {
        let tmp = TempDir::new().unwrap();
        let agent = agent_with(reachable_b(), &tmp);
        agent.sync_cluster(&["b:7001".to_string()]).await.unwrap();

        agent.join("http://b:7001").await.unwrap();
        assert_eq!(agent.join_index(), 42);
    }

    #[tokio::test]
    async fn join_failure_leaves_join_index() {
        let tmp = TempDir::new().unwrap();
        let mut client = reachable_b();
        client.reject_join = true;
        let agent = agent_with(client, &tmp);

        assert!(agent.join("http://b:7001").await.is_err());
        assert_eq!(agent.join_index(), 0);
    }

    #[tokio::test]
    async fn start_and_stop_are_idempotent() {
        let tmp = TempDir::new().unwrap();
        let agent = agent_with(MockClient::default(), &tmp);

        agent.start();
        agent.start();
        assert!(agent.is_running());
        // The notification channel belongs to the first start.
        assert!(agent.remove_notify().is_some());
        assert!(agent.remove_notify().is_none());

        agent.stop().await;
        assert!(!agent.is_running());
        agent.stop().await;
        assert!(!agent.is_running());
    }

    #[tokio::test]
    async fn stop_halts_polling_and_clears_snapshot() {
        let tmp = TempDir::new().unwrap();
        let client = Arc::new(MockClient::default());
        let agent = Arc::new(
            StandbyAgent::new(node_config(&tmp), Arc::clone(&client) as Arc<dyn ClusterClient>)
                .unwrap(),
        );
        agent.set_sync_interval(0.01);

        // Seed a known member so each tick makes network calls.
        agent.set_cluster(vec![machine("a", MachineState::Follower)]);

        agent.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        agent.stop().await;

        let calls_at_stop = client.calls.load(Ordering::SeqCst);
        assert!(calls_at_stop > 0, "loop never polled");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(client.calls.load(Ordering::SeqCst), calls_at_stop);
        assert!(!agent.cluster_recorded());
    }

    #[test]
    fn set_sync_interval_rejects_unusable_values() {
        let tmp = TempDir::new().unwrap();
        let agent = agent_with(MockClient::default(), &tmp);

        agent.set_sync_interval(2.5);
        assert_eq!(agent.sync_interval(), 2.5);

        agent.set_sync_interval(0.0);
        assert_eq!(agent.sync_interval(), DEFAULT_SYNC_INTERVAL);
        agent.set_sync_interval(-3.0);
        assert_eq!(agent.sync_interval(), DEFAULT_SYNC_INTERVAL);
        agent.set_sync_interval(f64::NAN);
        assert_eq!(agent.sync_interval(), DEFAULT_SYNC_INTERVAL);
    }

    #[tokio::test]
    async fn sync_falls_back_to_default_on_bad_interval() {
        let tmp = TempDir::new().unwrap();
        let mut client = reachable_b();
        client.settings.insert(
            "http://b:7001".to_string(),
            ClusterSettings {
                active_size: 9,
                sync_interval: -1.0,
            },
        );
        let agent = agent_with(client, &tmp);

        agent.sync_cluster(&["b:7001".to_string()]).await.unwrap();
        assert_eq!(agent.sync_interval(), DEFAULT_SYNC_INTERVAL);

        // The worker must keep running on the fallback interval.
        agent.start();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(agent.is_running());
        agent.stop().await;
    }

    #[tokio::test]
    async fn late_stop_waits_for_cleanup() {
        let tmp = TempDir::new().unwrap();
        let mut client = reachable_b();
        // Slow machine-list fetches keep the worker mid-iteration when
        // stop arrives; no version entry keeps join attempts failing.
        client.delay = Some(Duration::from_millis(300));
        client.versions.clear();
        client.settings.insert(
            "http://b:7001".to_string(),
            ClusterSettings {
                active_size: 9,
                sync_interval: 0.01,
            },
        );
        let agent = agent_with(client, &tmp);

        agent.sync_cluster(&["b:7001".to_string()]).await.unwrap();
        assert!(agent.cluster_recorded());

        agent.start();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let first = {
            let agent = Arc::clone(&agent);
            tokio::spawn(async move { agent.stop().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        // This caller arrives while the first stop is still awaiting
        // the worker; it must not return before cleanup is done.
        agent.stop().await;
        assert!(!agent.is_running());
        assert!(!agent.cluster_recorded());

        first.await.unwrap();
    }

    #[tokio::test]
    async fn polling_loop_joins_and_fires_remove_notify() {
        let tmp = TempDir::new().unwrap();
        let agent = agent_with(reachable_b(), &tmp);

        // Operator hint seeds the topology; the loop takes it from there.
        agent.sync_cluster(&["b:7001".to_string()]).await.unwrap();

        agent.start();
        let notify = agent.remove_notify().unwrap();

        tokio::time::timeout(Duration::from_secs(5), notify)
            .await
            .expect("timed out waiting for standby removal")
            .expect("notification sender dropped");

        assert!(!agent.is_running());
        assert_eq!(agent.join_index(), 42);
        // Stop cleared the snapshot for the next standby episode.
        assert!(!agent.cluster_recorded());
    }

    #[tokio::test]
    async fn restart_recovers_topology_from_snapshot() {
        let tmp = TempDir::new().unwrap();
        {
            let agent = agent_with(reachable_b(), &tmp);
            agent.sync_cluster(&["b:7001".to_string()]).await.unwrap();
        }

        // A new agent over the same data dir cold-starts from disk.
        let agent = agent_with(MockClient::default(), &tmp);
        assert!(agent.cluster_recorded());
        assert_eq!(agent.cluster_urls(), vec!["http://b:7001".to_string()]);
        assert_eq!(agent.cluster_leader().unwrap().name, "b");
    }
}
