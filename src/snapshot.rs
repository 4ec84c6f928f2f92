//! Persisted topology snapshot.
//!
//! The agent mirrors its last-known cluster view into a single JSON
//! file under the data directory so a restarted standby node starts
//! from the topology it last saw instead of an empty peer list.  The
//! file is opened once at construction and held for the life of the
//! agent; the caller serializes access through the agent's lock.
//!
//! A save is clear-then-encode-then-flush and is not crash-atomic: a
//! crash inside that window leaves an empty file, which the next load
//! treats as "no prior snapshot".

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::errors::StandbyError;
use crate::types::StandbyInfo;

/// File name of the snapshot inside the data directory.
const STANDBY_INFO_NAME: &str = "standby_info";

/// Disk-backed store for the agent's last-known topology.
pub struct SnapshotStore {
    file: File,
    recorded: bool,
}

impl SnapshotStore {
    /// Open or create the snapshot file under `data_dir`.
    ///
    /// An open failure here usually means the data directory itself is
    /// unusable, so it is surfaced to the agent's creator.
    pub fn open(data_dir: &Path) -> Result<Self, StandbyError> {
        let path = data_dir.join(STANDBY_INFO_NAME);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;
        Ok(SnapshotStore {
            file,
            recorded: false,
        })
    }

    /// Whether the on-disk snapshot currently reflects the in-memory
    /// topology.
    pub fn recorded(&self) -> bool {
        self.recorded
    }

    /// Decode the snapshot, if one was written by a previous run.
    ///
    /// An empty or corrupt file is expected on first run and yields
    /// `None` without marking the snapshot as recorded.
    pub fn load(&mut self) -> Option<StandbyInfo> {
        if let Err(err) = self.file.seek(SeekFrom::Start(0)) {
            debug!("failed seeking snapshot file: {err}");
            return None;
        }
        match serde_json::from_reader::<_, StandbyInfo>(&self.file) {
            Ok(info) => {
                self.recorded = true;
                Some(info)
            }
            Err(err) => {
                debug!("no usable snapshot on disk: {err}");
                None
            }
        }
    }

    /// Replace the on-disk snapshot with `info`.
    ///
    /// The previous contents are truncated first, so the file never
    /// holds a mix of old and new records.
    pub fn save(&mut self, info: &StandbyInfo) -> Result<(), StandbyError> {
        self.clear()?;
        serde_json::to_writer(&self.file, info)?;
        self.file.sync_all()?;
        self.recorded = true;
        Ok(())
    }

    /// Truncate the snapshot. Idempotent; used before each save and on
    /// shutdown so a fresh standby episode starts from empty.
    pub fn clear(&mut self) -> Result<(), StandbyError> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.set_len(0)?;
        self.recorded = false;
        Ok(())
    }
}
