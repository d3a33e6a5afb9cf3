//! Multiplayer sync backend over a [`DocumentStore`].
//!
//! Bridges the synchronous client loop with the async store. Writes are queued to a single
//! writer task, so they reach the store in submission order without the caller waiting on
//! them. A second task forwards pushed snapshots, decoded, into a channel that
//! [`MatchSync::poll_snapshot`] drains with `try_recv`.

use std::sync::Arc;

use log::{debug, warn};
use serde_json::{Map, Value};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::engine::{MatchSync, SyncError};
use crate::core::{MatchState, UpdateSet};
use crate::protocol::{decode_snapshot, update_to_fields};
use crate::store::{DocumentStore, Precondition, StoreError};

enum WriteOp {
    Update {
        fields: Map<String, Value>,
        precondition: Option<Precondition>,
    },
    Flush(oneshot::Sender<()>),
}

pub struct StoreSync {
    match_id: String,
    writes: mpsc::UnboundedSender<WriteOp>,
    snapshots: mpsc::UnboundedReceiver<MatchState>,
    tasks: [JoinHandle<()>; 2],
}

impl StoreSync {
    /// Subscribe to `match_id` and start the writer and snapshot tasks on the current runtime.
    pub async fn connect(
        store: Arc<dyn DocumentStore>,
        match_id: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let match_id = match_id.into();
        let mut pushed = store.subscribe(&match_id).await?;

        let (snap_tx, snapshots) = mpsc::unbounded_channel::<MatchState>();
        let forward_id = match_id.clone();
        let forwarder = tokio::spawn(async move {
            loop {
                match pushed.recv().await {
                    Ok(value) => match decode_snapshot(value) {
                        Ok(state) => {
                            if snap_tx.send(state).is_err() {
                                break;
                            }
                        }
                        Err(err) => warn!("match {}: skipping snapshot: {}", forward_id, err),
                    },
                    Err(RecvError::Lagged(missed)) => {
                        debug!("match {}: {} snapshots superseded", forward_id, missed)
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        let (writes, mut write_rx) = mpsc::unbounded_channel::<WriteOp>();
        let write_id = match_id.clone();
        let writer = tokio::spawn(async move {
            while let Some(op) = write_rx.recv().await {
                match op {
                    WriteOp::Update {
                        fields,
                        precondition,
                    } => {
                        let paths: Vec<String> = fields.keys().cloned().collect();
                        match store.update(&write_id, fields, precondition).await {
                            Ok(()) => {}
                            Err(err) if err.is_precondition_failed() => {
                                warn!("match {}: lost race writing {:?}: {}", write_id, paths, err)
                            }
                            Err(err) => {
                                warn!("match {}: write {:?} failed: {}", write_id, paths, err)
                            }
                        }
                    }
                    WriteOp::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
        });

        Ok(Self {
            match_id,
            writes,
            snapshots,
            tasks: [forwarder, writer],
        })
    }

    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    /// Resolves once every write submitted so far has been attempted
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.writes.send(WriteOp::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }
}

impl MatchSync for StoreSync {
    fn apply_update(&mut self, update: UpdateSet) -> Result<(), SyncError> {
        let fields = update_to_fields(&update).map_err(SyncError::encode)?;
        let precondition = update
            .precondition()
            .map(|status| Precondition::new("status", status.as_str()));
        self.writes
            .send(WriteOp::Update {
                fields,
                precondition,
            })
            .map_err(|_| SyncError::Closed)
    }

    fn poll_snapshot(&mut self) -> Option<MatchState> {
        self.snapshots.try_recv().ok()
    }
}

impl Drop for StoreSync {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
