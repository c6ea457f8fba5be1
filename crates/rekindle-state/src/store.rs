// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared store base: a mutex-guarded map with debounced JSON persistence.
//!
//! Every concrete store (sessions, profiles, reminders, exchange cache)
//! wraps a `JsonStore<T>`: load on open, mutate under a write lock,
//! persist through the single-slot debouncer, flush unconditionally on
//! shutdown. Each mutation schedules a write carrying a snapshot taken
//! after that mutation; cancel-and-reschedule means only the last
//! snapshot in a burst reaches disk. A failed disk write is logged and
//! the in-memory map stays authoritative until the next successful write.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::debounce::Debouncer;
use crate::persist;

pub(crate) struct JsonStore<T> {
    map: RwLock<HashMap<String, T>>,
    path: PathBuf,
    debouncer: Debouncer,
}

impl<T> JsonStore<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Open a store backed by `path`, loading existing content.
    ///
    /// An unreadable or corrupt file is logged and the store starts
    /// empty; it will be overwritten by the next flush.
    pub(crate) async fn open(path: PathBuf, debounce: Duration) -> std::sync::Arc<Self> {
        let map = match persist::read_json::<HashMap<String, T>>(&path).await {
            Ok(Some(map)) => {
                info!(path = %path.display(), entries = map.len(), "state loaded");
                map
            }
            Ok(None) => HashMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load state, starting empty");
                HashMap::new()
            }
        };

        std::sync::Arc::new(Self {
            map: RwLock::new(map),
            path,
            debouncer: Debouncer::new(debounce),
        })
    }

    pub(crate) async fn get(&self, id: &str) -> Option<T> {
        self.map.read().await.get(id).cloned()
    }

    pub(crate) async fn snapshot(&self) -> HashMap<String, T> {
        self.map.read().await.clone()
    }

    pub(crate) async fn len(&self) -> usize {
        self.map.read().await.len()
    }

    /// Mutate the entry for `id`, creating it from `Default` when absent,
    /// and schedule a debounced persist.
    pub(crate) async fn with_entry<R>(&self, id: &str, f: impl FnOnce(&mut T) -> R) -> R
    where
        T: Default,
    {
        let result = {
            let mut map = self.map.write().await;
            f(map.entry(id.to_string()).or_default())
        };
        self.schedule_flush().await;
        result
    }

    /// Mutate the whole map and schedule a debounced persist.
    pub(crate) async fn with_map<R>(&self, f: impl FnOnce(&mut HashMap<String, T>) -> R) -> R {
        let result = {
            let mut map = self.map.write().await;
            f(&mut map)
        };
        self.schedule_flush().await;
        result
    }

    async fn schedule_flush(&self) {
        let snapshot = self.map.read().await.clone();
        let path = self.path.clone();
        self.debouncer
            .schedule(move || async move {
                write_snapshot(&path, &snapshot).await;
            })
            .await;
    }

    /// Cancel any pending debounced write and persist immediately.
    pub(crate) async fn flush_now(&self) {
        self.debouncer.cancel_pending().await;
        let snapshot = self.map.read().await.clone();
        write_snapshot(&self.path, &snapshot).await;
    }
}

async fn write_snapshot<T: Serialize>(path: &Path, snapshot: &HashMap<String, T>) {
    if let Err(e) = persist::write_json(path, snapshot).await {
        warn!(
            path = %path.display(),
            error = %e,
            "state write failed, in-memory state remains authoritative"
        );
    }
}
