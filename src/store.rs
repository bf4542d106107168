use crate::analytics::apply_order_at;
use crate::errors::AnalyticsError;
use crate::models::{AnalyticsSnapshot, NewOrder, SeedOutcome};
use crate::storage::{KvStorage, SeedSource};
use chrono::{DateTime, Local, TimeZone};
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};
use tracing::{info, warn};

pub const STORAGE_KEY: &str = "boostly-analytics";

const UPDATE_CHANNEL_CAPACITY: usize = 32;

/// Owner of the analytics snapshot.
///
/// Every read-merge-write goes through the one storage lock, and listeners
/// registered with [`AnalyticsStore::subscribe`] receive the snapshot after
/// each successful write.
#[derive(Clone)]
pub struct AnalyticsStore {
    storage: Arc<Mutex<KvStorage>>,
    seed: SeedSource,
    updates: broadcast::Sender<AnalyticsSnapshot>,
}

impl AnalyticsStore {
    pub fn new(storage: KvStorage, seed: SeedSource) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            storage: Arc::new(Mutex::new(storage)),
            seed,
            updates,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AnalyticsSnapshot> {
        self.updates.subscribe()
    }

    /// The stored snapshot, with read and parse failures surfaced.
    pub async fn load(&self) -> Result<Option<AnalyticsSnapshot>, AnalyticsError> {
        let storage = self.storage.lock().await;
        read_snapshot(&storage).await
    }

    /// The stored snapshot, or `None` when it is absent or unreadable.
    pub async fn snapshot(&self) -> Option<AnalyticsSnapshot> {
        match self.load().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("treating analytics snapshot as absent: {err}");
                None
            }
        }
    }

    pub async fn persist(&self, snapshot: &AnalyticsSnapshot) -> Result<(), AnalyticsError> {
        let storage = self.storage.lock().await;
        self.write_snapshot(&storage, snapshot).await
    }

    /// Stores the seed document when no snapshot exists yet.
    pub async fn seed_if_needed(&self) -> Result<SeedOutcome, AnalyticsError> {
        let storage = self.storage.lock().await;
        if let Ok(Some(_)) = read_snapshot(&storage).await {
            return Ok(SeedOutcome::AlreadySeeded);
        }

        let seed = match self.seed.fetch().await {
            Ok(seed) => seed,
            Err(err) => {
                warn!("could not seed analytics: {err}");
                return Err(err);
            }
        };
        // The seed text is stored as-is, not re-serialized.
        self.write_payload(&storage, &seed.raw, &seed.snapshot).await?;
        info!("seeded analytics snapshot");
        Ok(SeedOutcome::Seeded)
    }

    pub async fn record_order(&self, order: NewOrder) -> Result<AnalyticsSnapshot, AnalyticsError> {
        self.record_order_at(order, &Local::now()).await
    }

    /// Folds `order` into the stored snapshot.
    ///
    /// Without a snapshot the order is dropped: a seed attempt is started in
    /// the background and `NotSeeded` is returned straight away.
    pub async fn record_order_at<Tz: TimeZone>(
        &self,
        order: NewOrder,
        now: &DateTime<Tz>,
    ) -> Result<AnalyticsSnapshot, AnalyticsError> {
        let storage = self.storage.lock().await;
        let existing = match read_snapshot(&storage).await {
            Ok(existing) => existing,
            Err(err) => {
                warn!("ignoring unreadable analytics snapshot: {err}");
                None
            }
        };

        let Some(mut snapshot) = existing else {
            drop(storage);
            warn!("no analytics snapshot to write to, attempting to seed first");
            let store = self.clone();
            tokio::spawn(async move {
                let _ = store.seed_if_needed().await;
            });
            return Err(AnalyticsError::NotSeeded);
        };

        apply_order_at(&mut snapshot, &order, now);
        self.write_snapshot(&storage, &snapshot).await?;
        Ok(snapshot)
    }

    async fn write_snapshot(
        &self,
        storage: &KvStorage,
        snapshot: &AnalyticsSnapshot,
    ) -> Result<(), AnalyticsError> {
        let payload = match serde_json::to_string(snapshot) {
            Ok(payload) => payload,
            Err(err) => {
                let err = AnalyticsError::Serialize(err);
                warn!("could not save analytics: {err}");
                return Err(err);
            }
        };
        self.write_payload(storage, &payload, snapshot).await
    }

    /// Writes `payload` under the storage key and announces `snapshot` once
    /// the write has landed.
    async fn write_payload(
        &self,
        storage: &KvStorage,
        payload: &str,
        snapshot: &AnalyticsSnapshot,
    ) -> Result<(), AnalyticsError> {
        let result = storage
            .set(STORAGE_KEY, payload)
            .await
            .map_err(AnalyticsError::StorageWrite);

        match result {
            Ok(()) => {
                // No receivers is not an error.
                let _ = self.updates.send(snapshot.clone());
                Ok(())
            }
            Err(err) => {
                warn!("could not save analytics: {err}");
                Err(err)
            }
        }
    }
}

async fn read_snapshot(storage: &KvStorage) -> Result<Option<AnalyticsSnapshot>, AnalyticsError> {
    let Some(raw) = storage
        .get(STORAGE_KEY)
        .await
        .map_err(AnalyticsError::StorageRead)?
    else {
        return Ok(None);
    };
    serde_json::from_str(&raw).map(Some).map_err(AnalyticsError::Corrupt)
}
