use crate::errors::AnalyticsError;
use crate::models::AnalyticsSnapshot;
use std::path::{Path, PathBuf};
use tokio::fs;

/// String key-value storage where each key is one JSON file under `root`.
#[derive(Debug, Clone)]
pub struct KvStorage {
    root: PathBuf,
}

impl KvStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, std::io::Error> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), std::io::Error> {
        fs::create_dir_all(&self.root).await?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

/// A seed as read from disk: the original text plus its parsed form.
#[derive(Debug, Clone)]
pub struct SeedDocument {
    pub raw: String,
    pub snapshot: AnalyticsSnapshot,
}

/// The static document a fresh store is initialised from.
#[derive(Debug, Clone)]
pub struct SeedSource {
    path: PathBuf,
}

impl SeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the seed from disk on every call. The text is only kept once it
    /// parses as a snapshot.
    pub async fn fetch(&self) -> Result<SeedDocument, AnalyticsError> {
        let raw = fs::read_to_string(&self.path)
            .await
            .map_err(|source| AnalyticsError::SeedRead {
                path: self.path.clone(),
                source,
            })?;
        let snapshot = serde_json::from_str(&raw).map_err(|source| AnalyticsError::SeedParse {
            path: self.path.clone(),
            source,
        })?;
        Ok(SeedDocument { raw, snapshot })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_dir(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("order_tracker_{tag}_{}_{nanos}", std::process::id()))
    }

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let storage = KvStorage::new(unique_dir("kv_missing"));
        assert_eq!(storage.get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_creates_root_and_overwrites() {
        let storage = KvStorage::new(unique_dir("kv_set"));
        storage.set("key", "first").await.unwrap();
        storage.set("key", "second").await.unwrap();
        assert_eq!(storage.get("key").await.unwrap().as_deref(), Some("second"));
        assert!(storage.root().join("key.json").exists());
    }

    #[tokio::test]
    async fn seed_keeps_unknown_fields() {
        let dir = unique_dir("seed_extra");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("analytics.json");
        let body = r#"{"metrics":{"orders":1,"sales":5,"visits":3,"refunds":2},"recentOrders":[{"id":"X","total":5,"channel":"ig"}],"dailyTrends":[{"date":"2026-10-18","orders":1,"weather":"sun"}],"topPlatforms":["Instagram"]}"#;
        std::fs::write(&path, body).unwrap();

        let seed = SeedSource::new(&path).fetch().await.unwrap();
        assert_eq!(seed.raw, body);

        let snapshot = seed.snapshot;
        assert_eq!(snapshot.metrics.orders, 1);
        assert_eq!(snapshot.metrics.extra["refunds"], 2);
        assert_eq!(snapshot.recent_orders[0].extra["channel"], "ig");
        assert_eq!(snapshot.daily_trends[0].extra["weather"], "sun");
        assert_eq!(
            snapshot.extra.get("topPlatforms"),
            Some(&serde_json::json!(["Instagram"]))
        );

        // Written back, absent text fields stay absent and extras survive.
        let written = serde_json::to_value(&snapshot).unwrap();
        let order = written["recentOrders"][0].as_object().unwrap();
        assert_eq!(order["channel"], "ig");
        assert!(!order.contains_key("customer"));
        assert!(!order.contains_key("statusCode"));
        assert_eq!(written["metrics"]["refunds"], 2);
    }

    #[tokio::test]
    async fn seed_tolerates_null_and_float_numbers() {
        let dir = unique_dir("seed_lenient");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("analytics.json");
        std::fs::write(
            &path,
            r#"{"metrics":{"orders":4.0,"sales":null,"visits":null},"recentOrders":null,"dailyTrends":[{"date":"2026-10-18","orders":2.0,"sales":null}]}"#,
        )
        .unwrap();

        let snapshot = SeedSource::new(&path).fetch().await.unwrap().snapshot;
        assert_eq!(snapshot.metrics.orders, 4);
        assert_eq!(snapshot.metrics.sales, 0.0);
        assert_eq!(snapshot.metrics.visits, 0);
        assert!(snapshot.recent_orders.is_empty());
        assert_eq!(snapshot.daily_trends[0].orders, 2);
        assert_eq!(snapshot.daily_trends[0].sales, 0.0);
    }

    #[tokio::test]
    async fn seed_errors_are_reported() {
        let dir = unique_dir("seed_bad");
        let missing = SeedSource::new(dir.join("nope.json")).fetch().await;
        assert!(matches!(missing, Err(AnalyticsError::SeedRead { .. })));

        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        let broken = SeedSource::new(&path).fetch().await;
        assert!(matches!(broken, Err(AnalyticsError::SeedParse { .. })));
    }
}
