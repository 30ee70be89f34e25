//! Tenant directory: the lookup seam towards the platform data store.

use dashmap::DashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::tenants::types::Funnel;

/// Errors from directory persistence.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read/write access to tenant funnels, keyed by subdomain.
pub trait TenantDirectory: Send + Sync {
    fn funnel(&self, subdomain: &str) -> Option<Funnel>;

    /// Insert or replace a funnel, returning the previous one.
    fn upsert(&self, funnel: Funnel) -> Option<Funnel>;

    fn remove(&self, subdomain: &str) -> Option<Funnel>;

    /// All funnels, sorted by subdomain.
    fn list(&self) -> Vec<Funnel>;

    /// Flush pending changes to durable storage, if any.
    fn persist(&self) -> Result<(), DirectoryError> {
        Ok(())
    }
}

/// A thread-safe in-memory directory with optional JSON snapshots.
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    inner: Arc<DashMap<String, Funnel>>,
    snapshot_path: Option<PathBuf>,
}

impl InMemoryDirectory {
    /// Create a new empty directory.
    pub fn new(snapshot_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            snapshot_path,
        }
    }

    /// Seed from `config.tenants`, then overlay the snapshot if one exists.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, DirectoryError> {
        let directory = Self::new(config.directory.snapshot_path.as_ref().map(PathBuf::from));
        for funnel in &config.tenants {
            directory.upsert(funnel.clone());
        }
        if let Some(path) = directory.snapshot_path.clone() {
            directory.load_snapshot(&path)?;
        }
        Ok(directory)
    }

    /// Load funnels from a snapshot file if it exists. Returns how many were read.
    pub fn load_snapshot(&self, path: &Path) -> Result<usize, DirectoryError> {
        if !path.exists() {
            return Ok(0);
        }
        let reader = BufReader::new(File::open(path)?);
        let funnels: Vec<Funnel> = serde_json::from_reader(reader)?;
        let count = funnels.len();
        for funnel in funnels {
            self.upsert(funnel);
        }
        tracing::info!(count, path = %path.display(), "Loaded tenant snapshot");
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl TenantDirectory for InMemoryDirectory {
    fn funnel(&self, subdomain: &str) -> Option<Funnel> {
        self.inner.get(subdomain).map(|r| r.value().clone())
    }

    fn upsert(&self, funnel: Funnel) -> Option<Funnel> {
        self.inner.insert(funnel.subdomain.clone(), funnel)
    }

    fn remove(&self, subdomain: &str) -> Option<Funnel> {
        self.inner.remove(subdomain).map(|(_, funnel)| funnel)
    }

    fn list(&self) -> Vec<Funnel> {
        let mut funnels: Vec<Funnel> = self.inner.iter().map(|r| r.value().clone()).collect();
        funnels.sort_by(|a, b| a.subdomain.cmp(&b.subdomain));
        funnels
    }

    fn persist(&self) -> Result<(), DirectoryError> {
        if let Some(path) = &self.snapshot_path {
            let funnels = self.list();
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &funnels)?;
            tracing::info!(count = funnels.len(), path = %path.display(), "Saved tenant snapshot");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn funnel(subdomain: &str, published: bool) -> Funnel {
        Funnel {
            subdomain: subdomain.to_string(),
            name: subdomain.to_uppercase(),
            published,
            pages: vec![],
        }
    }

    #[test]
    fn test_directory_operations() {
        let directory = InMemoryDirectory::new(None);
        assert!(directory.funnel("shop").is_none());

        assert!(directory.upsert(funnel("shop", false)).is_none());
        let previous = directory.upsert(funnel("shop", true)).unwrap();
        assert!(!previous.published);
        assert!(directory.funnel("shop").unwrap().published);

        directory.upsert(funnel("bakery", true));
        let names: Vec<_> = directory.list().into_iter().map(|f| f.subdomain).collect();
        assert_eq!(names, vec!["bakery", "shop"]);

        assert!(directory.remove("shop").is_some());
        assert!(directory.remove("shop").is_none());
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tenants.json");

        let directory = InMemoryDirectory::new(Some(path.clone()));
        directory.upsert(funnel("shop", true));
        directory.persist().unwrap();

        let loaded = InMemoryDirectory::new(None);
        assert_eq!(loaded.load_snapshot(&path).unwrap(), 1);
        assert_eq!(loaded.funnel("shop"), Some(funnel("shop", true)));
    }

    #[test]
    fn test_snapshot_overrides_config_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tenants.json");
        std::fs::write(&path, serde_json::to_string(&vec![funnel("shop", false)]).unwrap()).unwrap();

        let mut config = GatewayConfig::default();
        config.tenants = vec![funnel("shop", true), funnel("bakery", true)];
        config.directory.snapshot_path = Some(path.display().to_string());

        let directory = InMemoryDirectory::from_config(&config).unwrap();
        assert_eq!(directory.len(), 2);
        assert!(!directory.funnel("shop").unwrap().published);
    }

    #[test]
    fn test_missing_snapshot_is_not_an_error() {
        let directory = InMemoryDirectory::new(None);
        assert_eq!(directory.load_snapshot(Path::new("/nonexistent/tenants.json")).unwrap(), 0);
    }
}
