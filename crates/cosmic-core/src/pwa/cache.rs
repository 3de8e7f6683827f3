//! Named asset caches and the "clear everything" action.
//!
//! [`DirCacheStorage`] keeps each cache under `<root>/<sha256(name)>/` so
//! arbitrary cache names are safe on any filesystem. A `manifest.toml` in
//! each directory records the original name and the stored entry keys.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const MANIFEST_FILE: &str = "manifest.toml";

pub trait CacheStorage {
    fn keys(&self) -> Result<Vec<String>>;
    /// Returns whether a cache by that name existed.
    fn delete(&mut self, name: &str) -> Result<bool>;
}

/// Delete every cache, skipping (and logging) the ones that fail.
pub fn clear_caches(storage: &mut dyn CacheStorage) -> usize {
    let names = match storage.keys() {
        Ok(names) => names,
        Err(err) => {
            warn!("Could not list caches: {err:#}");
            return 0;
        }
    };

    let mut removed = 0usize;
    for name in names {
        match storage.delete(&name) {
            Ok(true) => {
                debug!(cache = %name, "Deleted cache");
                removed += 1;
            }
            Ok(false) => {}
            Err(err) => warn!(cache = %name, "Failed to delete cache: {err:#}"),
        }
    }
    info!(removed, "Cleared caches");
    removed
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheManifest {
    name: String,
    #[serde(default)]
    entries: Vec<String>,
}

pub struct DirCacheStorage {
    root: PathBuf,
}

impl DirCacheStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `bytes` under `key` in the cache called `name`, creating it.
    pub fn put(&mut self, name: &str, key: &str, bytes: &[u8]) -> Result<()> {
        let dir = self.cache_dir(name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Creating cache directory {}", dir.display()))?;

        let mut manifest = read_manifest(&dir).unwrap_or_else(|| CacheManifest {
            name: name.to_string(),
            entries: Vec::new(),
        });
        fs::write(dir.join(hash_name(key)), bytes)
            .with_context(|| format!("Writing cache entry {key}"))?;
        if !manifest.entries.iter().any(|entry| entry == key) {
            manifest.entries.push(key.to_string());
        }
        write_manifest(&dir, &manifest)
    }

    pub fn get(&self, name: &str, key: &str) -> Option<Vec<u8>> {
        fs::read(self.cache_dir(name).join(hash_name(key))).ok()
    }

    pub fn entries(&self, name: &str) -> Vec<String> {
        read_manifest(&self.cache_dir(name))
            .map(|manifest| manifest.entries)
            .unwrap_or_default()
    }

    fn cache_dir(&self, name: &str) -> PathBuf {
        self.root.join(hash_name(name))
    }
}

impl CacheStorage for DirCacheStorage {
    fn keys(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        let listing = fs::read_dir(&self.root)
            .with_context(|| format!("Listing cache root {}", self.root.display()))?;
        for entry in listing {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            match read_manifest(&entry.path()) {
                Some(manifest) => names.push(manifest.name),
                None => debug!(path = %entry.path().display(), "Skipping unmanaged directory"),
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete(&mut self, name: &str) -> Result<bool> {
        let dir = self.cache_dir(name);
        if !dir.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(&dir)
            .with_context(|| format!("Removing cache directory {}", dir.display()))?;
        Ok(true)
    }
}

fn hash_name(name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn read_manifest(dir: &Path) -> Option<CacheManifest> {
    let data = fs::read_to_string(dir.join(MANIFEST_FILE)).ok()?;
    toml::from_str(&data).ok()
}

fn write_manifest(dir: &Path, manifest: &CacheManifest) -> Result<()> {
    let contents = toml::to_string(manifest).context("Serializing cache manifest")?;
    fs::write(dir.join(MANIFEST_FILE), contents).context("Writing cache manifest")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::collections::BTreeSet;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_root(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("cosmic-cache-{tag}-{nanos}"))
    }

    #[test]
    fn stores_and_lists_named_caches() {
        let root = temp_root("list");
        let mut storage = DirCacheStorage::new(&root);
        storage.put("assets-v1", "/index.html", b"<html>").unwrap();
        storage.put("assets-v1", "/app.js", b"js").unwrap();
        storage.put("audio/v1", "/launch.ogg", b"ogg").unwrap();

        assert_eq!(storage.keys().unwrap(), vec!["assets-v1", "audio/v1"]);
        assert_eq!(storage.entries("assets-v1"), vec!["/index.html", "/app.js"]);
        assert_eq!(storage.get("audio/v1", "/launch.ogg").as_deref(), Some(&b"ogg"[..]));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn clearing_removes_every_cache() {
        let root = temp_root("clear");
        let mut storage = DirCacheStorage::new(&root);
        storage.put("a", "/x", b"1").unwrap();
        storage.put("b", "/y", b"2").unwrap();

        assert_eq!(clear_caches(&mut storage), 2);
        assert!(storage.keys().unwrap().is_empty());
        assert!(storage.get("a", "/x").is_none());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_root_lists_nothing() {
        let storage = DirCacheStorage::new(temp_root("missing"));
        assert!(storage.keys().unwrap().is_empty());
    }

    struct FlakyStorage {
        names: BTreeSet<String>,
        locked: &'static str,
    }

    impl CacheStorage for FlakyStorage {
        fn keys(&self) -> Result<Vec<String>> {
            Ok(self.names.iter().cloned().collect())
        }

        fn delete(&mut self, name: &str) -> Result<bool> {
            if name == self.locked {
                return Err(anyhow!("cache in use"));
            }
            Ok(self.names.remove(name))
        }
    }

    #[test]
    fn failures_are_skipped_not_fatal() {
        let mut storage = FlakyStorage {
            names: ["one", "two", "three"].into_iter().map(String::from).collect(),
            locked: "two",
        };
        assert_eq!(clear_caches(&mut storage), 2);
        assert_eq!(storage.names.len(), 1);
    }
}
