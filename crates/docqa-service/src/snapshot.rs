use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

use docqa_core::error::Error;
use docqa_core::traits::SnapshotStore;
use docqa_core::types::Snapshot;

/// Stores the snapshot as pretty-printed JSON at a fixed path.
///
/// Writes go to a sibling temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> anyhow::Result<Option<Snapshot>> {
        if !self.path.exists() { return Ok(None); }
        let bytes = fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) { return Ok(None); }
        let snapshot: Snapshot = serde_json::from_slice(&bytes)
            .map_err(|e| Error::Snapshot(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path).with_context(|| format!("renaming into {}", self.path.display()))?;
        Ok(())
    }

    fn remove(&self) -> anyhow::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).with_context(|| format!("removing {}", self.path.display()))?;
        }
        Ok(())
    }

    fn exists(&self) -> bool { self.path.exists() }
}
