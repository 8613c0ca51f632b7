//! Collects source files from disk and decodes them into text.

use anyhow::bail;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::Result;
use crate::traits::TextExtractor;
use crate::types::SourceFile;

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Extensions (lowercase, no dot) picked up when walking a directory.
    pub extensions: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { extensions: vec!["txt".to_string(), "pdf".to_string()] }
    }
}

#[derive(Default)]
pub struct DataProcessor {
    loader_config: LoaderConfig,
}

impl DataProcessor {
    pub fn new() -> Self { Self::default() }

    pub fn with_extensions(extensions: &[String]) -> Self {
        let extensions = extensions.iter().map(|e| e.trim_start_matches('.').to_lowercase()).collect();
        Self { loader_config: LoaderConfig { extensions } }
    }

    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<SourceFile>> {
        let files = self.list_source_files(data_dir);
        if files.is_empty() {
            info!(dir = %data_dir.display(), "no source files found");
            return Ok(vec![]);
        }
        self.process_paths(&files)
    }

    pub fn process_directory_limited(&self, data_dir: &Path, limit: usize) -> Result<Vec<SourceFile>> {
        let mut files = self.list_source_files(data_dir);
        if files.is_empty() { info!(dir = %data_dir.display(), "no source files found"); return Ok(vec![]); }
        if files.len() > limit { files.truncate(limit); info!(limit, "limited to first files"); }
        self.process_paths(&files)
    }

    /// Read the given files as-is; extension filtering is left to the caller.
    ///
    /// An unreadable path fails the whole call with [`Error::Io`](crate::Error::Io).
    pub fn process_paths(&self, paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
        let mut out = Vec::with_capacity(paths.len());
        for (file_index, file_path) in paths.iter().enumerate() {
            debug!(n = file_index + 1, total = paths.len(), path = %file_path.display(), "reading file");
            let bytes = fs::read(file_path)?;
            out.push(SourceFile { name: Self::file_name(file_path), bytes });
        }
        info!(files = out.len(), "loaded source files");
        Ok(out)
    }

    fn file_name(file_path: &Path) -> String {
        file_path
            .file_name()
            .map_or_else(|| file_path.to_string_lossy().to_string(), |n| n.to_string_lossy().to_string())
    }

    fn list_source_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path();
            let ext = path.extension().and_then(|s| s.to_str()).map(str::to_lowercase);
            if ext.is_some_and(|ext| self.loader_config.extensions.contains(&ext)) { files.push(path.to_path_buf()); }
        }
        files.sort(); files
    }
}

/// Decodes `.txt` files; anything else is reported as not extractable.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, file: &SourceFile) -> anyhow::Result<String> {
        match file.extension().as_deref() {
            Some("txt") => Ok(String::from_utf8_lossy(&file.bytes).trim().to_string()),
            Some("pdf") => bail!("PDF text extraction is not available for {}", file.name),
            _ => bail!("unsupported format: {}", file.name),
        }
    }
}
