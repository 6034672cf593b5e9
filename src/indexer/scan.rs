use crate::config::Config;
use anyhow::{Result, bail};
use ignore::WalkBuilder;
use serde::Serialize;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

const MODEL_EXTENSION: &str = "php";

#[derive(Debug, Clone, Serialize)]
pub struct ScannedFile {
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub no_ignore: bool,
    /// Repo-relative directories a candidate must live under.
    pub model_dirs: Vec<String>,
    /// Directory names pruned wherever they appear.
    pub exclude_dirs: Vec<String>,
    pub max_file_bytes: u64,
}

impl ScanOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            no_ignore: false,
            model_dirs: config.model_dirs.clone(),
            exclude_dirs: config.exclude_dirs.clone(),
            max_file_bytes: config.max_file_bytes,
        }
    }

    pub fn with_model_dirs(mut self, dirs: Vec<String>) -> Self {
        if !dirs.is_empty() {
            self.model_dirs = dirs;
        }
        self
    }

    pub fn with_exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        if !dirs.is_empty() {
            self.exclude_dirs = dirs;
        }
        self
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Enumerate model candidate files under `repo_root`, sorted by relative path.
///
/// Only failing to open the root is an error; unreadable entries are logged
/// and skipped.
pub fn scan_candidates(repo_root: &Path, options: &ScanOptions) -> Result<Vec<ScannedFile>> {
    if !repo_root.is_dir() {
        bail!("repo root {} is not a directory", repo_root.display());
    }
    let mut files = Vec::new();
    let mut builder = WalkBuilder::new(repo_root);
    if options.no_ignore {
        builder
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false);
    } else {
        builder
            .ignore(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .parents(true)
            .require_git(false);
    }
    let exclude_dirs = options.exclude_dirs.clone();
    let walker = builder
        .hidden(false)
        .filter_entry(move |entry| !is_excluded_entry(entry, &exclude_dirs))
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("walk error: {err}");
                continue;
            }
        };
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        if path.extension() != Some(OsStr::new(MODEL_EXTENSION)) {
            continue;
        }
        let rel_path = crate::util::normalize_rel_path(repo_root, path)?;
        if !options
            .model_dirs
            .iter()
            .any(|dir| crate::util::is_under_dir(&rel_path, dir))
        {
            continue;
        }
        let size = match fs::metadata(path) {
            Ok(metadata) => metadata.len(),
            Err(err) => {
                tracing::warn!("stat error {rel_path}: {err}");
                continue;
            }
        };
        if size > options.max_file_bytes {
            tracing::debug!(
                "skip {rel_path}: {size} bytes exceeds limit of {}",
                options.max_file_bytes
            );
            continue;
        }
        files.push(ScannedFile {
            rel_path,
            abs_path: path.to_path_buf(),
            size,
        });
    }
    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(files)
}

fn is_excluded_entry(entry: &ignore::DirEntry, exclude_dirs: &[String]) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    if !entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
        return false;
    }
    let name = entry.file_name();
    if name == OsStr::new(".git") {
        return true;
    }
    exclude_dirs.iter().any(|dir| name == OsStr::new(dir))
}
