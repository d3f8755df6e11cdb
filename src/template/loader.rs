//! Template directory bootstrap
//!
//! Runs once at startup: validates the configured directory, discovers `.hbs`
//! files, compiles each one with its sidecar metadata and fills a
//! [`TemplateRegistry`]. An invalid directory is fatal; a broken file only
//! costs that one template.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use super::compiler::TemplateCompiler;
use super::key::normalize_key;
use super::metadata::load_metadata;
use super::registry::TemplateRegistry;
use super::types::{BootstrapError, TemplateError};

/// Extension of template source files
pub const TEMPLATE_EXTENSION: &str = "hbs";

/// Outcome counters of a bootstrap run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    /// Template files found in the directory
    pub discovered: usize,
    /// Templates added to the registry
    pub registered: usize,
    /// Files that could not be read or compiled
    pub failed: usize,
    /// Files whose key was already taken or invalid
    pub rejected: usize,
}

/// Loads every template of a directory into a fresh registry
pub struct TemplateLoader {
    dir: PathBuf,
    compiler: TemplateCompiler,
}

impl TemplateLoader {
    pub fn new(dir: impl Into<PathBuf>, compiler: TemplateCompiler) -> Self {
        Self {
            dir: dir.into(),
            compiler,
        }
    }

    /// Directory the loader reads from, as given
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Run the full bootstrap and return the populated registry
    pub async fn load(&self) -> Result<(TemplateRegistry, BootstrapReport), BootstrapError> {
        let dir = self.validate().await?;
        tracing::info!(dir = %dir.display(), "Registering templates");

        let files = self.enumerate(&dir).await?;
        let mut registry = TemplateRegistry::new();
        let mut report = BootstrapReport {
            discovered: files.len(),
            ..Default::default()
        };

        for (file_name, stem) in files {
            let key = normalize_key(&stem);
            let path = dir.join(&file_name);

            let source = match tokio::fs::read_to_string(&path).await {
                Ok(source) => source,
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Failed to read template, skipping");
                    report.failed += 1;
                    continue;
                }
            };

            let compiled = match self.compiler.compile(&key, &source) {
                Ok(compiled) => compiled,
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Failed to compile template, skipping");
                    report.failed += 1;
                    continue;
                }
            };

            let metadata = load_metadata(&dir, &key).await;

            match registry.register(&key, Arc::new(compiled), metadata) {
                Ok(true) => {
                    tracing::debug!(key = %key, file = %file_name, "Template registered");
                    report.registered += 1;
                }
                Ok(false) => {
                    tracing::warn!(key = %key, file = %file_name, "Duplicate template key, file ignored");
                    report.rejected += 1;
                }
                Err(e @ TemplateError::InvalidKey(_)) => {
                    tracing::warn!(file = %file_name, error = %e, "Template rejected");
                    report.rejected += 1;
                }
                Err(e) => {
                    tracing::error!(file = %file_name, error = %e, "Failed to register template");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            registered = report.registered,
            discovered = report.discovered,
            failed = report.failed,
            rejected = report.rejected,
            "Registered {} email template(s)",
            report.registered
        );

        Ok((registry, report))
    }

    /// Resolve the directory against the working directory and check it
    async fn validate(&self) -> Result<PathBuf, BootstrapError> {
        let dir = if self.dir.is_absolute() {
            self.dir.clone()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&self.dir))
                .unwrap_or_else(|_| self.dir.clone())
        };

        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(dir),
            _ => Err(BootstrapError::InvalidDirectory(dir)),
        }
    }

    /// List `(file name, stem)` of template files, sorted by file name
    async fn enumerate(&self, dir: &Path) -> Result<Vec<(String, String)>, BootstrapError> {
        let read_err = |source| BootstrapError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = tokio::fs::read_dir(dir).await.map_err(read_err)?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }

            // Follows symlinks; pipes, sockets and devices are never read
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => {}
                _ => {
                    tracing::debug!(path = %path.display(), "Skipping non-regular template entry");
                    continue;
                }
            }

            let (Some(file_name), Some(stem)) = (
                path.file_name().and_then(|n| n.to_str()),
                path.file_stem().and_then(|s| s.to_str()),
            ) else {
                tracing::warn!(path = %path.display(), "Skipping template with non UTF-8 file name");
                continue;
            };

            files.push((file_name.to_string(), stem.to_string()));
        }

        files.sort();
        Ok(files)
    }
}
