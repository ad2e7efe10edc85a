use crate::error::{ExportError, Result};
use crate::html::render_redirect_document;
use pinlink_core::validate::is_slug_syntax;
use pinlink_core::LinkStore;
use std::path::Path;
use tracing::{debug, info};

/// Counts from one export run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Documents written.
    pub written: usize,
    /// Records skipped because their slug is not a safe path segment.
    pub skipped: usize,
}

/// Writes a static redirect document for every pinned, unexpired link.
#[derive(Debug)]
pub struct SnapshotExporter<S> {
    store: S,
}

impl<S: LinkStore> SnapshotExporter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Exports into `output_root`, replacing documents left by earlier runs.
    ///
    /// Documents for links that are no longer pinned are not removed.
    pub async fn export(&self, output_root: impl AsRef<Path>) -> Result<ExportReport> {
        let output_root = output_root.as_ref();
        let records = self.store.list_pinned_active().await?;

        tokio::fs::create_dir_all(output_root)
            .await
            .map_err(|e| ExportError::io(output_root, e))?;

        let mut report = ExportReport::default();
        for record in records {
            // slugs become directory names
            if !is_slug_syntax(record.slug.as_str()) {
                debug!(slug = %record.slug, "skipping slug unsafe for export");
                report.skipped += 1;
                continue;
            }

            let dir = output_root.join(record.slug.as_str());
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| ExportError::io(&dir, e))?;

            let path = dir.join("index.html");
            // replace via rename so readers never see a partial document
            let staging = dir.join("index.html.tmp");
            tokio::fs::write(&staging, render_redirect_document(&record.target_url))
                .await
                .map_err(|e| ExportError::io(&staging, e))?;
            tokio::fs::rename(&staging, &path)
                .await
                .map_err(|e| ExportError::io(&path, e))?;

            debug!(slug = %record.slug, path = %path.display(), "wrote redirect document");
            report.written += 1;
        }

        info!(
            written = report.written,
            skipped = report.skipped,
            output_root = %output_root.display(),
            "snapshot export finished"
        );
        Ok(report)
    }
}
