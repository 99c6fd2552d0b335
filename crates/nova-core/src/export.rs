//! Export path for succeeded runs.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::types::ProductBundle;
use crate::{Error, Result};

/// Scheme prefix of preview references.
pub const PREVIEW_SCHEME: &str = "nova://preview/";

const PREVIEW_ID_LEN: usize = 16;

/// Where a published bundle ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReceipt {
    /// File the bundle was written to.
    pub artifact: PathBuf,
    /// Shareable preview reference.
    pub preview: String,
}

/// Receives the bundle of every succeeded run.
///
/// The orchestrator calls [`publish`](Self::publish) on tokio's blocking
/// pool, so implementations may do synchronous I/O.
pub trait BundleSink: Send + Sync {
    /// Publish `bundle`, returning where it went.
    fn publish(&self, bundle: &ProductBundle) -> Result<ExportReceipt>;
}

/// Writes bundles as pretty-printed JSON files into a directory.
#[derive(Debug, Clone)]
pub struct FileExporter {
    dir: PathBuf,
}

impl FileExporter {
    /// Export into `dir`, created on first publish.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BundleSink for FileExporter {
    fn publish(&self, bundle: &ProductBundle) -> Result<ExportReceipt> {
        let json = serde_json::to_string_pretty(bundle)?;
        let id = preview_id(&json);

        fs::create_dir_all(&self.dir).map_err(|e| {
            Error::Export(format!("Failed to create {}: {e}", self.dir.display()))
        })?;

        let artifact = self.dir.join(format!("store-{id}.json"));
        fs::write(&artifact, json)
            .map_err(|e| Error::Export(format!("Failed to write {}: {e}", artifact.display())))?;

        info!("Exported '{}' to {}", bundle.display_title(), artifact.display());

        Ok(ExportReceipt {
            artifact,
            preview: format!("{PREVIEW_SCHEME}{id}"),
        })
    }
}

/// URL-safe base64 SHA-256 prefix of `content`.
fn preview_id(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    let mut id = URL_SAFE_NO_PAD.encode(digest);
    id.truncate(PREVIEW_ID_LEN);
    id
}
