//! Writes exported files into a directory

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::application::dto::ExportFile;
use crate::application::ports::outbound::{DownloadError, DownloadPort};

/// Download sink backed by a local directory
pub struct FileDownloadSink {
    dir: PathBuf,
}

impl FileDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keep only the final path component so a server-supplied name cannot escape `dir`
    fn target(&self, filename: &str) -> PathBuf {
        let name = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("download");
        self.dir.join(name)
    }
}

#[async_trait]
impl DownloadPort for FileDownloadSink {
    async fn deliver(&self, file: &ExportFile) -> Result<PathBuf, DownloadError> {
        let path = self.target(&file.filename);
        let write_error = |e: std::io::Error| DownloadError::Write {
            path: path.clone(),
            message: e.to_string(),
        };

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(write_error)?;
        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(write_error)?;

        info!(path = %path.display(), bytes = file.bytes.len(), "Wrote export");
        Ok(path)
    }
}
