use std::path::PathBuf;

use async_trait::async_trait;
use payroll_core::export::{DownloadSink, ExportArtifact};

/// Writes exported documents into a directory, creating it when needed.
/// An existing file with the same name is replaced.
pub struct FileDownloadSink {
    directory: PathBuf,
}

impl FileDownloadSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

#[async_trait]
impl DownloadSink for FileDownloadSink {
    async fn deliver(&self, artifact: &ExportArtifact) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.directory).await?;
        let path = self.directory.join(&artifact.filename);
        tokio::fs::write(&path, &artifact.bytes).await?;
        Ok(path.display().to_string())
    }
}
