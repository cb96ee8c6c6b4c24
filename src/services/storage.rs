//! Resume files on local disk, served back under a public URL prefix.

use std::path::PathBuf;

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::info;
use uuid::Uuid;

use crate::error::AppResult;

pub const DEFAULT_RESUME_NAME: &str = "resume.pdf";

#[derive(Debug, Clone)]
pub struct ResumeStorage {
    dir: PathBuf,
    public_prefix: String,
}

impl ResumeStorage {
    /// `public_prefix` is the URL path the directory is served under, e.g. `/uploads/resumes`.
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// Derives the public prefix from the last component of `dir`, served under `/uploads`.
    pub fn under_uploads(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let leaf = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resumes".to_string());
        Self::new(dir, format!("/uploads/{leaf}"))
    }

    /// Writes a new file and returns its public path. Existing files are never overwritten.
    pub async fn store(&self, candidate_id: i32, job_id: i32, original_name: &str, bytes: &[u8]) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let file_name = format!(
            "{candidate_id}_{job_id}_{}_{}",
            Uuid::new_v4().simple(),
            sanitize_file_name(original_name)
        );
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.dir.join(&file_name))
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;

        info!(candidate_id, job_id, file = %file_name, size = bytes.len(), "Stored resume");
        Ok(format!("{}/{}", self.public_prefix, file_name))
    }
}

/// Keeps only the final path component and replaces spaces with underscores.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() || base == "." || base == ".." {
        return DEFAULT_RESUME_NAME.to_string();
    }
    base.replace(' ', "_")
}
