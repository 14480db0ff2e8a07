use super::error::PreviewError;
use super::ingest::{AdmittedFile, FileSource};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::future::Future;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Turns image files into `data:` URIs off the admission path.
#[derive(Debug, Clone, Copy)]
pub struct PreviewGenerator {
    max_bytes: u64,
}

impl PreviewGenerator {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn is_eligible(mime_type: &str) -> bool {
        mime_type.starts_with("image/")
    }

    /// Returns the pending read for image files and `None` for everything
    /// else, in which case no work is scheduled at all.
    pub fn generate(
        &self,
        file: &AdmittedFile,
    ) -> Option<impl Future<Output = Result<String, PreviewError>> + Send + 'static> {
        if !Self::is_eligible(&file.mime_type) {
            return None;
        }

        let source = file.source.clone();
        let mime_type = file.mime_type.clone();
        let declared_size = file.size;
        let limit = self.max_bytes;

        Some(async move {
            if declared_size > limit {
                return Err(PreviewError::TooLarge {
                    size: declared_size,
                    limit,
                });
            }

            let encoded = match source {
                FileSource::Path(path) => STANDARD.encode(read_capped(&path, limit).await?),
                FileSource::Memory(bytes) => STANDARD.encode(&bytes),
            };
            Ok(format!("data:{};base64,{}", mime_type, encoded))
        })
    }
}

/// Reads at most `limit` bytes. The file may have grown since it was
/// selected, so its current length is checked again.
async fn read_capped(path: &Path, limit: u64) -> Result<Vec<u8>, PreviewError> {
    let file = tokio::fs::File::open(path).await?;
    let size = file.metadata().await?.len();
    if size > limit {
        return Err(PreviewError::TooLarge { size, limit });
    }

    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .await?;
    if bytes.len() as u64 > limit {
        return Err(PreviewError::TooLarge {
            size: bytes.len() as u64,
            limit,
        });
    }
    Ok(bytes)
}
