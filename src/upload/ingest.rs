use super::error::ValidationError;
use derivative::Derivative;
use ignore::Walk;
use std::fs;
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Where a candidate's bytes can be read from.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub enum FileSource {
    Path(PathBuf),
    Memory(#[derivative(Debug = "ignore")] Arc<[u8]>),
}

/// A raw file handle plus the metadata validation needs.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub source: FileSource,
}

impl CandidateFile {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        Ok(Self {
            mime_type: guess_mime(&name).to_string(),
            name,
            size: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Arc<[u8]>) -> Self {
        let name = name.into();
        Self {
            mime_type: guess_mime(&name).to_string(),
            size: bytes.len() as u64,
            name,
            source: FileSource::Memory(bytes),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }
}

/// A candidate that passed validation. Only the ingestor can make one.
#[derive(Debug, Clone)]
pub struct AdmittedFile(CandidateFile);

impl Deref for AdmittedFile {
    type Target = CandidateFile;

    fn deref(&self) -> &CandidateFile {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOrigin {
    Picker,
    DragDrop,
}

/// One picker confirmation or drop gesture.
#[derive(Debug, Clone)]
pub struct FileSelection {
    pub origin: SelectionOrigin,
    pub files: Vec<CandidateFile>,
}

impl FileSelection {
    pub fn new(origin: SelectionOrigin, files: Vec<CandidateFile>) -> Self {
        Self { origin, files }
    }

    /// Builds a selection from filesystem paths. Directories are walked
    /// (honouring .gitignore), unreadable entries are skipped.
    pub fn from_paths<P: AsRef<Path>>(origin: SelectionOrigin, paths: &[P]) -> Self {
        let mut files = Vec::new();

        for path in paths {
            let path = path.as_ref();
            if path.is_dir() {
                for entry in Walk::new(path) {
                    match entry {
                        Ok(entry) if entry.path().is_file() => {
                            push_candidate(&mut files, entry.path());
                        }
                        Ok(_) => {}
                        Err(e) => warn!("Error walking {}: {}", path.display(), e),
                    }
                }
            } else {
                push_candidate(&mut files, path);
            }
        }

        Self { origin, files }
    }
}

fn push_candidate(files: &mut Vec<CandidateFile>, path: &Path) {
    match CandidateFile::from_path(path) {
        Ok(candidate) => files.push(candidate),
        Err(e) => warn!("Skipping {}: {}", path.display(), e),
    }
}

/// Validates candidates one by one against the size limit.
#[derive(Debug, Clone, Copy)]
pub struct FileIngestor {
    max_size: u64,
}

impl FileIngestor {
    pub fn new(max_size: u64) -> Self {
        Self { max_size }
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// One result per candidate, in input order. A rejection never affects
    /// the other candidates.
    pub fn admit(
        &self,
        candidates: Vec<CandidateFile>,
    ) -> Vec<Result<AdmittedFile, ValidationError>> {
        candidates
            .into_iter()
            .map(|candidate| self.admit_one(candidate))
            .collect()
    }

    fn admit_one(&self, candidate: CandidateFile) -> Result<AdmittedFile, ValidationError> {
        if candidate.size > self.max_size {
            debug!(
                "Rejecting {} ({} bytes > {})",
                candidate.name, candidate.size, self.max_size
            );
            return Err(ValidationError::SizeExceeded {
                name: candidate.name,
                size: candidate.size,
                limit: self.max_size,
            });
        }
        Ok(AdmittedFile(candidate))
    }
}

/// MIME type from the file extension, `application/octet-stream` otherwise.
pub fn guess_mime(name: &str) -> &'static str {
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => return "application/octet-stream",
    };

    match ext.as_str() {
        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        // Archives
        "zip" => "application/zip",
        "rar" => "application/vnd.rar",
        "7z" => "application/x-7z-compressed",
        "tar" => "application/x-tar",
        "gz" => "application/gzip",
        // Documents
        "pdf" => "application/pdf",
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}
