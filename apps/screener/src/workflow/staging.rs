use std::path::Path;

use bytes::Bytes;

use crate::errors::Rejection;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A resume selected for upload.
///
/// The content is a shared, reference-counted handle: cloning an `UploadFile`
/// or sending it never copies the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    name: String,
    content: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Reads a file from disk. The upload name is the path's file name.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn byte_size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn size_mb(&self) -> f64 {
        self.byte_size() as f64 / BYTES_PER_MB
    }

    /// Shared handle to the file content.
    pub fn content(&self) -> Bytes {
        self.content.clone()
    }

    pub fn is_pdf(&self) -> bool {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false)
    }
}

/// Files and job description collected before a submission.
#[derive(Debug, Clone, Default)]
pub struct StagingBuffer {
    files: Vec<UploadFile>,
    job_description: String,
}

impl StagingBuffer {
    /// Appends a PDF resume. Other file types are refused.
    pub fn add_file(&mut self, file: UploadFile) -> Result<(), Rejection> {
        if !file.is_pdf() {
            return Err(Rejection::UnsupportedFile(file.name));
        }
        self.files.push(file);
        Ok(())
    }

    /// Swaps in a whole new batch. Leaves the buffer untouched if any file is refused.
    pub fn replace(
        &mut self,
        files: Vec<UploadFile>,
        job_description: impl Into<String>,
    ) -> Result<(), Rejection> {
        if let Some(unsupported) = files.iter().find(|f| !f.is_pdf()) {
            return Err(Rejection::UnsupportedFile(unsupported.name.clone()));
        }
        self.files = files;
        self.job_description = job_description.into();
        Ok(())
    }

    pub fn remove_file(&mut self, index: usize) -> Result<UploadFile, Rejection> {
        if index >= self.files.len() {
            return Err(Rejection::NoSuchFile(index));
        }
        Ok(self.files.remove(index))
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.job_description = text.into();
    }

    pub fn files(&self) -> &[UploadFile] {
        &self.files
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn job_description_chars(&self) -> usize {
        self.job_description.chars().count()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.job_description.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(UploadFile::byte_size).sum()
    }

    /// Checks the buffer can be submitted: at least one file and a
    /// non-blank job description.
    pub fn validate(&self) -> Result<(), Rejection> {
        if self.files.is_empty() {
            return Err(Rejection::NoFilesStaged);
        }
        if self.job_description.trim().is_empty() {
            return Err(Rejection::BlankJobDescription);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.files.clear();
        self.job_description.clear();
    }
}
