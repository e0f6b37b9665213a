use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DocId;

/// An uploaded file awaiting ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub path: PathBuf,
    pub filename: String,
    pub received_at: DateTime<Utc>,
}

impl Document {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        Self {
            id: DocId::generate(),
            path,
            filename,
            received_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Lowercased file extension, taken from the display filename.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_and_extension() {
        let doc = Document::from_path("/tmp/uploads/Report.PDF");
        assert_eq!(doc.filename, "Report.PDF");
        assert_eq!(doc.extension().as_deref(), Some("pdf"));
    }

    #[test]
    fn test_upload_name_overrides_temp_path() {
        let doc = Document::from_path("/tmp/gradio/abc123").with_filename("notes.md");
        assert_eq!(doc.extension().as_deref(), Some("md"));
        assert_eq!(doc.path, PathBuf::from("/tmp/gradio/abc123"));
    }
}
