//! Uploaded file parts.
//!
//! The transport decodes multipart bodies into [`FileHeader`] values and
//! places them in the [`Source`](crate::Source) next to the string fields.
//! File-accepting fields receive them as-is, without any string coercion.

use crate::coerce::{Coerce, Field};
use crate::error::BindError;

/// A single uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHeader {
    /// Client-supplied file name.
    pub filename: String,
    /// Declared MIME type, if the part carried one.
    pub content_type: Option<String>,
    /// Size of `data` in bytes.
    pub size: usize,
    /// File contents.
    pub data: Vec<u8>,
}

impl FileHeader {
    /// Create a file from its name and contents.
    #[must_use]
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        Self {
            filename: filename.into(),
            content_type: None,
            size: data.len(),
            data,
        }
    }

    /// Attach a MIME type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl Coerce for FileHeader {
    const ACCEPTS_FILES: bool = true;

    // A plain string never carries file contents; the slot keeps its value.
    fn coerce(&mut self, _values: &[String], _field: &Field<'_>) -> Result<(), BindError> {
        Ok(())
    }

    fn bind_files(&mut self, files: &[FileHeader], _field: &Field<'_>) -> Result<(), BindError> {
        if let Some(first) = files.first() {
            self.clone_from(first);
        }
        Ok(())
    }
}
