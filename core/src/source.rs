//! The flat, multi-valued input of a binding call.
//!
//! A [`Source`] distinguishes three states for every key:
//!
//! - absent: [`Source::get`] returns `None`
//! - present with no values: `Some(&[])`
//! - present with values: `Some(&[..])`
//!
//! The binder only reads from a source; it is produced by whatever transport
//! decoded the request (query string, form body, path template).

use crate::file::FileHeader;
use std::collections::HashMap;

/// Read-only mapping from external field name to an ordered list of strings,
/// plus any uploaded files keyed the same way.
///
/// # Examples
///
/// ```
/// use formbind_core::Source;
///
/// let source = Source::new()
///     .with("page", ["2"])
///     .with("tag", ["rust", "web"]);
///
/// assert_eq!(source.get("tag"), Some(&["rust".to_string(), "web".to_string()][..]));
/// assert_eq!(source.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source {
    values: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<FileHeader>>,
}

impl Source {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Source::insert`].
    #[must_use]
    pub fn with<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.insert(key, values);
        self
    }

    /// Builder form of [`Source::insert_file`].
    #[must_use]
    pub fn with_file(mut self, key: impl Into<String>, file: FileHeader) -> Self {
        self.insert_file(key, file);
        self
    }

    /// Set the values for `key`, replacing any previous ones.
    ///
    /// An empty iterator marks the key as present with no values.
    pub fn insert<I, V>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.values
            .insert(key.into(), values.into_iter().map(Into::into).collect());
    }

    /// Append one value to `key`, creating the key if needed.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// Append an uploaded file under `key`.
    pub fn insert_file(&mut self, key: impl Into<String>, file: FileHeader) {
        self.files.entry(key.into()).or_default().push(file);
    }

    /// Values for `key`, or `None` when the key is absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Uploaded files for `key`, or `None` when there are none.
    #[must_use]
    pub fn files(&self, key: &str) -> Option<&[FileHeader]> {
        self.files
            .get(key)
            .map(Vec::as_slice)
            .filter(|files| !files.is_empty())
    }

    /// Whether `key` is present, with or without values.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key) || self.files(key).is_some()
    }

    /// Number of string keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the source has neither string keys nor files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.files.is_empty()
    }

    /// Iterate over the string keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl From<HashMap<String, Vec<String>>> for Source {
    fn from(values: HashMap<String, Vec<String>>) -> Self {
        Self {
            values,
            files: HashMap::new(),
        }
    }
}

impl<K, I, V> FromIterator<(K, I)> for Source
where
    K: Into<String>,
    I: IntoIterator<Item = V>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut source = Self::new();
        for (key, values) in iter {
            source.insert(key, values);
        }
        source
    }
}
