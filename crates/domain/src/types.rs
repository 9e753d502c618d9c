// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The shape of value a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text (names, emails, phone numbers, identifiers).
    Text,
    /// A checkbox.
    Flag,
    /// A list of uploaded files.
    Files,
}

impl FieldKind {
    /// Returns the kind name used in messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Flag => "flag",
            Self::Files => "files",
        }
    }
}

/// A reference to a file the user attached to a form.
///
/// Only metadata is serialized. The `handle` locates the file contents in
/// host storage and never leaves the process, so a restored draft carries
/// file references without handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Identifier assigned when the file was selected.
    pub id: String,
    /// The original file name.
    pub file_name: String,
    /// Size of the file in bytes.
    pub size_bytes: u64,
    /// MIME type reported by the client, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Host storage handle.
    #[serde(skip)]
    pub handle: Option<String>,
}

impl FileRef {
    /// Creates a file reference with no content type and no handle.
    #[must_use]
    pub fn new(id: impl Into<String>, file_name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            size_bytes,
            content_type: None,
            handle: None,
        }
    }

    /// Sets the MIME type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the storage handle.
    #[must_use]
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    /// Returns a copy of this reference without its storage handle.
    #[must_use]
    pub fn without_handle(&self) -> Self {
        Self {
            handle: None,
            ..self.clone()
        }
    }
}

/// The value currently held by a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// A text value.
    Text(String),
    /// A checkbox value.
    Flag(bool),
    /// Attached files.
    Files(Vec<FileRef>),
}

impl FieldValue {
    /// Creates a text value.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Flag(_) => FieldKind::Flag,
            Self::Files(_) => FieldKind::Files,
        }
    }

    /// Returns true when the value carries no answer.
    ///
    /// Whitespace-only text, an unchecked box and an empty file list are all
    /// treated as empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Flag(flag) => !flag,
            Self::Files(files) => files.is_empty(),
        }
    }

    /// Returns the text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Returns the flag, if this is a checkbox value.
    #[must_use]
    pub const fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the files, if this is a file list.
    #[must_use]
    pub fn as_files(&self) -> Option<&[FileRef]> {
        match self {
            Self::Files(files) => Some(files.as_slice()),
            _ => None,
        }
    }
}

/// The accumulated answers of one wizard session.
///
/// Fields are kept in name order so that snapshots serialize
/// deterministically. Writes are last-writer-wins per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState {
    fields: BTreeMap<String, FieldValue>,
}

impl FormState {
    /// Creates an empty form.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Sets a field, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(name.into(), value)
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    /// Returns the text of a field, if it holds text.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Returns the checkbox state of a field. Absent fields are unchecked.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.get(name)
            .and_then(FieldValue::as_flag)
            .unwrap_or(false)
    }

    /// Returns the files attached to a field. Absent fields have none.
    #[must_use]
    pub fn files(&self, name: &str) -> &[FileRef] {
        self.get(name).and_then(FieldValue::as_files).unwrap_or(&[])
    }

    /// Returns true when the field is absent or holds an empty value.
    #[must_use]
    pub fn is_blank(&self, name: &str) -> bool {
        self.get(name).is_none_or(FieldValue::is_empty)
    }

    /// Returns true when the field is present, even if empty.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates over all fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of fields present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when no field has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns a copy of the form with every file handle dropped.
    ///
    /// This is exactly what survives a JSON round trip.
    #[must_use]
    pub fn without_file_handles(&self) -> Self {
        let fields = self
            .fields
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    FieldValue::Files(files) => {
                        FieldValue::Files(files.iter().map(FileRef::without_handle).collect())
                    }
                    other => other.clone(),
                };
                (name.clone(), value)
            })
            .collect();
        Self { fields }
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for FormState {
    fn from_iter<T: IntoIterator<Item = (K, FieldValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
