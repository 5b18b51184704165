//! Document state management for open files in the editor.

use std::collections::HashMap;
use std::path::PathBuf;

use lsp_types::Uri;

/// Tracks which documents are currently open in the editor.
#[derive(Debug, Default)]
pub struct DocumentState {
    documents: HashMap<String, DocumentInfo>,
}

/// Latest editor-side state of one open document.
#[derive(Debug)]
pub struct DocumentInfo {
    /// Editor-reported version number.
    pub version: i32,
    /// Full text as last synchronized by the editor.
    pub content: String,
}

impl DocumentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly opened document.
    pub fn open(&mut self, uri: &str, version: i32, content: String) {
        self.documents
            .insert(uri.to_owned(), DocumentInfo { version, content });
    }

    /// Replace the text of an already-open document.
    pub fn change(&mut self, uri: &str, version: i32, content: String) {
        if let Some(doc) = self.documents.get_mut(uri) {
            doc.version = version;
            doc.content = content;
        }
    }

    /// Remove a closed document from tracking.
    pub fn close(&mut self, uri: &str) {
        self.documents.remove(uri);
    }

    pub fn get(&self, uri: &str) -> Option<&DocumentInfo> {
        self.documents.get(uri)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Text of `uri`: the editor's copy when open, otherwise the file on
    /// disk, otherwise empty.
    pub fn content(&self, uri: &Uri) -> String {
        match self.get(uri.as_str()) {
            Some(doc) => doc.content.clone(),
            None => std::fs::read_to_string(uri_to_path(uri)).unwrap_or_default(),
        }
    }
}

/// Convert an LSP URI to a file system path.
///
/// Handles `file:///path/to/file` URIs by stripping the scheme and authority
/// and percent-decoding (e.g. `%3A` → `:`).
pub fn uri_to_path(uri: &Uri) -> PathBuf {
    let s = uri.as_str();
    match s.strip_prefix("file://") {
        Some(path) => {
            let decoded = percent_decode(path);
            // file:///C:/foo -> C:/foo
            #[cfg(windows)]
            let decoded = decoded.strip_prefix('/').map(str::to_owned).unwrap_or(decoded);
            PathBuf::from(decoded)
        }
        None => PathBuf::from(s),
    }
}

/// Decode percent-encoded bytes in a URI path (e.g. `%3A` → `:`).
fn percent_decode(input: &str) -> String {
    let mut bytes = Vec::with_capacity(input.len());
    let mut iter = input.bytes();
    while let Some(b) = iter.next() {
        if b != b'%' {
            bytes.push(b);
            continue;
        }
        let (hi, lo) = (iter.next(), iter.next());
        match (hi.and_then(hex_val), lo.and_then(hex_val)) {
            (Some(h), Some(l)) => bytes.push(h << 4 | l),
            // Malformed percent encoding -- pass through
            _ => {
                bytes.push(b'%');
                bytes.extend(hi);
                bytes.extend(lo);
            }
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
