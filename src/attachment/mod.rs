//! Attachments for the forum backend.
//!
//! An attachment is binary content persisted under a generated reference
//! (`{uuid}.{ext}`) before any post may point at it.

mod storage;

pub use storage::FileAttachmentStore;

use std::path::Path;

use uuid::Uuid;

/// URL prefix under which attachments are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Maximum length of a stored file extension.
pub const MAX_EXTENSION_LENGTH: usize = 8;

/// Extension used when the original name has no usable one.
pub const DEFAULT_EXTENSION: &str = "bin";

/// A persisted attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Stored reference, resolvable through the attachment store.
    pub reference: String,
    /// Size of the content in bytes.
    pub size: u64,
}

impl Attachment {
    /// Create a new Attachment.
    pub fn new(reference: impl Into<String>, size: u64) -> Self {
        Self {
            reference: reference.into(),
            size,
        }
    }

    /// Public URL of this attachment.
    pub fn url(&self) -> String {
        format!("{UPLOADS_URL_PREFIX}/{}", self.reference)
    }
}

fn is_valid_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.len() <= MAX_EXTENSION_LENGTH && ext.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Extract a safe, lowercase file extension from an uploaded file name.
///
/// Returns `"bin"` if the name has no extension or an unusable one.
pub fn sanitize_extension(original_name: Option<&str>) -> String {
    original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| is_valid_extension(ext))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// Check that a reference has the `{uuid}.{ext}` shape produced by the store.
///
/// Anything else (path separators, `..`, missing extension) is rejected, so a
/// valid reference can never resolve outside the storage directory.
pub fn is_valid_reference(reference: &str) -> bool {
    let Some((stem, ext)) = reference.rsplit_once('.') else {
        return false;
    };
    stem.len() == 36 && Uuid::parse_str(stem).is_ok() && is_valid_extension(ext)
}
