//! Boundary to the remote file store. Uploads happen one file at a time and
//! fail per-file; the caller decides what to do with the survivors.

pub mod drive;

use super::listings::domain::{PendingAttachment, UserId};

pub use drive::GoogleDriveFileStore;

/// What the file store hands back for a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub public_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("file store rejected '{name}': {reason}")]
    Rejected { name: String, reason: String },
    #[error("file store unavailable: {0}")]
    Unavailable(String),
}

pub trait FileStore: Send + Sync {
    fn upload_document(
        &self,
        owner: &UserId,
        attachment: &PendingAttachment,
    ) -> Result<StoredDocument, FileStoreError>;
}
