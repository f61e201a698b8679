use std::io::Cursor;

use google_drive3::{api::File, api::Scope, DriveHub};
use tokio::runtime::Runtime;

use super::{FileStore, FileStoreError, StoredDocument};
use crate::marketplace::listings::domain::{PendingAttachment, UserId};

/// File store backed by a Google Drive folder. Wraps the generated
/// google-drive3 client so synchronous submission flows can upload without
/// exposing async details.
pub struct GoogleDriveFileStore<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    hub: DriveHub<C>,
    runtime: Runtime,
    folder_id: String,
}

impl<C> GoogleDriveFileStore<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    pub fn new(hub: DriveHub<C>, runtime: Runtime, folder_id: impl Into<String>) -> Self {
        Self {
            hub,
            runtime,
            folder_id: folder_id.into(),
        }
    }

    pub fn with_runtime(
        hub: DriveHub<C>,
        folder_id: impl Into<String>,
    ) -> Result<Self, FileStoreError> {
        let runtime = Runtime::new().map_err(|err| FileStoreError::Unavailable(err.to_string()))?;
        Ok(Self::new(hub, runtime, folder_id))
    }

    fn upload_name(owner: &UserId, attachment: &PendingAttachment) -> String {
        format!("{}-{}", owner.0, attachment.name)
    }
}

impl<C> std::fmt::Debug for GoogleDriveFileStore<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleDriveFileStore")
            .field("folder_id", &self.folder_id)
            .finish_non_exhaustive()
    }
}

impl<C> FileStore for GoogleDriveFileStore<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    fn upload_document(
        &self,
        owner: &UserId,
        attachment: &PendingAttachment,
    ) -> Result<StoredDocument, FileStoreError> {
        let metadata = File {
            name: Some(Self::upload_name(owner, attachment)),
            parents: Some(vec![self.folder_id.clone()]),
            ..File::default()
        };

        let content_type: mime::Mime = attachment
            .mime_type
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);
        let cursor = Cursor::new(attachment.bytes.clone());

        let result = self.runtime.block_on(async {
            self.hub
                .files()
                .create(metadata)
                .param("fields", "id,webViewLink")
                .supports_all_drives(true)
                .add_scope(Scope::File)
                .upload(cursor, content_type)
                .await
        });

        let (_, file) = result.map_err(|err| FileStoreError::Rejected {
            name: attachment.name.clone(),
            reason: err.to_string(),
        })?;

        let public_url = file
            .web_view_link
            .or_else(|| {
                file.id
                    .map(|id| format!("https://drive.google.com/file/d/{id}/view"))
            })
            .ok_or_else(|| FileStoreError::Rejected {
                name: attachment.name.clone(),
                reason: "upload returned no link".to_string(),
            })?;

        Ok(StoredDocument { public_url })
    }
}
