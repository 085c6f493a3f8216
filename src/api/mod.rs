//! Boundary to the translation-management platform.
//!
//! The sync core only talks to [`PlatformClient`]; [`HttpClient`] is the
//! REST implementation used by the binary.

mod error;
mod http;
mod types;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use std::pin::Pin;

pub use error::{ApiError, FATAL_CODES};
pub use http::{DEFAULT_ENDPOINT, HttpClient};
pub use types::{
    FileStatus, FileType, LocaleStatus, ProjectDetails, ProjectSummary, RemoteFile,
    RetrievalType, TargetLocale, UploadRequest, UploadResult,
};

/// Streamed file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ApiError>> + Send>>;

/// Wraps in-memory contents as a [`ByteStream`].
pub fn byte_stream(contents: impl Into<Bytes>) -> ByteStream {
    let contents = contents.into();
    Box::pin(futures_util::stream::once(async move { Ok(contents) }))
}

/// Operations the CLI needs from the platform.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Lists every file in the project.
    async fn list_files(&self, project_id: &str) -> Result<Vec<RemoteFile>, ApiError>;

    async fn file_status(&self, project_id: &str, file_uri: &str)
    -> Result<FileStatus, ApiError>;

    /// Downloads the original source file.
    async fn download_file(&self, project_id: &str, file_uri: &str)
    -> Result<ByteStream, ApiError>;

    async fn download_translation(
        &self,
        project_id: &str,
        locale_id: &str,
        file_uri: &str,
        retrieval: RetrievalType,
    ) -> Result<ByteStream, ApiError>;

    async fn upload_file(
        &self,
        project_id: &str,
        request: UploadRequest,
    ) -> Result<UploadResult, ApiError>;

    async fn rename_file(
        &self,
        project_id: &str,
        file_uri: &str,
        new_file_uri: &str,
    ) -> Result<(), ApiError>;

    async fn delete_file(&self, project_id: &str, file_uri: &str) -> Result<(), ApiError>;

    async fn list_projects(&self, account_id: &str) -> Result<Vec<ProjectSummary>, ApiError>;

    async fn project_details(&self, project_id: &str) -> Result<ProjectDetails, ApiError>;
}
