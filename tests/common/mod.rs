#![allow(dead_code, clippy::unwrap_used)]
//! In-memory platform used by the sync integration tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use locsync_cli::api::{
    ApiError, ByteStream, FileStatus, FileType, LocaleStatus, PlatformClient, ProjectDetails,
    ProjectSummary, RemoteFile, RetrievalType, UploadRequest, UploadResult, byte_stream,
};

#[derive(Default)]
pub struct MockClient {
    pub files: Vec<RemoteFile>,
    pub statuses: HashMap<String, FileStatus>,
    /// URIs whose downloads fail with a generic API error.
    pub failing_downloads: HashSet<String>,
    /// Remote URI -> (code, message) returned by `upload_file`.
    pub upload_errors: HashMap<String, (String, String)>,
    /// Remote URI -> error code returned by `delete_file`.
    pub delete_errors: HashMap<String, String>,
    /// Remote URIs in the order uploads were attempted.
    pub attempts: Mutex<Vec<String>>,
    pub uploads: Mutex<Vec<UploadRequest>>,
    pub deleted: Mutex<Vec<String>>,
}

impl MockClient {
    pub fn with_files(uris: &[&str]) -> Self {
        Self {
            files: uris.iter().map(|uri| remote_file(uri)).collect(),
            ..Self::default()
        }
    }

    /// Gives `uri` 10 strings, with `done` of them translated per locale.
    pub fn set_status(&mut self, uri: &str, locales: &[(&str, u64)]) {
        self.statuses.insert(
            uri.to_string(),
            FileStatus {
                file_uri: uri.to_string(),
                total_string_count: 10,
                total_word_count: 40,
                locales: locales
                    .iter()
                    .map(|(locale, done)| LocaleStatus {
                        locale_id: (*locale).to_string(),
                        completed_string_count: *done,
                        completed_word_count: done * 4,
                    })
                    .collect(),
            },
        );
    }

    pub fn fail_upload(&mut self, uri: &str, code: &str) {
        self.upload_errors
            .insert(uri.to_string(), (code.to_string(), "rejected".to_string()));
    }

    pub fn fail_delete(&mut self, uri: &str, code: &str) {
        self.delete_errors.insert(uri.to_string(), code.to_string());
    }

    pub fn deleted_uris(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn attempted_uris(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn uploaded_uris(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.file_uri.clone())
            .collect()
    }
}

pub fn remote_file(uri: &str) -> RemoteFile {
    RemoteFile {
        uri: uri.to_string(),
        last_uploaded: None,
        file_type: FileType::Json,
        total_string_count: 10,
    }
}

#[async_trait]
impl PlatformClient for MockClient {
    async fn list_files(&self, _project_id: &str) -> Result<Vec<RemoteFile>, ApiError> {
        Ok(self.files.clone())
    }

    async fn file_status(&self, _project_id: &str, file_uri: &str) -> Result<FileStatus, ApiError> {
        self.statuses
            .get(file_uri)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(file_uri.to_string()))
    }

    async fn download_file(&self, _project_id: &str, file_uri: &str) -> Result<ByteStream, ApiError> {
        if self.failing_downloads.contains(file_uri) {
            return Err(ApiError::api("GENERAL_ERROR", "download failed"));
        }
        Ok(byte_stream(format!("source of {file_uri}")))
    }

    async fn download_translation(
        &self,
        _project_id: &str,
        locale_id: &str,
        file_uri: &str,
        _retrieval: RetrievalType,
    ) -> Result<ByteStream, ApiError> {
        if self.failing_downloads.contains(file_uri) {
            return Err(ApiError::api("GENERAL_ERROR", "download failed"));
        }
        Ok(byte_stream(format!("{locale_id} translation of {file_uri}")))
    }

    async fn upload_file(
        &self,
        _project_id: &str,
        request: UploadRequest,
    ) -> Result<UploadResult, ApiError> {
        self.attempts.lock().unwrap().push(request.file_uri.clone());
        if let Some((code, message)) = self.upload_errors.get(&request.file_uri) {
            return Err(ApiError::api(code.clone(), message.clone()));
        }
        self.uploads.lock().unwrap().push(request);
        Ok(UploadResult {
            overwritten: false,
            string_count: 3,
            word_count: 9,
        })
    }

    async fn rename_file(
        &self,
        _project_id: &str,
        _file_uri: &str,
        _new_file_uri: &str,
    ) -> Result<(), ApiError> {
        Ok(())
    }

    async fn delete_file(&self, _project_id: &str, file_uri: &str) -> Result<(), ApiError> {
        if let Some(code) = self.delete_errors.get(file_uri) {
            return Err(ApiError::api(code.clone(), "rejected"));
        }
        self.deleted.lock().unwrap().push(file_uri.to_string());
        Ok(())
    }

    async fn list_projects(&self, _account_id: &str) -> Result<Vec<ProjectSummary>, ApiError> {
        Ok(Vec::new())
    }

    async fn project_details(&self, project_id: &str) -> Result<ProjectDetails, ApiError> {
        Err(ApiError::NotFound(project_id.to_string()))
    }
}
