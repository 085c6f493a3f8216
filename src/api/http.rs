use async_trait::async_trait;
use futures_util::TryStreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{
    ApiError, ByteStream, FileStatus, PlatformClient, ProjectDetails, ProjectSummary, RemoteFile,
    RetrievalType, UploadRequest, UploadResult,
};

/// Production API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://api.smartling.com";

/// Prefix the API expects on parser directive form fields.
const DIRECTIVE_PREFIX: &str = "smartling.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthRequest<'a> {
    user_identifier: &'a str,
    user_secret: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthData {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: ResponseBody<T>,
}

#[derive(Debug, Deserialize)]
struct ResponseBody<T> {
    code: String,
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    #[serde(default)]
    key: Option<String>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ItemList<T> {
    items: Vec<T>,
}

/// REST client for the platform's v2 API.
///
/// An access token is requested on first use and reused for the lifetime of
/// the client.
pub struct HttpClient {
    client: Client,
    endpoint: String,
    user_id: String,
    secret: String,
    token: Mutex<Option<String>>,
}

impl HttpClient {
    pub fn new(endpoint: String, user_id: String, secret: String) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            user_id,
            secret,
            token: Mutex::new(None),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    async fn access_token(&self) -> Result<String, ApiError> {
        let mut token = self.token.lock().await;
        if let Some(token) = token.as_ref() {
            return Ok(token.clone());
        }

        tracing::debug!("authenticating as {}", self.user_id);
        let request = self
            .client
            .post(self.url("/auth-api/v2/authenticate"))
            .json(&AuthRequest {
                user_identifier: &self.user_id,
                user_secret: &self.secret,
            });
        let data: AuthData = parse_envelope(request.send().await?).await?;

        *token = Some(data.access_token.clone());
        Ok(data.access_token)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let token = self.access_token().await?;
        Ok(request.bearer_auth(token).send().await?)
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        parse_envelope(self.send(request).await?).await
    }

    async fn call_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        parse_envelope::<serde_json::Value>(self.send(request).await?)
            .await
            .map(drop)
            .or_else(|err| match err {
                // Some endpoints answer SUCCESS with a null data field.
                ApiError::Api { code, .. } if code == "EMPTY_RESPONSE" => Ok(()),
                other => Err(other),
            })
    }

    async fn download(&self, request: RequestBuilder) -> Result<ByteStream, ApiError> {
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(Box::pin(response.bytes_stream().map_err(ApiError::from)))
    }

    fn files_path(project_id: &str, rest: &str) -> String {
        format!("/files-api/v2/projects/{project_id}{rest}")
    }
}

async fn parse_envelope<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    let Ok(envelope) = serde_json::from_str::<Envelope<T>>(&body) else {
        return Err(classify(status, None, body));
    };

    let ResponseBody { code, data, errors } = envelope.response;
    if code == "SUCCESS" && status.is_success() {
        return data.ok_or_else(|| ApiError::api("EMPTY_RESPONSE", "response contained no data"));
    }

    let message = errors
        .iter()
        .map(|e| match &e.key {
            Some(key) => format!("{key}: {}", e.message),
            None => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ");
    Err(classify(status, Some(code), message))
}

async fn error_from_response(response: Response) -> ApiError {
    match parse_envelope::<serde_json::Value>(response).await {
        Err(err) => err,
        Ok(_) => ApiError::api("UNEXPECTED_RESPONSE", "download returned a JSON envelope"),
    }
}

fn classify(status: StatusCode, code: Option<String>, message: String) -> ApiError {
    match (status, code) {
        (StatusCode::UNAUTHORIZED, _) => ApiError::NotAuthorized(message),
        (StatusCode::NOT_FOUND, _) => ApiError::NotFound(message),
        (_, Some(code)) if code == "NOT_FOUND_ERROR" => ApiError::NotFound(message),
        (_, Some(code)) => ApiError::Api { code, message },
        (status, None) => ApiError::Api {
            code: format!("HTTP_{}", status.as_u16()),
            message,
        },
    }
}

#[async_trait]
impl PlatformClient for HttpClient {
    async fn list_files(&self, project_id: &str) -> Result<Vec<RemoteFile>, ApiError> {
        let request = self
            .client
            .get(self.url(&Self::files_path(project_id, "/files/list")));
        let list: ItemList<RemoteFile> = self.call(request).await?;
        Ok(list.items)
    }

    async fn file_status(
        &self,
        project_id: &str,
        file_uri: &str,
    ) -> Result<FileStatus, ApiError> {
        let request = self
            .client
            .get(self.url(&Self::files_path(project_id, "/file/status")))
            .query(&[("fileUri", file_uri)]);
        self.call(request).await
    }

    async fn download_file(
        &self,
        project_id: &str,
        file_uri: &str,
    ) -> Result<ByteStream, ApiError> {
        let request = self
            .client
            .get(self.url(&Self::files_path(project_id, "/file")))
            .query(&[("fileUri", file_uri)]);
        self.download(request).await
    }

    async fn download_translation(
        &self,
        project_id: &str,
        locale_id: &str,
        file_uri: &str,
        retrieval: RetrievalType,
    ) -> Result<ByteStream, ApiError> {
        let path = Self::files_path(project_id, &format!("/locales/{locale_id}/file"));
        let request = self
            .client
            .get(self.url(&path))
            .query(&[("fileUri", file_uri), ("retrievalType", retrieval.as_str())]);
        self.download(request).await
    }

    async fn upload_file(
        &self,
        project_id: &str,
        request: UploadRequest,
    ) -> Result<UploadResult, ApiError> {
        let file_name = request
            .file_uri
            .rsplit('/')
            .next()
            .unwrap_or(&request.file_uri)
            .to_string();

        let mut form = Form::new()
            .part(
                "file",
                Part::bytes(request.contents.to_vec()).file_name(file_name),
            )
            .text("fileUri", request.file_uri)
            .text("fileType", request.file_type.to_string())
            .text("authorize", request.authorize.to_string());

        for locale in request.locales_to_authorize {
            form = form.text("localeIdsToAuthorize[]", locale);
        }
        for (key, value) in request.directives {
            form = form.text(format!("{DIRECTIVE_PREFIX}{key}"), value);
        }

        let http_request = self
            .client
            .post(self.url(&Self::files_path(project_id, "/file")))
            .multipart(form);
        self.call(http_request).await
    }

    async fn rename_file(
        &self,
        project_id: &str,
        file_uri: &str,
        new_file_uri: &str,
    ) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.url(&Self::files_path(project_id, "/file/rename")))
            .form(&[("fileUri", file_uri), ("newFileUri", new_file_uri)]);
        self.call_empty(request).await
    }

    async fn delete_file(&self, project_id: &str, file_uri: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.url(&Self::files_path(project_id, "/file/delete")))
            .form(&[("fileUri", file_uri)]);
        self.call_empty(request).await
    }

    async fn list_projects(&self, account_id: &str) -> Result<Vec<ProjectSummary>, ApiError> {
        let request = self.client.get(self.url(&format!(
            "/accounts-api/v2/accounts/{account_id}/projects"
        )));
        let list: ItemList<ProjectSummary> = self.call(request).await?;
        Ok(list.items)
    }

    async fn project_details(&self, project_id: &str) -> Result<ProjectDetails, ApiError> {
        let request = self
            .client
            .get(self.url(&format!("/projects-api/v2/projects/{project_id}")));
        self.call(request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_parses() {
        let body = r#"{"response":{"code":"SUCCESS","data":{"items":[
            {"fileUri":"a.json","fileType":"json","lastUploaded":"2024-01-02T03:04:05Z"}
        ],"totalCount":1}}}"#;
        let envelope: Envelope<ItemList<RemoteFile>> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.response.code, "SUCCESS");
        assert_eq!(envelope.response.data.unwrap().items[0].uri, "a.json");
    }

    #[test]
    fn test_envelope_error_parses() {
        let body = r#"{"response":{"code":"VALIDATION_ERROR","errors":[
            {"key":"fileUri","message":"file not provided","details":null}
        ]}}"#;
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.response.code, "VALIDATION_ERROR");
        assert!(envelope.response.data.is_none());
        assert_eq!(envelope.response.errors[0].key.as_deref(), Some("fileUri"));
    }

    #[test]
    fn test_classify_by_status_and_code() {
        assert!(matches!(
            classify(StatusCode::UNAUTHORIZED, Some("AUTHENTICATION_ERROR".into()), String::new()),
            ApiError::NotAuthorized(_)
        ));
        assert!(matches!(
            classify(StatusCode::NOT_FOUND, None, String::new()),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            classify(StatusCode::BAD_REQUEST, Some("NOT_FOUND_ERROR".into()), String::new()),
            ApiError::NotFound(_)
        ));

        let err = classify(
            StatusCode::SERVICE_UNAVAILABLE,
            Some("MAINTENANCE_MODE_ERROR".into()),
            "down".into(),
        );
        assert!(err.is_fatal());

        let err = classify(StatusCode::BAD_GATEWAY, None, "<html>".into());
        assert_eq!(err.code(), Some("HTTP_502"));
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let client = HttpClient::new(
            "https://api.example.test/".to_string(),
            "user".to_string(),
            "secret".to_string(),
        );
        assert_eq!(
            client.url(&HttpClient::files_path("p1", "/files/list")),
            "https://api.example.test/files-api/v2/projects/p1/files/list"
        );
    }
}
