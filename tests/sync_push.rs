#![allow(clippy::unwrap_used)]
//! Push behavior against an in-memory platform.

mod common;

use std::fs;
use std::sync::Arc;

use common::MockClient;
use locsync_cli::api::{ApiError, FileType};
use locsync_cli::config::{ConfigResolver, FileConfig, FileRules, Flag, PushConfig};
use locsync_cli::error::SyncError;
use locsync_cli::output::Output;
use locsync_cli::sync::{FileSync, PushParams, PushSummary};
use tempfile::TempDir;

fn no_env() -> ConfigResolver {
    ConfigResolver::with_vars(std::iter::empty::<(String, String)>())
}

fn workspace(files: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for file in files {
        let path = dir.path().join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("contents of {file}")).unwrap();
    }
    dir
}

fn file_sync(
    client: &Arc<MockClient>,
    dir: &TempDir,
    resolver: ConfigResolver,
    rules: FileRules,
) -> FileSync {
    let client: Arc<MockClient> = Arc::clone(client);
    FileSync::new(client, "proj")
        .with_rules(rules)
        .with_resolver(resolver)
        .with_output(Output::silent())
        .with_base_dir(dir.path())
}

fn params(pattern: &str) -> PushParams {
    PushParams {
        pattern: pattern.to_string(),
        uri: None,
        file_type: Flag::unset(String::new()),
        directives: Vec::new(),
        authorize: Flag::unset(false),
        locales: Vec::new(),
        branch: None,
    }
}

#[tokio::test]
async fn test_pushes_every_matching_file() {
    let dir = workspace(&["a.json", "b.json", "notes.txt"]);
    let client = Arc::new(MockClient::default());

    let summary = file_sync(&client, &dir, no_env(), FileRules::new())
        .push(params("*.json"))
        .await
        .unwrap();

    assert_eq!(
        summary,
        PushSummary {
            uploaded: 2,
            overwritten: 0
        }
    );
    assert_eq!(client.uploaded_uris(), ["a.json", "b.json"]);

    let uploads = client.uploads.lock().unwrap();
    assert_eq!(uploads[0].file_type, FileType::Json);
    assert_eq!(&uploads[0].contents[..], b"contents of a.json");
}

#[tokio::test]
async fn test_generic_failure_is_reported_after_remaining_files() {
    let dir = workspace(&["a.json", "b.json", "c.json"]);
    let mut mock = MockClient::default();
    mock.fail_upload("b.json", "VALIDATION_ERROR");
    let client = Arc::new(mock);

    let err = file_sync(&client, &dir, no_env(), FileRules::new())
        .push(params("*.json"))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::PushFailed { ref files } if files == &["b.json"]));
    let message = err.to_string();
    assert!(message.contains("b.json"));
    assert!(!message.contains("a.json"));
    assert!(!message.contains("c.json"));
    assert_eq!(client.uploaded_uris(), ["a.json", "c.json"]);
}

#[tokio::test]
async fn test_fatal_error_stops_push() {
    let dir = workspace(&["a.json", "b.json", "c.json"]);
    let mut mock = MockClient::default();
    mock.fail_upload("a.json", "MAINTENANCE_MODE_ERROR");
    let client = Arc::new(mock);

    let err = file_sync(&client, &dir, no_env(), FileRules::new())
        .push(params("*.json"))
        .await
        .unwrap_err();

    let source = err.api_source().unwrap();
    assert!(matches!(source, ApiError::Api { code, .. } if code == "MAINTENANCE_MODE_ERROR"));
    assert_eq!(client.attempted_uris(), ["a.json"]);
}

#[tokio::test]
async fn test_invalid_directive_aborts_before_upload() {
    let dir = workspace(&["a.json"]);
    let client = Arc::new(MockClient::default());

    let mut params = params("*.json");
    params.directives = vec!["placeholder_format=C".to_string(), "oops".to_string()];

    let err = file_sync(&client, &dir, no_env(), FileRules::new())
        .push(params)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::InvalidDirectiveFormat(ref d) if d == "oops"));
    assert!(client.attempted_uris().is_empty());
}

#[tokio::test]
async fn test_authorize_conflicts_with_locales() {
    let dir = workspace(&["a.json"]);
    let client = Arc::new(MockClient::default());

    let mut params = params("*.json");
    params.authorize = Flag::set(true, false);
    params.locales = vec!["fr-FR".to_string()];

    let err = file_sync(&client, &dir, no_env(), FileRules::new())
        .push(params)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::ConflictingParameters(_)));
    assert!(client.attempted_uris().is_empty());
}

#[tokio::test]
async fn test_explicit_uri_requires_single_file() {
    let dir = workspace(&["a.json", "b.json"]);
    let client = Arc::new(MockClient::default());

    let mut many = params("*.json");
    many.uri = Some("remote.json".to_string());
    let err = file_sync(&client, &dir, no_env(), FileRules::new())
        .push(many)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::ConflictingParameters(_)));

    let mut single = params("a.json");
    single.uri = Some("remote.json".to_string());
    file_sync(&client, &dir, no_env(), FileRules::new())
        .push(single)
        .await
        .unwrap();
    assert_eq!(client.uploaded_uris(), ["remote.json"]);
}

#[tokio::test]
async fn test_rules_branch_and_cli_directives() {
    let dir = workspace(&["strings/app.txt"]);
    let client = Arc::new(MockClient::default());

    let mut rules = FileRules::new();
    rules.insert(
        "default",
        FileConfig {
            push: PushConfig {
                file_type: None,
                directives: [("a", "1"), ("b", "1")]
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
            ..FileConfig::default()
        },
    );
    rules.insert(
        "strings/*.txt",
        FileConfig {
            push: PushConfig {
                file_type: Some("yaml".to_string()),
                ..PushConfig::default()
            },
            ..FileConfig::default()
        },
    );

    let mut params = params("strings/*.txt");
    params.directives = vec!["b=2".to_string()];
    params.branch = Some("feature/".to_string());

    file_sync(&client, &dir, no_env(), rules)
        .push(params)
        .await
        .unwrap();

    let uploads = client.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].file_uri, "feature/strings/app.txt");
    assert_eq!(uploads[0].file_type, FileType::Yaml);
    assert_eq!(uploads[0].directives["a"], "1");
    assert_eq!(uploads[0].directives["b"], "2");
}

#[tokio::test]
async fn test_type_from_environment_beats_rule() {
    let dir = workspace(&["a.json"]);
    let client = Arc::new(MockClient::default());

    let mut rules = FileRules::new();
    rules.insert(
        "*.json",
        FileConfig {
            push: PushConfig {
                file_type: Some("yaml".to_string()),
                ..PushConfig::default()
            },
            ..FileConfig::default()
        },
    );

    file_sync(
        &client,
        &dir,
        ConfigResolver::with_vars([("LOCSYNC_TYPE", "plainText")]),
        rules,
    )
    .push(params("*.json"))
    .await
    .unwrap();

    assert_eq!(
        client.uploads.lock().unwrap()[0].file_type,
        FileType::PlainText
    );
}

#[tokio::test]
async fn test_unknown_type_is_a_per_file_failure() {
    let dir = workspace(&["a.json", "b.unknown"]);
    let client = Arc::new(MockClient::default());

    let err = file_sync(&client, &dir, no_env(), FileRules::new())
        .push(params("*"))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::PushFailed { ref files } if files == &["b.unknown"]));
    assert_eq!(client.uploaded_uris(), ["a.json"]);
}

#[tokio::test]
async fn test_no_local_files() {
    let dir = workspace(&["a.json"]);
    let client = Arc::new(MockClient::default());

    let err = file_sync(&client, &dir, no_env(), FileRules::new())
        .push(params("*.po"))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::NoFilesMatched { .. }));
}

#[tokio::test]
async fn test_malformed_rule_pattern_aborts_before_upload() {
    let dir = workspace(&["a.json", "b.json"]);
    let client = Arc::new(MockClient::default());

    let mut rules = FileRules::new();
    rules.insert("[broken", FileConfig::default());

    let err = file_sync(&client, &dir, no_env(), rules)
        .push(params("*.json"))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Glob(_)));
    assert_eq!(err.exit_code(), exitcode::USAGE);
    assert!(client.attempted_uris().is_empty());
}
