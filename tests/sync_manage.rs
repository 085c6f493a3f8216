#![allow(clippy::unwrap_used)]
//! Listing, status, rename and delete against an in-memory platform.

mod common;

use std::sync::Arc;

use common::MockClient;
use locsync_cli::config::ConfigResolver;
use locsync_cli::error::SyncError;
use locsync_cli::output::Output;
use locsync_cli::sync::{FileSelector, FileSync};

fn file_sync(client: &Arc<MockClient>) -> FileSync {
    let client: Arc<MockClient> = Arc::clone(client);
    FileSync::new(client, "proj")
        .with_threads(3)
        .with_resolver(ConfigResolver::with_vars(
            std::iter::empty::<(String, String)>(),
        ))
        .with_output(Output::silent())
}

#[tokio::test]
async fn test_list_filters_and_sorts() {
    let client = Arc::new(MockClient::with_files(&[
        "web/b.json",
        "app/strings.xml",
        "web/a.json",
        "web/nested/c.json",
    ]));
    let sync = file_sync(&client);

    let uris = |files: Vec<locsync_cli::api::RemoteFile>| -> Vec<String> {
        files.into_iter().map(|file| file.uri).collect()
    };

    assert_eq!(
        uris(sync.list("web/*.json").await.unwrap()),
        ["web/a.json", "web/b.json"]
    );
    assert_eq!(
        uris(sync.list("web/**.json").await.unwrap()),
        ["web/a.json", "web/b.json", "web/nested/c.json"]
    );
    assert_eq!(sync.list("").await.unwrap().len(), 4);
    assert!(sync.list("*.po").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_rejects_malformed_pattern() {
    let client = Arc::new(MockClient::with_files(&["a.json"]));
    let err = file_sync(&client).list("[oops").await.unwrap_err();
    assert!(matches!(err, SyncError::Glob(_)));
}

#[tokio::test]
async fn test_status_collects_results_and_failures() {
    let mut mock = MockClient::with_files(&["c.json", "a.json", "b.json"]);
    mock.set_status("a.json", &[("fr-FR", 10), ("de-DE", 3)]);
    mock.set_status("c.json", &[("fr-FR", 0)]);
    let client = Arc::new(mock);

    let report = file_sync(&client).status("*.json").await.unwrap();

    let uris: Vec<&str> = report
        .entries
        .iter()
        .map(|(file, _)| file.uri.as_str())
        .collect();
    assert_eq!(uris, ["a.json", "c.json"]);
    assert_eq!(report.failed, ["b.json"]);

    let (_, status) = &report.entries[0];
    assert_eq!(status.percent_complete(&status.locales[0]), 100);
    assert_eq!(status.percent_complete(&status.locales[1]), 30);
}

#[tokio::test]
async fn test_status_without_matches_is_an_error() {
    let client = Arc::new(MockClient::with_files(&["a.json"]));
    let err = file_sync(&client).status("*.po").await.unwrap_err();
    assert!(matches!(err, SyncError::NoFilesMatched { ref pattern } if pattern == "*.po"));
}

#[tokio::test]
async fn test_rename_passes_through() {
    let client = Arc::new(MockClient::default());
    file_sync(&client)
        .rename("old.json", "new.json")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_matched_files() {
    let client = Arc::new(MockClient::with_files(&["a.json", "b.json", "keep.po"]));

    let deleted = file_sync(&client)
        .delete(&FileSelector::Pattern("*.json".to_string()))
        .await
        .unwrap();

    assert_eq!(deleted, 2);
    assert_eq!(client.deleted_uris(), ["a.json", "b.json"]);
}

#[tokio::test]
async fn test_delete_listed_uris_skips_listing() {
    let client = Arc::new(MockClient::default());

    let deleted = file_sync(&client)
        .delete(&FileSelector::Listed(vec!["x.json".to_string()]))
        .await
        .unwrap();

    assert_eq!(deleted, 1);
    assert_eq!(client.deleted_uris(), ["x.json"]);
}

#[tokio::test]
async fn test_delete_failures_are_aggregated() {
    let mut mock = MockClient::with_files(&["a.json", "b.json", "c.json"]);
    mock.fail_delete("b.json", "VALIDATION_ERROR");
    let client = Arc::new(mock);

    let err = file_sync(&client)
        .delete(&FileSelector::Pattern("*.json".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::DeleteFailed { ref files } if files == &["b.json"]));
    assert_eq!(client.deleted_uris(), ["a.json", "c.json"]);
}

#[tokio::test]
async fn test_delete_stops_on_fatal_error() {
    let mut mock = MockClient::with_files(&["a.json", "b.json"]);
    mock.fail_delete("a.json", "AUTHENTICATION_ERROR");
    let client = Arc::new(mock);

    let err = file_sync(&client)
        .delete(&FileSelector::Pattern("*.json".to_string()))
        .await
        .unwrap_err();

    assert!(err.api_source().is_some_and(|source| source.is_fatal()));
    assert!(client.deleted_uris().is_empty());
}
