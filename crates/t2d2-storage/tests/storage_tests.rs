//! Offline tests for the storage client
//!
//! These exercise construction and the local-file half of uploads; calls
//! that would reach S3 are covered by the error paths that fire before
//! any network I/O happens.

use t2d2_storage::{StorageClient, StorageError};

#[tokio::test]
async fn builds_without_credential_env_vars() {
    // Construction must succeed with empty credentials; only real S3
    // calls are rejected later, by the service.
    let _client = StorageClient::with_region("eu-west-1").await;
}

#[tokio::test]
async fn upload_of_missing_file_fails_before_any_network_io() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist.jpg");

    let client = StorageClient::new().await;
    let err = client
        .upload_file(&missing, "bucket1", "images/x.jpg", None)
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::ByteStream(_)));
}
