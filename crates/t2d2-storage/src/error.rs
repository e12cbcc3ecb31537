//! Error types for storage operations

use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::{
    get_object::GetObjectError, list_objects_v2::ListObjectsV2Error, put_object::PutObjectError,
};
use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// S3 service error
    #[error("S3 error: {0}")]
    S3(String),

    /// Object URL that does not name a bucket and key
    #[error("invalid object URL: {0}")]
    InvalidUrl(String),

    /// Local file I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Object body could not be streamed
    #[error("byte stream error: {0}")]
    ByteStream(String),
}

impl From<SdkError<GetObjectError>> for StorageError {
    fn from(err: SdkError<GetObjectError>) -> Self {
        Self::S3(err.to_string())
    }
}

impl From<SdkError<PutObjectError>> for StorageError {
    fn from(err: SdkError<PutObjectError>) -> Self {
        Self::S3(err.to_string())
    }
}

impl From<SdkError<ListObjectsV2Error>> for StorageError {
    fn from(err: SdkError<ListObjectsV2Error>) -> Self {
        Self::S3(err.to_string())
    }
}
