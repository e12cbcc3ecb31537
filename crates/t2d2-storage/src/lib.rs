//! # T2D2 Storage
//!
//! Object storage helpers for T2D2 inspection assets on S3: download by
//! bucket/key or `s3://` URL, upload with a canned ACL, and size/count
//! aggregation under a key prefix.
//!
//! Credentials come from `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`;
//! when unset, S3 rejects the calls that need real credentials.
//!
//! ## Example
//!
//! ```rust,ignore
//! use t2d2_storage::StorageClient;
//!
//! #[tokio::main]
//! async fn main() -> t2d2_storage::Result<()> {
//!     let storage = StorageClient::new().await;
//!
//!     storage
//!         .download_url("s3://bucket1.s3.amazonaws.com/images/north.jpg", "./north.jpg")
//!         .await?;
//!
//!     let summary = storage.calculate_sizes("bucket1", "images/").await?;
//!     println!("{} objects, {}", summary.number, summary.size);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod format;

pub use client::{parse_object_url, SizeSummary, StorageClient};
pub use error::{Result, StorageError};
pub use format::format_size;
