//! # T2D2 Client SDK
//!
//! A client SDK for the T2D2 construction-inspection platform REST API.
//!
//! ## Features
//!
//! - **Three credential modes**: bearer token, email/password login, API key
//! - **Project scoping**: select a project once, then fetch its resources
//! - **Paginated listings**: image listings are accumulated across pages
//! - **Opaque payloads**: resources come back as raw JSON, uninterpreted
//!
//! ## Example
//!
//! ```rust,ignore
//! use t2d2_client::{Config, Credentials, T2d2Client};
//!
//! #[tokio::main]
//! async fn main() -> t2d2_client::Result<()> {
//!     // Create client and authenticate
//!     let mut client = T2d2Client::new(
//!         Config::default(),
//!         Credentials::password("inspector@example.com", "secret"),
//!     )
//!     .await?;
//!
//!     // Scope subsequent calls to a project
//!     client.set_project(42).await?;
//!
//!     // Fetch every image tagged with a region
//!     let images = client.get_images("north-facade", None).await?;
//!     println!("{} images", images.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod credentials;
mod error;
mod types;

pub use client::T2d2Client;
pub use config::Config;
pub use credentials::Credentials;
pub use error::{ClientError, Result};
pub use types::Project;
