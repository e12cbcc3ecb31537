//! Wire types for the API client

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::error::{ClientError, Result};

/// The outer response shape wrapping every successful payload.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

/// `POST user/login` response payload.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginData {
    #[serde(rename = "firebaseDetail")]
    pub firebase_detail: FirebaseDetail,
    #[serde(default)]
    pub user: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FirebaseDetail {
    pub access_token: String,
}

/// One page of a project image listing.
#[derive(Debug, Deserialize)]
pub(crate) struct ImagePage {
    pub image_list: Vec<Value>,
    pub total_images: u64,
}

/// The currently selected project, with the storage fields collaborators
/// need to reach its S3 space.
#[derive(Clone, Debug)]
pub struct Project {
    /// Project id, rendered for use in request paths
    pub id: String,
    /// Base URL of the project's S3 space
    pub s3_base_url: String,
    /// AWS region of the project's S3 space
    pub aws_region: String,
    /// Bucket name, the first dot-separated label of the `s3_base_url` host
    pub bucket: String,
    /// Full project payload as returned by the API
    pub details: Value,
}

impl Project {
    pub(crate) fn from_value(details: Value) -> Result<Self> {
        let id = match &details["id"] {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            _ => {
                return Err(ClientError::InvalidResponse(
                    "project payload has no id".to_string(),
                ))
            }
        };

        let config = &details["config"];
        let s3_base_url = config["s3_base_url"]
            .as_str()
            .ok_or_else(|| {
                ClientError::InvalidResponse("project config has no s3_base_url".to_string())
            })?
            .to_string();
        let aws_region = config["aws_region"]
            .as_str()
            .ok_or_else(|| {
                ClientError::InvalidResponse("project config has no aws_region".to_string())
            })?
            .to_string();
        let bucket = bucket_from_url(&s3_base_url)?;

        Ok(Self {
            id,
            s3_base_url,
            aws_region,
            bucket,
            details,
        })
    }
}

/// First dot-separated label of the URL host.
fn bucket_from_url(s3_base_url: &str) -> Result<String> {
    let url = Url::parse(s3_base_url)
        .map_err(|err| ClientError::InvalidResponse(format!("bad s3_base_url: {err}")))?;
    let host = url.host_str().ok_or_else(|| {
        ClientError::InvalidResponse(format!("s3_base_url has no host: {s3_base_url}"))
    })?;
    Ok(host.split('.').next().unwrap_or(host).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn project_derives_storage_fields() {
        let project = Project::from_value(json!({
            "id": 42,
            "name": "Bridge inspection",
            "config": {
                "s3_base_url": "https://bucket1.s3.amazonaws.com/",
                "aws_region": "us-east-2"
            }
        }))
        .unwrap();

        assert_eq!(project.id, "42");
        assert_eq!(project.bucket, "bucket1");
        assert_eq!(project.aws_region, "us-east-2");
        assert_eq!(project.details["name"], "Bridge inspection");
    }

    #[test]
    fn string_project_ids_are_accepted() {
        let project = Project::from_value(json!({
            "id": "abc-123",
            "config": {
                "s3_base_url": "https://assets.t2d2.ai/",
                "aws_region": "us-east-1"
            }
        }))
        .unwrap();
        assert_eq!(project.id, "abc-123");
        assert_eq!(project.bucket, "assets");
    }

    #[test]
    fn missing_config_is_rejected() {
        let err = Project::from_value(json!({"id": 1})).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }
}
