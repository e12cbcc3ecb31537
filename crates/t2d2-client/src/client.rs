//! Main client implementation

use crate::{
    config::Config,
    credentials::Credentials,
    error::{ClientError, Result},
    types::{Envelope, ImagePage, LoginData, Project},
};
use bytes::Bytes;
use reqwest::{header, Method, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

/// Images are fetched in pages of this size.
const PAGE_SIZE: u64 = 100;

/// T2D2 platform client
///
/// Owns one authenticated session against a base URL: the session headers,
/// the logged-in user, and the currently selected project all live on the
/// client instance and are dropped with it.
#[derive(Debug)]
pub struct T2d2Client {
    config: Config,
    base_url: String,
    http: reqwest::Client,
    headers: header::HeaderMap,
    user: Option<Value>,
    organization: Option<Value>,
    project: Option<Project>,
}

impl T2d2Client {
    /// Create a client and authenticate with the given credentials.
    ///
    /// `Credentials::Password` issues one `POST user/login`; the other
    /// modes only set a session header and touch no network.
    pub async fn new(config: Config, credentials: Credentials) -> Result<Self> {
        let base_url = config.normalized_base_url();

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let mut client = Self {
            config,
            base_url,
            http,
            headers,
            user: None,
            organization: None,
            project: None,
        };
        client.login(credentials).await?;
        Ok(client)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The currently selected project, if `set_project` has been called
    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    /// The stored user, populated by password login or `set_user`
    pub fn user(&self) -> Option<&Value> {
        self.user.as_ref()
    }

    /// The stored organization, populated by `set_organization`
    pub fn organization(&self) -> Option<&Value> {
        self.organization.as_ref()
    }

    async fn login(&mut self, credentials: Credentials) -> Result<()> {
        match credentials {
            Credentials::AccessToken { access_token } => {
                self.set_bearer(&access_token)?;
            }
            Credentials::Password { email, password } => {
                let body = json!({ "email": email, "password": password });
                let res = self
                    .request("user/login", Method::POST, None, None, Some(&body))
                    .await?;
                let login: Envelope<LoginData> = serde_json::from_value(res)
                    .map_err(|err| ClientError::InvalidResponse(format!("login: {err}")))?;
                self.set_bearer(&login.data.firebase_detail.access_token)?;
                self.user = Some(login.data.user);
            }
            Credentials::ApiKey { api_key } => {
                self.headers.insert("x-api-key", api_key.parse()?);
            }
            Credentials::None => {}
        }
        Ok(())
    }

    fn set_bearer(&mut self, token: &str) -> Result<()> {
        self.headers
            .insert(header::AUTHORIZATION, format!("Bearer {token}").parse()?);
        Ok(())
    }

    // ==================== Session Context ====================

    /// Fetch a project and make it the current one.
    ///
    /// Derives the storage fields (`s3_base_url`, `aws_region`, `bucket`)
    /// that collaborators use to reach the project's S3 space.
    pub async fn set_project(&mut self, project_id: i64) -> Result<()> {
        let res = self
            .request(&format!("project/{project_id}"), Method::GET, None, None, None)
            .await?;
        self.project = Some(Project::from_value(data_field(res)?)?);
        Ok(())
    }

    /// Fetch a user and store it as the current user.
    pub async fn set_user(&mut self, user_id: i64) -> Result<()> {
        let res = self
            .request(&format!("user/{user_id}"), Method::GET, None, None, None)
            .await?;
        self.user = Some(data_field(res)?);
        Ok(())
    }

    /// Fetch an organization and store it as the current one.
    pub async fn set_organization(&mut self, organization_id: i64) -> Result<()> {
        let res = self
            .request(
                &format!("organization/{organization_id}"),
                Method::GET,
                None,
                None,
                None,
            )
            .await?;
        self.organization = Some(data_field(res)?);
        Ok(())
    }

    fn project_id(&self) -> Result<&str> {
        self.project
            .as_ref()
            .map(|p| p.id.as_str())
            .ok_or(ClientError::NoProject)
    }

    // ==================== Images ====================

    /// List all images in the current project matching a region search,
    /// accumulating pages until the reported total is reached.
    pub async fn get_images(&self, region: &str, filter_id: Option<i64>) -> Result<Vec<Value>> {
        let project_id = self.project_id()?;
        let path = format!("{project_id}/images");

        let mut images: Vec<Value> = Vec::new();
        let mut page: u64 = 1;
        let mut total = PAGE_SIZE;

        while (images.len() as u64) < total {
            let mut params = vec![
                ("search", region.to_string()),
                ("limit", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
                ("queryType", "1".to_string()),
            ];
            if let Some(filter_id) = filter_id {
                params.push(("filter_id", filter_id.to_string()));
            }

            let res = self
                .request(&path, Method::GET, Some(&params), None, None)
                .await?;
            let page_data: ImagePage = serde_json::from_value(data_field(res)?)
                .map_err(|err| ClientError::InvalidResponse(format!("image page: {err}")))?;

            if page_data.image_list.is_empty() {
                // The server's total can never be reached; stop rather
                // than requesting the same empty page forever.
                warn!(
                    fetched = images.len(),
                    total = page_data.total_images,
                    "empty image page, stopping pagination early"
                );
                break;
            }

            total = page_data.total_images;
            images.extend(page_data.image_list);
            debug!("fetched {} of {} images", images.len(), total);
            page += 1;
        }

        Ok(images)
    }

    /// Fetch a single image, optionally scoped by drawing and filter.
    pub async fn get_image(
        &self,
        image_id: i64,
        drawing_id: Option<i64>,
        filter_id: Option<i64>,
    ) -> Result<Value> {
        let project_id = self.project_id()?;
        let mut params = Vec::new();
        if let Some(drawing_id) = drawing_id {
            params.push(("drawing_id", drawing_id.to_string()));
        }
        if let Some(filter_id) = filter_id {
            params.push(("filter_id", filter_id.to_string()));
        }

        let res = self
            .request(
                &format!("{project_id}/images/{image_id}"),
                Method::GET,
                Some(&params),
                None,
                None,
            )
            .await?;
        data_field(res)
    }

    /// Register new images in the current project.
    pub async fn add_images(&self, payload: &Value) -> Result<Value> {
        let project_id = self.project_id()?;
        self.request(
            &format!("{project_id}/images"),
            Method::POST,
            None,
            None,
            Some(payload),
        )
        .await
    }

    // ==================== Drawings ====================

    /// Fetch all drawings of the current project.
    pub async fn get_drawings(&self, filter_id: Option<i64>) -> Result<Value> {
        let project_id = self.project_id()?;
        let mut params = Vec::new();
        if let Some(filter_id) = filter_id {
            params.push(("filter_id", filter_id.to_string()));
        }
        let res = self
            .request(
                &format!("{project_id}/drawings"),
                Method::GET,
                Some(&params),
                None,
                None,
            )
            .await?;
        data_field(res)
    }

    /// Fetch a single drawing.
    pub async fn get_drawing(&self, drawing_id: i64) -> Result<Value> {
        let project_id = self.project_id()?;
        let res = self
            .request(
                &format!("{project_id}/drawings/{drawing_id}"),
                Method::GET,
                None,
                None,
                None,
            )
            .await?;
        data_field(res)
    }

    /// Fetch all geotags placed on a drawing.
    pub async fn get_geotags(&self, drawing_id: i64) -> Result<Value> {
        let project_id = self.project_id()?;
        let params = vec![("drawing_id", drawing_id.to_string())];
        let res = self
            .request(
                &format!("{project_id}/geotags"),
                Method::GET,
                Some(&params),
                None,
                None,
            )
            .await?;
        data_field(res)
    }

    /// Fetch a saved filter.
    pub async fn get_filter(&self, filter_id: i64) -> Result<Value> {
        let project_id = self.project_id()?;
        let res = self
            .request(
                &format!("{project_id}/filters/{filter_id}"),
                Method::GET,
                None,
                None,
                None,
            )
            .await?;
        data_field(res)
    }

    // ==================== Reports ====================

    /// Upload a report to the current project.
    ///
    /// Unlike the getters, this returns the full response envelope rather
    /// than only its `data` field.
    pub async fn upload_report(&self, data: &Value) -> Result<Value> {
        let project_id = self.project_id()?;
        self.request(
            &format!("{project_id}/reports"),
            Method::PUT,
            None,
            None,
            Some(data),
        )
        .await
    }

    /// Fetch the region categories of the current project. Returns the
    /// full response envelope.
    pub async fn get_regions(&self) -> Result<Value> {
        let project_id = self.project_id()?;
        self.request(
            &format!("{project_id}/categories/regions"),
            Method::GET,
            None,
            None,
            None,
        )
        .await
    }

    // ==================== Generic Dispatch ====================

    /// Send one request and decode the response.
    ///
    /// Per-call `headers` are merged over a copy of the session headers for
    /// this request only. GET sends query params; POST/PUT/DELETE send
    /// query params plus a JSON body (empty object when `data` is `None`).
    /// A 200 response that is not valid JSON degrades to
    /// `{"content": <raw body>}` instead of failing.
    pub async fn request(
        &self,
        path: &str,
        method: Method,
        params: Option<&[(&str, String)]>,
        headers: Option<header::HeaderMap>,
        data: Option<&Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        let mut req = if method == Method::GET {
            self.http.get(&url)
        } else if method == Method::POST {
            self.http.post(&url)
        } else if method == Method::PUT {
            self.http.put(&url)
        } else if method == Method::DELETE {
            self.http.delete(&url)
        } else {
            return Err(ClientError::Config(format!(
                "unsupported request method: {method}"
            )));
        };

        let mut merged = self.headers.clone();
        if let Some(extra) = headers {
            merged.extend(extra);
        }
        req = req.headers(merged.clone());

        if let Some(params) = params {
            req = req.query(params);
        }

        let body = data.cloned().unwrap_or_else(|| json!({}));
        if method != Method::GET {
            req = req.json(&body);
        }

        debug!("{} {}", method, url);
        let res = req.send().await?;
        let status = res.status();
        let raw: Bytes = res.bytes().await?;

        if status == StatusCode::OK {
            match serde_json::from_slice(&raw) {
                Ok(value) => Ok(value),
                Err(err) => {
                    warn!("response is not JSON ({err}), returning raw content");
                    Ok(json!({ "content": String::from_utf8_lossy(&raw) }))
                }
            }
        } else {
            error!(
                %method,
                %url,
                headers = ?merged,
                params = ?params,
                body = %body,
                status = status.as_u16(),
                response = %String::from_utf8_lossy(&raw),
                "API request rejected"
            );
            Err(ClientError::Api {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&raw).into_owned(),
            })
        }
    }
}

/// Unwrap the `data` field of a response envelope.
fn data_field(res: Value) -> Result<Value> {
    match res {
        Value::Object(mut map) => map
            .remove("data")
            .ok_or_else(|| ClientError::InvalidResponse("response has no data field".to_string())),
        other => Err(ClientError::InvalidResponse(format!(
            "expected a JSON object, got: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_field_unwraps_the_envelope() {
        let res = json!({"data": {"id": 7}, "message": "ok"});
        assert_eq!(data_field(res).unwrap(), json!({"id": 7}));
    }

    #[test]
    fn missing_data_field_is_an_error() {
        let err = data_field(json!({"message": "ok"})).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[test]
    fn non_object_envelope_is_an_error() {
        let err = data_field(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }
}
