//! Persistence gateway
//!
//! [`LayoutGateway`] is the seam between the editor and the layout service.
//! [`HttpGateway`] talks to the real REST backend; tests substitute an
//! in-memory implementation.

use crate::descriptor::ObjectDescriptor;
use crate::error::GatewayError;
use crate::layout::{CreatedLayout, Layout, LayoutId, LayoutSummary, NewLayout, SaveLayoutRequest};
use crate::session::UserRecord;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

/// Base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Body returned by the login and register endpoints
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserRecord,
    pub token: String,
}

/// Remote operations on layouts and accounts
///
/// `token` is the bearer token of the current session; `None` sends the
/// request unauthenticated and lets the server decide.
#[async_trait]
pub trait LayoutGateway: Send + Sync {
    async fn load_layout(&self, id: &LayoutId, token: Option<&str>) -> Result<Layout, GatewayError>;

    /// Replace the stored object sequence with `objects`
    async fn save_layout(
        &self,
        id: &LayoutId,
        objects: &[ObjectDescriptor],
        token: Option<&str>,
    ) -> Result<(), GatewayError>;

    async fn create_layout(&self, layout: &NewLayout, token: Option<&str>) -> Result<LayoutId, GatewayError>;

    async fn list_layouts(&self, token: Option<&str>) -> Result<Vec<LayoutSummary>, GatewayError>;

    async fn delete_layout(&self, id: &LayoutId, token: Option<&str>) -> Result<(), GatewayError>;

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, GatewayError>;

    async fn register(&self, username: &str, email: &str, password: &str) -> Result<AuthResponse, GatewayError>;
}

/// Map a non-success HTTP status and its body to a gateway error
///
/// The server reports problems as `{"error": "..."}`; that text is kept so
/// it can be shown to the user.
pub fn error_for_status(status: u16, body: &str) -> GatewayError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .or_else(|| value.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_default();

    match status {
        401 | 403 => GatewayError::Unauthorized,
        404 => GatewayError::NotFound,
        400 | 409 | 422 => GatewayError::Validation(message),
        _ => GatewayError::Server { status, message },
    }
}

/// REST client for the layout service
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = error_for_status(status.as_u16(), &body);
        log::warn!("Request failed with {}: {}", status, err);
        Err(err)
    }
}

#[async_trait]
impl LayoutGateway for HttpGateway {
    async fn load_layout(&self, id: &LayoutId, token: Option<&str>) -> Result<Layout, GatewayError> {
        let path = format!("/layouts/{}", id);
        let response = self.send(self.request(Method::GET, &path, token)).await?;
        Ok(response.json().await?)
    }

    async fn save_layout(
        &self,
        id: &LayoutId,
        objects: &[ObjectDescriptor],
        token: Option<&str>,
    ) -> Result<(), GatewayError> {
        let path = format!("/layouts/{}", id);
        let request = self
            .request(Method::PUT, &path, token)
            .json(&SaveLayoutRequest { objects });
        self.send(request).await?;
        Ok(())
    }

    async fn create_layout(&self, layout: &NewLayout, token: Option<&str>) -> Result<LayoutId, GatewayError> {
        let request = self.request(Method::POST, "/layouts", token).json(layout);
        let response = self.send(request).await?;
        let created: CreatedLayout = response.json().await?;
        Ok(created.layout_id)
    }

    async fn list_layouts(&self, token: Option<&str>) -> Result<Vec<LayoutSummary>, GatewayError> {
        let response = self.send(self.request(Method::GET, "/layouts", token)).await?;
        Ok(response.json().await?)
    }

    async fn delete_layout(&self, id: &LayoutId, token: Option<&str>) -> Result<(), GatewayError> {
        let path = format!("/layouts/{}", id);
        self.send(self.request(Method::DELETE, &path, token)).await?;
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, GatewayError> {
        let request = self
            .request(Method::POST, "/users/login", None)
            .json(&serde_json::json!({ "email": email, "password": password }));
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> Result<AuthResponse, GatewayError> {
        let request = self.request(Method::POST, "/users/register", None).json(&serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        }));
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }
}
