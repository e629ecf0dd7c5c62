// Controller HTTP client
//
// Wraps `reqwest::Client` with controller-specific URL construction,
// bearer-token auth, and error-body parsing. Endpoint modules (nodes,
// hosts, clients, dns, acls) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ErrorBody;

/// Raw HTTP client for the overlay controller's REST API.
///
/// Every request carries `Authorization: Bearer <token>`. Responses are
/// plain JSON (no envelope); non-2xx statuses are mapped onto
/// [`Error::Controller`] with the message from the controller's error body
/// when one is present.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: SecretString,
}

impl ApiClient {
    /// Create a new client for the controller at `base_url`.
    ///
    /// `base_url` should be the controller root (e.g.
    /// `https://api.mesh.example.com`).
    pub fn new(base_url: Url, token: SecretString) -> Result<Self, Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, token: SecretString) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.bearer_auth(self.token.expose_secret())
    }

    /// Send a GET request and deserialize the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.authorize(self.http.get(url)).send().await?;
        Self::parse_response(resp).await
    }

    /// Send a POST request with a JSON body and deserialize the response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self.authorize(self.http.post(url).json(body)).send().await?;
        Self::parse_response(resp).await
    }

    /// Send a PUT request with a JSON body and deserialize the response.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("PUT {}", url);
        let resp = self.authorize(self.http.put(url).json(body)).send().await?;
        Self::parse_response(resp).await
    }

    /// Send a DELETE request, discarding any response body.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);
        let resp = self.authorize(self.http.delete(url)).send().await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    /// Map a non-2xx response to an [`Error`], passing 2xx through.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "bearer token rejected or expired".into(),
            });
        }

        // The controller attaches `{"Code": N, "Message": "..."}` to most
        // error responses; fall back to the raw body when it doesn't.
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or(body);
        Err(Error::Controller {
            message,
            status: status.as_u16(),
        })
    }

    async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
