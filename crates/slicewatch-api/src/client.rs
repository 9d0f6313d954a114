// Slice manager HTTP client
//
// Wraps `reqwest::Client` with base-path URL construction and uniform
// response decoding. Deliberately stateless: no retry, no caching, no
// backoff — failure policy lives in the synchronization layer.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{
    AddDeviceBody, AlertRecord, CreateAlertBody, CreateSliceBody, HealthStatus, SliceRecord,
};
use crate::transport::TransportConfig;

/// Remote errors arrive as `{"detail": "..."}` (or occasionally a bare
/// string) in the body of a non-2xx response.
#[derive(serde::Deserialize)]
struct ApiErrorBody {
    detail: Option<String>,
}

/// Raw HTTP client for the slice manager's REST API.
///
/// All endpoints are rooted at `{base}/api`. Methods return decoded
/// wire records; the caller never sees raw responses.
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GatewayClient {
    /// Create a new gateway client from a `TransportConfig`.
    ///
    /// `base_url` is the server root (e.g. `http://slicemgr:8000`);
    /// the `/api` prefix is applied per request.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a gateway client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Slices ───────────────────────────────────────────────────────

    /// `GET /api/slices` — the full slice collection.
    pub async fn list_slices(&self) -> Result<Vec<SliceRecord>, Error> {
        self.get(self.api_url(&["slices"])?).await
    }

    /// `GET /api/slices/{id}` — full detail for one slice.
    pub async fn get_slice(&self, slice_id: &str) -> Result<SliceRecord, Error> {
        self.get(self.api_url(&["slices", slice_id])?).await
    }

    /// `POST /api/slices` — provision a new slice.
    pub async fn create_slice(&self, body: &CreateSliceBody) -> Result<SliceRecord, Error> {
        self.post(self.api_url(&["slices"])?, body).await
    }

    /// `POST /api/slices/{id}/devices` — attach a device, returns the
    /// updated slice.
    pub async fn add_device(
        &self,
        slice_id: &str,
        body: &AddDeviceBody,
    ) -> Result<SliceRecord, Error> {
        self.post(self.api_url(&["slices", slice_id, "devices"])?, body)
            .await
    }

    // ── Alerts ───────────────────────────────────────────────────────

    /// `GET /api/slices/{id}/alerts` — alerts scoped to one slice.
    pub async fn list_slice_alerts(&self, slice_id: &str) -> Result<Vec<AlertRecord>, Error> {
        self.get(self.api_url(&["slices", slice_id, "alerts"])?)
            .await
    }

    /// `GET /api/alerts` — alerts across all slices.
    pub async fn list_alerts(&self) -> Result<Vec<AlertRecord>, Error> {
        self.get(self.api_url(&["alerts"])?).await
    }

    /// `POST /api/slices/{id}/alerts` — raise an alert against a slice.
    pub async fn create_alert(
        &self,
        slice_id: &str,
        body: &CreateAlertBody,
    ) -> Result<AlertRecord, Error> {
        self.post(self.api_url(&["slices", slice_id, "alerts"])?, body)
            .await
    }

    /// `POST /api/alerts/{id}/resolve` — mark an alert resolved.
    pub async fn resolve_alert(&self, alert_id: &str) -> Result<AlertRecord, Error> {
        self.post_empty(self.api_url(&["alerts", alert_id, "resolve"])?)
            .await
    }

    // ── Health ───────────────────────────────────────────────────────

    /// `GET /api/health` — liveness probe.
    pub async fn health(&self) -> Result<HealthStatus, Error> {
        self.get(self.api_url(&["health"])?).await
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build `{base}/api/{segments...}`, percent-escaping each segment.
    fn api_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|()| Error::InvalidUrl(format!("cannot-be-a-base URL: {}", self.base_url)))?;
            parts.pop_if_empty().push("api");
            for segment in segments {
                parts.push(segment);
            }
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        Self::decode(resp).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {url}");
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::decode(resp).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("POST {url}");
        let resp = self.http.post(url).send().await.map_err(Error::Transport)?;
        Self::decode(resp).await
    }

    /// Map the response status, then deserialize the body.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let url = resp.url().clone();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|e| e.detail)
                .unwrap_or_else(|| {
                    let preview: String = body.chars().take(200).collect();
                    format!("HTTP {status}: {preview}")
                });

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(Error::NotFound {
                    resource: format!("{} ({message})", url.path()),
                });
            }
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }
}
