// ── REST host client ──
//
// `RestHost` speaks the host's JSON object API:
//
//   GET  /api/v1/viewer/path                        → {"path": "..."}
//   GET  /api/v1/objects/children?path=..&names=..  → [ChildInfo]
//   POST /api/v1/objects/batch {"paths": [...]}     → {path: ObjectInfo}
//   GET  /api/v1/files/content?path=..              → raw text body
//
// Authentication is out of scope: the client assumes an already-authenticated
// host, or one fronted by a gateway that handles it.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::host::HostApi;
use crate::transport::TransportConfig;
use crate::types::{ChildInfo, ObjectInfo};

/// Client for the host's JSON REST surface.
#[derive(Debug, Clone)]
pub struct RestHost {
    http: reqwest::Client,
    base_url: Url,
}

/// Error body the host sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ViewerPath {
    path: String,
}

impl RestHost {
    /// Create a client with default transport settings.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::with_config(base_url, &TransportConfig::default())
    }

    /// Create a client with explicit transport settings.
    pub fn with_config(base_url: &str, config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
            base_url: Url::parse(base_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let response = self.http.get(url).send().await?;
        Self::decode(Self::check(response).await?).await
    }

    /// Map non-2xx responses to [`Error::Host`], using the error body's
    /// message when it decodes.
    async fn check(response: Response) -> Result<Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.message,
            Err(_) if body.is_empty() => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned(),
            Err(_) => body,
        };
        Err(Error::Host {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::deserialization(&e, &body))
    }
}

#[async_trait]
impl HostApi for RestHost {
    /// `GET /api/v1/viewer/path`, truncated to the server root.
    async fn resolve_server_root(&self) -> Result<String, Error> {
        let url = self.endpoint("api/v1/viewer/path")?;
        let viewer: ViewerPath = self.get_json(url).await?;
        Ok(root_of(&viewer.path).to_owned())
    }

    /// `GET /api/v1/objects/children?path=..&names=..`
    async fn list_children(
        &self,
        path: &str,
        include_property_names: bool,
    ) -> Result<Vec<ChildInfo>, Error> {
        let mut url = self.endpoint("api/v1/objects/children")?;
        url.query_pairs_mut()
            .append_pair("path", path)
            .append_pair("names", if include_property_names { "true" } else { "false" });
        self.get_json(url).await
    }

    /// `POST /api/v1/objects/batch` with the path list.
    async fn get_objects(&self, paths: &[String]) -> Result<HashMap<String, ObjectInfo>, Error> {
        let url = self.endpoint("api/v1/objects/batch")?;
        debug!("POST {url} ({} paths)", paths.len());
        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({ "paths": paths }))
            .send()
            .await?;
        Self::decode(Self::check(response).await?).await
    }

    /// `GET /api/v1/files/content?path=..`; the body is the file text.
    async fn read_file(&self, path: &str) -> Result<String, Error> {
        let mut url = self.endpoint("api/v1/files/content")?;
        url.query_pairs_mut().append_pair("path", path);
        debug!("GET {url}");
        let response = self.http.get(url).send().await?;
        Ok(Self::check(response).await?.text().await?)
    }
}

/// Truncate a viewer path to its server root: everything up to the first
/// separator after the leading one. `/Server 1/Folder/Page` → `/Server 1`.
fn root_of(path: &str) -> &str {
    match path.get(1..).and_then(|rest| rest.find('/')) {
        Some(i) => &path[..=i],
        None => path,
    }
}
