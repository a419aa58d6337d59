// Async HTTP client for the energy management REST backend.
//
// Thin verb layer over `reqwest::Client`: builds URLs relative to the
// configured base, decodes JSON bodies, and turns non-2xx responses into
// `Error::Api` carrying the backend's message when it sent one.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn into_message(self) -> Option<String> {
        let message = self.message.filter(|m| !m.trim().is_empty());
        message.or_else(|| match self.error {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the resource collections served by the backend
/// (`/usuarios`, `/dispositivos`).
///
/// Cheap to clone: `reqwest::Client` is reference-counted internally.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a base URL and transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base path ends with `/` so relative joins append
    /// instead of replacing the last segment.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a collection path (e.g. `"usuarios/3"`) onto the base URL.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// URL of one item in a collection. The id is pushed as a single
    /// percent-encoded segment, so `/`, `?` and `#` stay inside it.
    pub fn item_url(&self, collection: &str, id: &str) -> Result<Url, Error> {
        // `push` silently drops dot segments; refuse them instead.
        if matches!(id, "" | "." | "..") {
            return Err(Error::InvalidId(id.to_owned()));
        }
        let mut url = self.url(collection)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidId(id.to_owned()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.send_put(self.url(path)?, body).await
    }

    /// PUT to one item, addressed through [`Self::item_url`].
    pub async fn put_item<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        collection: &str,
        id: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.send_put(self.item_url(collection, id)?, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), Error> {
        self.send_delete(self.url(path)?).await
    }

    /// DELETE one item, addressed through [`Self::item_url`].
    pub async fn delete_item(&self, collection: &str, id: &str) -> Result<(), Error> {
        self.send_delete(self.item_url(collection, id)?).await
    }

    async fn send_put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("PUT {url}");
        let resp = self.http.put(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn send_delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");
        let resp = self.http.delete(url).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        trace!(len = body.len(), "response body received");

        // 201/204 with no body still has to decode (as `null`).
        let text = if body.trim().is_empty() {
            "null"
        } else {
            body.as_str()
        };

        serde_json::from_str(text).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(ErrorResponse::into_message);

        debug!(status = status.as_u16(), ?message, "backend rejected request");

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client =
            ApiClient::with_client("http://localhost:8080/api", reqwest::Client::new())
                .expect("valid url");
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/api/");
        assert_eq!(
            client.url("usuarios/3").expect("join").as_str(),
            "http://localhost:8080/api/usuarios/3"
        );
    }

    #[test]
    fn leading_slash_does_not_escape_base_path() {
        let client =
            ApiClient::with_client("http://localhost:8080/api/", reqwest::Client::new())
                .expect("valid url");
        assert_eq!(
            client.url("/dispositivos").expect("join").as_str(),
            "http://localhost:8080/api/dispositivos"
        );
    }

    #[test]
    fn item_url_keeps_the_id_in_one_segment() {
        let client =
            ApiClient::with_client("http://localhost:8080/api/", reqwest::Client::new())
                .expect("valid url");
        let url = |id| client.item_url("usuarios", id).expect("item url").to_string();

        assert_eq!(url("3"), "http://localhost:8080/api/usuarios/3");
        assert_eq!(url("a/b"), "http://localhost:8080/api/usuarios/a%2Fb");
        assert_eq!(
            url("../dispositivos/5"),
            "http://localhost:8080/api/usuarios/..%2Fdispositivos%2F5"
        );
        assert_eq!(url("a?b"), "http://localhost:8080/api/usuarios/a%3Fb");
        assert_eq!(url("x#y"), "http://localhost:8080/api/usuarios/x%23y");
    }

    #[test]
    fn dot_ids_are_refused() {
        let client = ApiClient::with_client("http://localhost:8080", reqwest::Client::new())
            .expect("valid url");
        for id in ["", ".", ".."] {
            assert!(matches!(client.item_url("usuarios", id), Err(Error::InvalidId(_))));
        }
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = ApiClient::with_client("not a url", reqwest::Client::new());
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn error_body_prefers_message_then_error() {
        let body: ErrorResponse =
            serde_json::from_str(r#"{"error":"Bad Request","message":"email is required"}"#)
                .expect("json");
        assert_eq!(body.into_message().as_deref(), Some("email is required"));

        let body: ErrorResponse =
            serde_json::from_str(r#"{"error":"Conflict","message":""}"#).expect("json");
        assert_eq!(body.into_message().as_deref(), Some("Conflict"));

        let body: ErrorResponse = serde_json::from_str(r#"{"status":500}"#).expect("json");
        assert_eq!(body.into_message(), None);
    }
}
