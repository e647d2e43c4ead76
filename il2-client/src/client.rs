// IL2 REST client
//
// One pooled reqwest client per IL2Client, authenticated with the PKCS#12
// client certificate (mutual TLS). Clones share the pool.

use il2_common::logging::{Component, Logger};
use il2_common::{log_debug, log_info, log_warn};
use il2_keys::{CertificateIdentity, Pkcs12Certificate};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::api::{ChainApi, JsonApi, NodeApi, OpaqueApi, RecordApi};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::models::ErrorDetails;

const ACCEPT_JSON: &str = "application/json";
pub(crate) const OCTET_STREAM: &str = "application/octet-stream";

/// Client for the REST API of an InterlockLedger node
#[derive(Clone)]
pub struct IL2Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base_url: Url,
    http: reqwest::Client,
    certificate: Pkcs12Certificate,
    config: ClientConfig,
    logger: Logger,
}

impl IL2Client {
    /// Load the certificate from `config.cert_path` and build the client
    pub fn new(config: ClientConfig) -> Result<Self> {
        let certificate = Pkcs12Certificate::from_file(&config.cert_path, &config.cert_password)?;
        Self::with_certificate(config, certificate)
    }

    /// Build the client around an already loaded certificate
    pub fn with_certificate(config: ClientConfig, certificate: Pkcs12Certificate) -> Result<Self> {
        if let Some(logging_config) = &config.logging_config {
            logging_config.apply();
        }

        let base_url = Url::parse(&config.normalized_host())?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::Configuration(format!(
                "unsupported scheme {:?} in host {}",
                base_url.scheme(),
                config.host
            )));
        }

        // reqwest wants key and certificate chain in a single PEM bundle
        let mut identity_pem = certificate.private_key_pem()?;
        identity_pem.extend_from_slice(&certificate.public_certificate_pem()?);
        let identity = reqwest::Identity::from_pem(&identity_pem)?;

        let http = reqwest::Client::builder()
            .identity(identity)
            .danger_accept_invalid_certs(!config.verify_ca)
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()?;

        let logger = Logger::new_root(Component::Client, &certificate.common_name());
        log_info!(
            logger,
            "IL2 client for {} using certificate {}",
            base_url,
            certificate.key_id()
        );
        if !config.verify_ca {
            log_warn!(logger, "TLS certificate verification of the node is disabled");
        }

        Ok(Self {
            inner: Arc::new(ClientInner {
                base_url,
                http,
                certificate,
                config,
                logger,
            }),
        })
    }

    /// Node base URL, always ending in `/`
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Certificate used to authenticate, and to decode documents addressed to it
    pub fn certificate(&self) -> &Pkcs12Certificate {
        &self.inner.certificate
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn logger(&self) -> &Logger {
        &self.inner.logger
    }

    pub fn node(&self) -> NodeApi<'_> {
        NodeApi::new(self)
    }

    pub fn chain(&self) -> ChainApi<'_> {
        ChainApi::new(self)
    }

    pub fn records(&self) -> RecordApi<'_> {
        RecordApi::new(self)
    }

    pub fn json_documents(&self) -> JsonApi<'_> {
        JsonApi::new(self)
    }

    pub fn opaque(&self) -> OpaqueApi<'_> {
        OpaqueApi::new(self)
    }

    /* ---------------------------------------------------------------------
     * Request plumbing shared by the APIs
     * ------------------------------------------------------------------ */

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        logger: &Logger,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = self.request(Method::GET, path, ACCEPT_JSON)?.query(query);
        let response = self.execute(logger, Method::GET, path, request).await?;
        read_json(response).await
    }

    pub(crate) async fn post<B, T>(
        &self,
        logger: &Logger,
        path: &str,
        body: &B,
        headers: &[(&'static str, String)],
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send_post(logger, path, body, headers).await?;
        read_json(response).await
    }

    /// POST whose response body is not needed
    pub(crate) async fn post_no_content<B>(&self, logger: &Logger, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send_post(logger, path, body, &[]).await?;
        Ok(())
    }

    async fn send_post<B>(
        &self,
        logger: &Logger,
        path: &str,
        body: &B,
        headers: &[(&'static str, String)],
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.request(Method::POST, path, ACCEPT_JSON)?.json(body);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }
        self.execute(logger, Method::POST, path, request).await
    }

    /// GET whose body is not JSON; the caller reads headers and bytes
    pub(crate) async fn get_raw(&self, logger: &Logger, path: &str, accept: &str) -> Result<Response> {
        let request = self.request(Method::GET, path, accept)?;
        self.execute(logger, Method::GET, path, request).await
    }

    /// POST of raw bytes with query parameters and a JSON response
    pub(crate) async fn post_bytes<T: DeserializeOwned>(
        &self,
        logger: &Logger,
        path: &str,
        query: &[(&str, String)],
        body: Vec<u8>,
    ) -> Result<T> {
        let request = self
            .request(Method::POST, path, ACCEPT_JSON)?
            .query(query)
            .header(reqwest::header::CONTENT_TYPE, OCTET_STREAM)
            .body(body);
        let response = self.execute(logger, Method::POST, path, request).await?;
        read_json(response).await
    }

    fn request(&self, method: Method, path: &str, accept: &str) -> Result<RequestBuilder> {
        let url = self.inner.base_url.join(path)?;
        Ok(self
            .inner
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, accept))
    }

    async fn execute(
        &self,
        logger: &Logger,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<Response> {
        let logger = logger.with_request_path(path);
        log_debug!(logger, "{} request", method);

        let response = request.send().await.map_err(|e| {
            log_warn!(logger, "{} failed: {}", method, e);
            ClientError::Transport(e)
        })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            let details = ErrorDetails::from_response(status.as_u16(), &body);
            log_warn!(logger, "{} returned {}", method, details);
            return Err(ClientError::Remote(details));
        }

        log_debug!(logger, "{} returned {}", method, status.as_u16());
        Ok(response)
    }
}

impl std::fmt::Debug for IL2Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IL2Client")
            .field("base_url", &self.inner.base_url.as_str())
            .field("certificate", &self.inner.certificate)
            .finish()
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
