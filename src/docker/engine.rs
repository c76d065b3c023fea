use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use hyper::body::Bytes;
use hyper::{header, Body, Method, Request, Response};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, instrument};
use url::Url;

use super::{ImageInventory, InventoryError};
use crate::config::settings::DockerSettings;
use crate::models::image::{EngineImage, ImageSummary};

/// Socket used when neither the settings nor `DOCKER_HOST` name one.
pub const DEFAULT_SOCKET: &str = "/var/run/docker.sock";

/// Port assumed for `tcp://` hosts given without one.
const DEFAULT_TCP_PORT: u16 = 2375;

/// Where the container engine listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEndpoint {
    Unix(PathBuf),
    Tcp(String),
}

impl EngineEndpoint {
    /// Parse a docker host: a bare socket path, `unix:///path`,
    /// `tcp://host:port` or `http://host:port`.
    pub fn parse(host: &str) -> Result<Self, InventoryError> {
        let host = host.trim();
        let invalid = |reason: &str| InventoryError::InvalidHost {
            host: host.to_string(),
            reason: reason.to_string(),
        };

        if host.is_empty() {
            return Err(invalid("empty host"));
        }
        if !host.contains("://") {
            return Ok(Self::Unix(PathBuf::from(host)));
        }

        let url = Url::parse(host).map_err(|e| invalid(&e.to_string()))?;
        match url.scheme() {
            "unix" => {
                let path = url.path();
                if path.is_empty() || path == "/" {
                    return Err(invalid("missing socket path"));
                }
                Ok(Self::Unix(PathBuf::from(path)))
            }
            "tcp" | "http" => {
                let name = url.host_str().ok_or_else(|| invalid("missing host name"))?;
                let port = url.port_or_known_default().unwrap_or(DEFAULT_TCP_PORT);
                Ok(Self::Tcp(format!("{}:{}", name, port)))
            }
            other => Err(invalid(&format!("unsupported scheme {:?}", other))),
        }
    }

    /// Pick the endpoint from the configured host, then `DOCKER_HOST`, then
    /// the default socket.
    pub fn resolve(configured: Option<&str>) -> Result<Self, InventoryError> {
        if let Some(host) = configured.filter(|h| !h.trim().is_empty()) {
            return Self::parse(host);
        }
        match std::env::var("DOCKER_HOST") {
            Ok(host) if !host.trim().is_empty() => Self::parse(&host),
            _ => Ok(Self::Unix(PathBuf::from(DEFAULT_SOCKET))),
        }
    }
}

impl fmt::Display for EngineEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix(path) => write!(f, "unix://{}", path.display()),
            Self::Tcp(addr) => write!(f, "tcp://{}", addr),
        }
    }
}

/// Docker Engine API client, one HTTP/1 connection per call
#[derive(Debug, Clone)]
pub struct DockerEngine {
    endpoint: EngineEndpoint,
    api_version: Option<String>,
    timeout: Duration,
}

impl DockerEngine {
    pub fn new(endpoint: EngineEndpoint, api_version: Option<String>, timeout: Duration) -> Self {
        Self {
            endpoint,
            api_version: api_version.filter(|v| !v.trim().is_empty()),
            timeout,
        }
    }

    pub fn from_settings(settings: &DockerSettings) -> Result<Self, InventoryError> {
        let endpoint = EngineEndpoint::resolve(settings.host.as_deref())?;
        Ok(Self::new(
            endpoint,
            settings.api_version.clone(),
            Duration::from_secs(settings.timeout_seconds),
        ))
    }

    pub fn endpoint(&self) -> &EngineEndpoint {
        &self.endpoint
    }

    fn request_path(&self, resource: &str) -> String {
        match &self.api_version {
            Some(version) => format!("/v{}{}", version.trim().trim_start_matches('v'), resource),
            None => resource.to_string(),
        }
    }

    async fn get(&self, resource: &str) -> Result<Bytes, InventoryError> {
        tokio::time::timeout(self.timeout, self.send_get(resource))
            .await
            .map_err(|_| InventoryError::Timeout(self.timeout.as_secs()))?
    }

    async fn send_get(&self, resource: &str) -> Result<Bytes, InventoryError> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(self.request_path(resource))
            .header(header::HOST, "docker")
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .map_err(|e| InventoryError::InvalidHost {
                host: self.endpoint.to_string(),
                reason: e.to_string(),
            })?;

        debug!("GET {}{}", self.endpoint, request.uri());

        let response = match &self.endpoint {
            #[cfg(unix)]
            EngineEndpoint::Unix(path) => {
                let stream = tokio::net::UnixStream::connect(path)
                    .await
                    .map_err(|e| self.connect_error(e))?;
                send_request(stream, request).await?
            }
            #[cfg(not(unix))]
            EngineEndpoint::Unix(_) => {
                return Err(InventoryError::InvalidHost {
                    host: self.endpoint.to_string(),
                    reason: "unix sockets are not supported on this platform".to_string(),
                })
            }
            EngineEndpoint::Tcp(addr) => {
                let stream = TcpStream::connect(addr.as_str())
                    .await
                    .map_err(|e| self.connect_error(e))?;
                send_request(stream, request).await?
            }
        };

        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body()).await?;

        if !status.is_success() {
            return Err(InventoryError::Engine {
                status: status.as_u16(),
                message: engine_message(&body, status.canonical_reason()),
            });
        }

        Ok(body)
    }

    fn connect_error(&self, err: std::io::Error) -> InventoryError {
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            InventoryError::PermissionDenied {
                endpoint: self.endpoint.to_string(),
            }
        } else {
            InventoryError::Unreachable {
                endpoint: self.endpoint.to_string(),
                source: err,
            }
        }
    }
}

#[async_trait]
impl ImageInventory for DockerEngine {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn list_images(&self) -> Result<Vec<ImageSummary>, InventoryError> {
        let body = self.get("/images/json").await?;
        let images: Vec<EngineImage> = serde_json::from_slice(&body)?;

        debug!("engine returned {} images", images.len());
        Ok(images.into_iter().map(ImageSummary::from).collect())
    }

    async fn ping(&self) -> Result<(), InventoryError> {
        self.get("/_ping").await.map(|_| ())
    }
}

async fn send_request<T>(io: T, request: Request<Body>) -> Result<Response<Body>, hyper::Error>
where
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut sender, connection) = hyper::client::conn::handshake(io).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            debug!("engine connection closed with error: {}", e);
        }
    });
    sender.send_request(request).await
}

/// Error text from an engine error body, `{"message": "..."}` when possible
fn engine_message(body: &[u8], reason: Option<&str>) -> String {
    #[derive(serde::Deserialize)]
    struct EngineError {
        message: String,
    }

    if let Ok(err) = serde_json::from_slice::<EngineError>(body) {
        return err.message;
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        reason.unwrap_or("unknown error").to_string()
    } else {
        text
    }
}
