//! Live — implements `SwarmApi` with HTTP/1 over the Docker Unix socket.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{header, Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::UnixStream;
use tracing::debug;
use url::Url;

use super::api::{Filters, SwarmApi, API_VERSION};
use super::error::ApiError;

/// Docker API client bound to one Unix socket.
///
/// Opens a fresh connection per request; nothing is pooled or cached.
#[derive(Debug, Clone)]
pub struct UnixSocketClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl UnixSocketClient {
    pub fn new(socket_path: &str, timeout: Duration) -> Self {
        let clean_path = socket_path.trim_start_matches("unix://");
        Self {
            socket_path: PathBuf::from(clean_path),
            timeout,
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn get(&self, target: String) -> Result<Bytes, ApiError> {
        let stream = UnixStream::connect(&self.socket_path).await.map_err(|e| {
            ApiError::Transport(format!("connect {}: {}", self.socket_path.display(), e))
        })?;

        let (mut sender, conn) = hyper::client::conn::http1::handshake::<_, Empty<Bytes>>(
            TokioIo::new(stream),
        )
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!("Docker connection closed with error: {}", e);
            }
        });

        let request = Request::builder()
            .method(Method::GET)
            .uri(target.as_str())
            // HTTP/1.1 requires a Host header.
            .header(header::HOST, "localhost")
            .body(Empty::<Bytes>::new())
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        let response = sender
            .send_request(request)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .to_bytes();

        if status != StatusCode::OK {
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        Ok(body)
    }
}

/// Origin-form request target: `/<API_VERSION>/<path>[?filters=<json>]`.
pub fn request_target(path: &str, filters: Option<&Filters>) -> Result<String, ApiError> {
    let mut url = Url::parse(&format!(
        "http://localhost/{}/{}",
        API_VERSION,
        path.trim_start_matches('/')
    ))
    .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    if let Some(filters) = filters {
        let encoded = serde_json::to_string(filters)
            .map_err(|e| ApiError::InvalidRequest(format!("cannot marshal JSON: {}", e)))?;
        url.query_pairs_mut().append_pair("filters", &encoded);
    }

    Ok(url[url::Position::BeforePath..].to_string())
}

impl SwarmApi for UnixSocketClient {
    fn query<'a>(
        &'a self,
        path: &'a str,
        filters: Option<&'a Filters>,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes, ApiError>> + Send + 'a>> {
        Box::pin(async move {
            let target = request_target(path, filters)?;
            debug!("GET {} via {}", target, self.socket_path.display());

            match tokio::time::timeout(self.timeout, self.get(target)).await {
                Ok(result) => result,
                Err(_) => Err(ApiError::Transport(format!(
                    "request timed out after {:?}",
                    self.timeout
                ))),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::api::filters;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::UnixListener;
    use tokio::sync::oneshot;

    // ── Request target ──────────────────────────────────────────

    #[test]
    fn test_target_without_filters() {
        let target = request_target("services", None).unwrap();
        assert_eq!(target, "/v1.41/services");
    }

    #[test]
    fn test_target_with_filters_is_urlencoded_json() {
        let f = filters([("service", "abc"), ("desired-state", "running")]);
        let target = request_target("tasks", Some(&f)).unwrap();
        assert!(target.starts_with("/v1.41/tasks?filters="), "target: {}", target);

        let query = target.split_once('?').unwrap().1;
        let (name, value) = url::form_urlencoded::parse(query.as_bytes()).next().unwrap();
        assert_eq!(name, "filters");
        assert_eq!(value, r#"{"desired-state":["running"],"service":["abc"]}"#);
    }

    #[test]
    fn test_new_strips_unix_scheme() {
        let client = UnixSocketClient::new("unix:///var/run/docker.sock", Duration::from_secs(30));
        assert_eq!(client.socket_path(), Path::new("/var/run/docker.sock"));
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    // ── Socket round trips ──────────────────────────────────────

    /// Serve exactly one canned HTTP response on a fresh Unix socket and
    /// hand back the request head the client sent.
    async fn serve_once(
        dir: &tempfile::TempDir,
        status_line: &'static str,
        body: &'static str,
    ) -> (PathBuf, oneshot::Receiver<String>) {
        let path = dir.path().join("docker.sock");
        let listener = UnixListener::bind(&path).unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            let _ = tx.send(String::from_utf8_lossy(&head).into_owned());
        });

        (path, rx)
    }

    #[tokio::test]
    async fn test_query_returns_body_on_200() {
        let dir = tempfile::tempdir().unwrap();
        let (path, head) = serve_once(&dir, "200 OK", r#"[{"ID":"n1"}]"#).await;

        let client = UnixSocketClient::new(path.to_str().unwrap(), Duration::from_secs(5));
        let body = client.query("nodes", None).await.unwrap();
        assert_eq!(&body[..], br#"[{"ID":"n1"}]"#);

        let head = head.await.unwrap();
        assert!(head.starts_with("GET /v1.41/nodes HTTP/1.1"), "head: {}", head);
        assert!(head.to_ascii_lowercase().contains("host: localhost"));
    }

    #[tokio::test]
    async fn test_query_sends_filters_parameter() {
        let dir = tempfile::tempdir().unwrap();
        let (path, head) = serve_once(&dir, "200 OK", "[]").await;

        let client = UnixSocketClient::new(path.to_str().unwrap(), Duration::from_secs(5));
        let f = filters([("service", "svc1")]);
        client.query("tasks", Some(&f)).await.unwrap();

        let head = head.await.unwrap();
        assert!(head.starts_with("GET /v1.41/tasks?filters="), "head: {}", head);
    }

    #[tokio::test]
    async fn test_query_decodes_structured_error() {
        let dir = tempfile::tempdir().unwrap();
        let (path, _head) = serve_once(
            &dir,
            "503 Service Unavailable",
            r#"{"message":"This node is not a swarm manager."}"#,
        )
        .await;

        let client = UnixSocketClient::new(path.to_str().unwrap(), Duration::from_secs(5));
        let err = client.query("services", None).await.unwrap_err();
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "This node is not a swarm manager.");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_query_raw_body_when_error_is_not_json() {
        let dir = tempfile::tempdir().unwrap();
        let (path, _head) = serve_once(&dir, "500 Internal Server Error", "page not found").await;

        let client = UnixSocketClient::new(path.to_str().unwrap(), Duration::from_secs(5));
        let err = client.query("services", None).await.unwrap_err();
        assert_eq!(err.to_string(), "page not found");
    }

    #[tokio::test]
    async fn test_missing_socket_is_transport_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.sock");

        let client = UnixSocketClient::new(path.to_str().unwrap(), Duration::from_secs(5));
        let err = client.query("services", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_silent_daemon_times_out_as_transport_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docker.sock");
        let listener = UnixListener::bind(&path).unwrap();
        tokio::spawn(async move {
            // Accept and hold the connection without ever answering.
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let client = UnixSocketClient::new(path.to_str().unwrap(), Duration::from_millis(200));
        let err = client.query("services", None).await.unwrap_err();
        match err {
            ApiError::Transport(msg) => assert!(msg.contains("timed out"), "msg: {}", msg),
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }
}
