use std::future::Future;

use anyhow::Result;

use crate::config::FetcherConfig;
use crate::net::{HttpRequest, Response};

/// The network primitive the fetcher sits on top of.
///
/// A transport performs exactly one request and buffers the full response. It
/// must not interpret the status code; non-2xx replies are returned as `Ok`.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<Response>> + Send;
}

/// Transport backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }

    /// Wraps an already configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<Response> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let res = builder.send().await?;

        let final_url = res.url().clone();
        let status = res.status().as_u16();
        let status_text = res.status().canonical_reason().unwrap_or("Unknown").to_string();
        let headers = res.headers().clone();

        // Note: does not deal with streaming
        let body = res.bytes().await?.to_vec();

        Ok(Response {
            url: final_url,
            status,
            status_text,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::Method;
    use http::header::{HeaderValue, CONTENT_TYPE};
    use http::HeaderMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use url::Url;

    /// Serves a single canned HTTP/1.1 response and hands back the raw request text.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (Url, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];

            // Read headers, then as much body as content-length announces
            loop {
                let n = sock.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let l = l.to_ascii_lowercase();
                            let len = l.strip_prefix("content-length:")?.trim().parse::<usize>().ok();
                            len
                        })
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }

            let reply = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            sock.write_all(reply.as_bytes()).await.unwrap();
            sock.shutdown().await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&buf).to_string());
        });

        (Url::parse(&format!("http://{}/items", addr)).unwrap(), rx)
    }

    // Loopback only: skip any proxy configured in the environment
    fn transport() -> ReqwestTransport {
        let client = reqwest::Client::builder()
            .user_agent(crate::config::DEFAULT_USER_AGENT)
            .no_proxy()
            .build()
            .unwrap();
        ReqwestTransport::with_client(client)
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn builds_from_config() {
        let cfg = FetcherConfig {
            user_agent: "test-agent/0.1".into(),
            ..Default::default()
        };
        assert!(ReqwestTransport::new(&cfg).is_ok());
    }

    #[tokio::test]
    async fn sends_method_headers_and_body() {
        let (url, seen) = serve_once("201 Created", r#"{"id":1}"#).await;
        let transport = transport();

        let res = transport
            .send(HttpRequest {
                url,
                method: Method::Post,
                headers: json_headers(),
                body: Some(br#"{"name":"x"}"#.to_vec()),
            })
            .await
            .unwrap();

        assert_eq!(res.status, 201);
        assert_eq!(res.status_text, "Created");
        assert!(res.is_success());
        assert_eq!(res.body, br#"{"id":1}"#.to_vec());

        let raw = seen.await.unwrap();
        let lower = raw.to_ascii_lowercase();
        assert!(raw.starts_with("POST /items HTTP/1.1\r\n"));
        assert!(lower.contains("content-type: application/json"));
        assert!(lower.contains("user-agent: gosub/1.0"));
        assert!(raw.ends_with(r#"{"name":"x"}"#));
    }

    #[tokio::test]
    async fn error_status_is_not_an_error() {
        let (url, _seen) = serve_once("404 Not Found", r#"{"error":"not found"}"#).await;
        let transport = transport();

        let res = transport
            .send(HttpRequest {
                url,
                method: Method::Get,
                headers: json_headers(),
                body: None,
            })
            .await
            .unwrap();

        assert_eq!(res.status, 404);
        assert!(!res.is_success());
        assert_eq!(res.json().unwrap()["error"], "not found");
    }

    #[tokio::test]
    async fn connection_refused_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = transport();
        let res = transport
            .send(HttpRequest {
                url: Url::parse(&format!("http://{}/", addr)).unwrap(),
                method: Method::Get,
                headers: HeaderMap::new(),
                body: None,
            })
            .await;

        assert!(res.is_err());
    }
}
