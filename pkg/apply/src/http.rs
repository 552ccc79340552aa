use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tracing::debug;

use crate::client::RbacClient;
use crate::object::RbacObject;

/// Creates objects by POSTing them to a Kubernetes-compatible API server.
pub struct HttpRbacClient {
    server: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpRbacClient {
    pub fn new(server: &str, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            server: server.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    pub fn url_for(&self, object: &RbacObject<'_>) -> String {
        format!("{}{}", self.server, object.collection_path())
    }
}

#[async_trait]
impl RbacClient for HttpRbacClient {
    async fn create(&self, object: RbacObject<'_>) -> Result<()> {
        let url = self.url_for(&object);
        let body = object.to_json()?;
        debug!("POST {}", url);

        let mut req = self.client.post(&url).json(&body);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.with_context(|| format!("POST {} failed", url))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("server returned {}: {}", status, text.trim());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkg_types::meta::ObjectMeta;
    use pkg_types::rbac::Role;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accept one connection, capture the request, and answer with `status`.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + content_length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });
        (format!("http://{}", addr), handle)
    }

    #[tokio::test]
    async fn create_posts_record_with_bearer_token() {
        let (server, handle) = serve_once("201 Created", "{}").await;
        let client = HttpRbacClient::new(&server, Some("t0ken".to_string())).unwrap();
        let role = Role::new(ObjectMeta::named("r1", "ns1"), vec![]);

        client.create(RbacObject::Role(&role)).await.unwrap();

        let request = handle.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /apis/rbac.authorization.k8s.io/v1/namespaces/ns1/roles "));
        assert!(lower.contains("authorization: bearer t0ken"));
        assert!(request.contains("\"name\":\"r1\""));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (server, handle) = serve_once("409 Conflict", "roles \"r1\" already exists").await;
        let client = HttpRbacClient::new(&server, None).unwrap();
        let role = Role::new(ObjectMeta::named("r1", "ns1"), vec![]);

        let err = client.create(RbacObject::Role(&role)).await.unwrap_err();
        let request = handle.await.unwrap();

        assert!(err.to_string().contains("409"), "{}", err);
        assert!(err.to_string().contains("already exists"), "{}", err);
        assert!(!request.to_ascii_lowercase().contains("authorization:"));
    }

    #[test]
    fn url_joins_server_and_collection() {
        let client = HttpRbacClient::new("https://10.0.0.1:6443/", None).unwrap();
        let role = Role::new(ObjectMeta::named("r1", "ns1"), vec![]);
        assert_eq!(
            client.url_for(&RbacObject::Role(&role)),
            "https://10.0.0.1:6443/apis/rbac.authorization.k8s.io/v1/namespaces/ns1/roles"
        );
    }
}
