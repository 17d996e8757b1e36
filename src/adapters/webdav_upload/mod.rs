//! Direct WebDAV uploads over HTTP

use std::path::Path;

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client, Method, StatusCode};
use tracing::{debug, info};

use crate::error::{QuadError, QuadResult};
use crate::ports::{UploadPort, WebDavRemote};

/// Uploads files with MKCOL/PUT and basic auth
pub struct WebDavUploadAdapter {
    client: Client,
    remote: WebDavRemote,
}

impl WebDavUploadAdapter {
    pub fn new(remote: WebDavRemote) -> QuadResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("quadcut/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, remote })
    }

    fn url_for(&self, path: &str) -> String {
        join_url(&self.remote.url, path)
    }
}

/// Join a base URL and a remote path with exactly one slash between them
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_matches('/');
    if path.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}", base, path)
    }
}

/// MKCOL answers 201 for a new folder and 405 when it already exists
pub fn folder_status_ok(status: StatusCode) -> bool {
    status == StatusCode::CREATED || status == StatusCode::METHOD_NOT_ALLOWED
}

/// PUT answers 201 for new files and 200/204 for replaced ones
pub fn put_status_ok(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT
    )
}

#[async_trait]
impl UploadPort for WebDavUploadAdapter {
    async fn ensure_folder(&self, remote_dir: &str) -> QuadResult<()> {
        let url = self.url_for(remote_dir);
        let method = Method::from_bytes(b"MKCOL").map_err(|e| QuadError::Transfer {
            message: e.to_string(),
        })?;

        let response = self
            .client
            .request(method, &url)
            .basic_auth(&self.remote.user, Some(&self.remote.password))
            .send()
            .await?;

        let status = response.status();
        debug!("MKCOL {} -> {}", url, status);
        if folder_status_ok(status) {
            Ok(())
        } else {
            Err(QuadError::Transfer {
                message: format!("could not create folder {}: {}", remote_dir, status),
            })
        }
    }

    async fn put_file(&self, local: &Path, remote_path: &str) -> QuadResult<u64> {
        // Recordings run to several GB; stream the body from disk
        let file = tokio::fs::File::open(local).await?;
        let size = file.metadata().await?.len();
        let url = self.url_for(remote_path);

        info!("Uploading {} to {}", local.display(), url);
        let response = self
            .client
            .put(&url)
            .basic_auth(&self.remote.user, Some(&self.remote.password))
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_LENGTH, size)
            .body(Body::from(file))
            .send()
            .await?;

        let status = response.status();
        if put_status_ok(status) {
            Ok(size)
        } else {
            Err(QuadError::Transfer {
                message: format!("upload of {} failed: {}", local.display(), status),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://dav.example.com/remote.php/webdav/", "/processed/a.mp4"),
            "https://dav.example.com/remote.php/webdav/processed/a.mp4"
        );
        assert_eq!(join_url("https://dav.example.com", "processed"), "https://dav.example.com/processed");
        assert_eq!(join_url("https://dav.example.com/", "/"), "https://dav.example.com/");
    }

    #[test]
    fn test_status_rules() {
        assert!(folder_status_ok(StatusCode::CREATED));
        assert!(folder_status_ok(StatusCode::METHOD_NOT_ALLOWED));
        assert!(!folder_status_ok(StatusCode::UNAUTHORIZED));

        assert!(put_status_ok(StatusCode::NO_CONTENT));
        assert!(!put_status_ok(StatusCode::INSUFFICIENT_STORAGE));
    }

    #[tokio::test]
    async fn test_put_missing_file_fails_before_request() {
        // Nothing listens on the discard port; a request would fail with an HTTP error
        let adapter = WebDavUploadAdapter::new(WebDavRemote {
            url: "http://127.0.0.1:9".to_string(),
            user: "editor".to_string(),
            password: "secret".to_string(),
            vendor: "other".to_string(),
        })
        .unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let result = adapter.put_file(&dir.path().join("absent.mp4"), "talks/absent.mp4").await;
        assert!(matches!(result, Err(QuadError::IoError(_))));
    }
}
