//! Byte sources: an HTTP asset or a file on disk.
//!
//! Only plain `http://` is fetched; there is no TLS stack, so an `https://`
//! location is rejected up front with [`FetchError::Unsupported`].

use std::path::{Path, PathBuf};

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{header, Request, Uri};
use hyper_util::{client::legacy::Client, rt::TokioExecutor};
use stockbin_core::FetchError;

/// Where workbook bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Http(Uri),
    File(PathBuf),
}

impl Source {
    /// Interpret a location string: `http://…` is fetched, anything else is a
    /// filesystem path.
    pub fn parse(location: &str) -> Result<Self, FetchError> {
        let location = location.trim();
        let lower = location.to_ascii_lowercase();

        if lower.starts_with("https://") {
            return Err(FetchError::Unsupported {
                location: location.to_string(),
                reason: "https is not supported; use http:// or a local path".to_string(),
            });
        }
        if lower.starts_with("http://") {
            let uri = location.parse::<Uri>().map_err(|e| FetchError::Unsupported {
                location: location.to_string(),
                reason: e.to_string(),
            })?;
            return Ok(Source::Http(uri));
        }
        Ok(Source::File(PathBuf::from(location)))
    }

    /// Human-readable location, used in status messages.
    pub fn location(&self) -> String {
        match self {
            Source::Http(uri) => uri.to_string(),
            Source::File(path) => path.display().to_string(),
        }
    }

    /// Fetch the bytes.
    pub async fn read(&self) -> Result<Bytes, FetchError> {
        match self {
            Source::Http(uri) => fetch_http(uri).await,
            Source::File(path) => read_file(path).await,
        }
    }
}

async fn fetch_http(uri: &Uri) -> Result<Bytes, FetchError> {
    let location = uri.to_string();
    let network = |reason: String| FetchError::Network { location: location.clone(), reason };

    let client: Client<_, Empty<Bytes>> = Client::builder(TokioExecutor::new()).build_http();
    let request = Request::get(uri.clone())
        .header(header::CACHE_CONTROL, "no-store")
        .body(Empty::new())
        .map_err(|e| network(e.to_string()))?;

    tracing::debug!(%location, "fetching workbook");
    let response = client.request(request).await.map_err(|e| network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status { location: location.clone(), status: status.as_u16() });
    }

    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| network(e.to_string()))?
        .to_bytes();
    tracing::debug!(%location, bytes = body.len(), "workbook fetched");
    Ok(body)
}

async fn read_file(path: &Path) -> Result<Bytes, FetchError> {
    let data = tokio::fs::read(path).await.map_err(|source| FetchError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "workbook read");
    Ok(Bytes::from(data))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_http() {
        let src = Source::parse("http://127.0.0.1:3000/data.xlsx").unwrap();
        assert!(matches!(src, Source::Http(_)));
        assert_eq!(src.location(), "http://127.0.0.1:3000/data.xlsx");
    }

    #[test]
    fn parse_path() {
        let src = Source::parse("public/data.xlsx").unwrap();
        assert_eq!(src, Source::File(PathBuf::from("public/data.xlsx")));
    }

    #[test]
    fn https_is_unsupported() {
        let err = Source::parse("https://example.com/data.xlsx").unwrap_err();
        assert!(matches!(err, FetchError::Unsupported { .. }));
    }

    #[tokio::test]
    async fn reads_file_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        std::fs::write(&path, b"PK\x03\x04").unwrap();

        let bytes = Source::File(path).read().await.unwrap();
        assert_eq!(&bytes[..], b"PK\x03\x04");
    }

    #[tokio::test]
    async fn missing_file_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Source::File(dir.path().join("nope.xlsx")).read().await.unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }), "got {err:?}");
    }
}
