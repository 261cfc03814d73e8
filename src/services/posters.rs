/// Poster image resolution
///
/// Turns a TMDB poster path into a displayable `data:` URI. Every failure
/// path (missing path, network error, non-success status) falls back to the
/// embedded placeholder, so resolution never surfaces an error to callers.
use crate::{
    cache::{Cache, CacheKey},
    error::{AppError, AppResult},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use reqwest::Client as HttpClient;
use std::time::Duration;

const POSTER_CACHE_TTL: u64 = 604800; // 1 week

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fallback art compiled into the binary, so the degraded path has no
/// network dependency of its own
static PLACEHOLDER_PNG: &[u8] = include_bytes!("../../assets/poster-placeholder.png");

#[derive(Clone)]
pub struct PosterResolver {
    http_client: HttpClient,
    image_base_url: String,
    cache: Cache,
    placeholder: String,
}

impl PosterResolver {
    pub fn new(cache: Cache, image_base_url: String) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(FETCH_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            image_base_url,
            cache,
            placeholder: encode_data_uri("image/png", PLACEHOLDER_PNG),
        })
    }

    /// The data URI failed lookups resolve to
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Resolve a poster path to a `data:` URI
    ///
    /// Fetched posters are cached by path; a missing path or a failed fetch
    /// yields the placeholder.
    pub async fn data_uri(&self, poster_path: Option<&str>) -> String {
        let Some(path) = poster_path else {
            return self.placeholder.clone();
        };

        let key = CacheKey::Poster(path.to_string());
        if let Some(cached) = self.cache.get_from_cache::<String>(&key).await {
            return cached;
        }

        match self.fetch_poster(path).await {
            Ok(bytes) => {
                let uri = encode_data_uri("image/jpeg", &bytes);
                self.cache.set_in_background(&key, &uri, POSTER_CACHE_TTL);
                uri
            }
            Err(e) => {
                tracing::warn!(
                    path = %path,
                    error = %e,
                    "Poster fetch failed, serving placeholder"
                );
                self.placeholder.clone()
            }
        }
    }

    async fn fetch_poster(&self, path: &str) -> AppResult<Bytes> {
        let url = format!("{}{}", self.image_base_url, path);
        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Poster fetch returned status {}",
                response.status()
            )));
        }

        Ok(response.bytes().await?)
    }
}

/// Build a `data:` URI from raw image bytes
fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_redis_client;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    const JPEG_STUB_BODY: &[u8] = b"jpegbytes";

    /// Minimal HTTP stub answering every connection with 200 and a fixed
    /// byte body.
    async fn spawn_image_stub() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };

                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            request.extend_from_slice(&buf[..n]);
                            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }

                let head = format!(
                    "HTTP/1.1 200 OK\r\nconnection: close\r\ncontent-type: image/jpeg\r\ncontent-length: {}\r\n\r\n",
                    JPEG_STUB_BODY.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(JPEG_STUB_BODY).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    async fn create_test_resolver(image_base_url: String) -> PosterResolver {
        // Nothing listens on this Redis port, so every lookup is a cache miss.
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, _handle) = Cache::new(client).await;
        PosterResolver::new(cache, image_base_url).unwrap()
    }

    #[test]
    fn test_encode_data_uri() {
        assert_eq!(
            encode_data_uri("image/png", b"hello"),
            "data:image/png;base64,aGVsbG8="
        );
    }

    #[tokio::test]
    async fn test_missing_path_resolves_to_placeholder() {
        let resolver = create_test_resolver("http://127.0.0.1:1".to_string()).await;
        let uri = resolver.data_uri(None).await;

        assert_eq!(uri, resolver.placeholder());
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_fetch_failure_resolves_to_placeholder() {
        let resolver = create_test_resolver("http://127.0.0.1:1".to_string()).await;
        let uri = resolver.data_uri(Some("/inception.jpg")).await;

        assert_eq!(uri, resolver.placeholder());
    }

    #[tokio::test]
    async fn test_fetched_poster_encodes_bytes() {
        let base_url = spawn_image_stub().await;
        let resolver = create_test_resolver(base_url).await;

        let uri = resolver.data_uri(Some("/inception.jpg")).await;
        assert_eq!(
            uri,
            format!("data:image/jpeg;base64,{}", STANDARD.encode(JPEG_STUB_BODY))
        );
        assert_ne!(uri, resolver.placeholder());
    }

    #[tokio::test]
    async fn test_placeholder_is_valid_png_data_uri() {
        let resolver = create_test_resolver("http://127.0.0.1:1".to_string()).await;
        let encoded = resolver
            .placeholder()
            .strip_prefix("data:image/png;base64,")
            .unwrap();

        let bytes = STANDARD.decode(encoded).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
