/// TMDB metadata lookup
///
/// Wraps the TMDB movie-details endpoint behind a trait seam so the
/// recommender can be exercised against a mock. Lookups carry a bounded
/// retry policy and an explicit cache keyed by movie id.
use crate::{
    cache::{Cache, CacheKey},
    cached,
    error::{AppError, AppResult},
    models::{MovieMetadata, TmdbMovieDetails},
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const METADATA_CACHE_TTL: u64 = 604800; // 1 week

const FETCH_ATTEMPTS: u32 = 3;
const FETCH_BACKOFF: Duration = Duration::from_millis(300);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch details for a movie by its external id
    ///
    /// Implementations retry transient failures up to their configured bound
    /// before surfacing an error; callers that only need a poster treat that
    /// error as "no metadata".
    async fn movie_details(&self, movie_id: u64) -> AppResult<MovieMetadata>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// TMDB API provider
#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
    attempts: u32,
    backoff: Duration,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            cache,
            attempts: FETCH_ATTEMPTS,
            backoff: FETCH_BACKOFF,
        })
    }

    /// Override the bounded retry policy
    pub fn with_retry(mut self, attempts: u32, backoff: Duration) -> Self {
        self.attempts = attempts.max(1);
        self.backoff = backoff;
        self
    }

    /// Single fetch of GET /movie/{id}
    async fn fetch_details(&self, movie_id: u64) -> AppResult<TmdbMovieDetails> {
        let url = format!("{}/movie/{}", self.api_url, movie_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", "en-US")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json::<TmdbMovieDetails>().await?)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn movie_details(&self, movie_id: u64) -> AppResult<MovieMetadata> {
        cached!(
            self.cache,
            CacheKey::Metadata(movie_id),
            METADATA_CACHE_TTL,
            async move {
                let mut last_error =
                    AppError::ExternalApi(format!("No fetch attempted for movie {}", movie_id));

                for attempt in 1..=self.attempts {
                    match self.fetch_details(movie_id).await {
                        Ok(details) => {
                            let metadata = MovieMetadata::from(details);
                            tracing::info!(
                                movie_id,
                                attempt,
                                provider = self.name(),
                                "Metadata fetched"
                            );
                            return Ok(metadata);
                        }
                        Err(e) => {
                            tracing::warn!(
                                movie_id,
                                attempt,
                                error = %e,
                                "Metadata fetch attempt failed"
                            );
                            last_error = e;
                            if attempt < self.attempts {
                                tokio::time::sleep(self.backoff).await;
                            }
                        }
                    }
                }

                Err(last_error)
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
