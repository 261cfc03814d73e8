use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the title/id table artifact (JSON, row order)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path to the embedding matrix artifact (bincode, [N, D] f32)
    #[serde(default = "default_embeddings_path")]
    pub embeddings_path: String,

    /// Path to the prebuilt similarity index artifact (bincode)
    #[serde(default = "default_index_path")]
    pub index_path: String,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB poster image base URL (w500 rendition)
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Number of recommendations returned when the client does not ask for a count
    #[serde(default = "default_recommendation_count")]
    pub default_recommendation_count: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> String {
    "data/catalog.json".to_string()
}

fn default_embeddings_path() -> String {
    "data/embeddings.bin".to_string()
}

fn default_index_path() -> String {
    "data/index.bin".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_recommendation_count() -> usize {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
