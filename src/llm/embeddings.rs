use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::config::BairroConfig;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty text")]
    EmptyText,

    #[error("Provider not implemented: {0}")]
    NotImplemented(String),

    #[error("Both primary and fallback failed: primary={0}, fallback={1}")]
    BothFailed(String, String),
}

/// Text-to-vector seam consumed by the reasoning pipeline. Production
/// uses [`EmbeddingGenerator`]; tests inject a deterministic stub.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed several texts; independent requests, so they run concurrently.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        futures::future::try_join_all(texts.iter().map(|t| self.embed(t))).await
    }
}

#[derive(Serialize)]
struct OllamaEmbeddingRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct OpenAiEmbeddingRequest {
    model: String,
    input: String,
}

#[derive(Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Deserialize)]
struct OpenAiEmbeddingData {
    embedding: Vec<f32>,
}

struct CacheEntry {
    embedding: Vec<f32>,
    created_at: Instant,
}

/// Question embedding client: Ollama or an OpenAI-compatible endpoint,
/// with an LRU+TTL cache and an optional fallback to local Ollama when
/// the primary is unreachable.
pub struct EmbeddingGenerator {
    provider: String,
    model: String,
    url: String,
    api_key: Option<String>,
    client: Client,
    cache: Mutex<LruCache<String, CacheEntry>>,
    cache_ttl: Duration,

    fallback_enabled: bool,
    fallback_url: String,
    fallback_model: String,
    fallback_count: AtomicUsize,
}

impl EmbeddingGenerator {
    pub fn from_config(config: &BairroConfig) -> Self {
        info!(
            "EmbeddingGenerator initialized: provider={}, model={}, cache={}",
            config.embedding_provider, config.embedding_model, config.cache_size
        );
        Self {
            provider: config.embedding_provider.to_lowercase(),
            model: config.embedding_model.clone(),
            url: config.embedding_url.clone(),
            api_key: config.embedding_api_key.clone(),
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(config.cache_size.max(1)).expect("cache size is nonzero"),
            )),
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
            fallback_enabled: config.embedding_fallback_enabled,
            fallback_url: config.embedding_fallback_url.clone(),
            fallback_model: config.embedding_fallback_model.clone(),
            fallback_count: AtomicUsize::new(0),
        }
    }

    fn cache_key(&self, text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.model.as_bytes());
        hasher.update(b"\0");
        hasher.update(text.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn cache_get(&self, key: &str) -> Option<Vec<f32>> {
        let mut cache = self.cache.lock();
        match cache.get(key) {
            Some(entry) if entry.created_at.elapsed() < self.cache_ttl => {
                Some(entry.embedding.clone())
            }
            Some(_) => {
                cache.pop(key);
                None
            }
            None => None,
        }
    }

    fn cache_put(&self, key: String, embedding: Vec<f32>) {
        self.cache.lock().put(
            key,
            CacheEntry {
                embedding,
                created_at: Instant::now(),
            },
        );
    }

    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn fallback_count(&self) -> usize {
        self.fallback_count.load(Ordering::SeqCst)
    }

    async fn embed_ollama(&self, url: &str, model: &str, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let request = OllamaEmbeddingRequest {
            model: model.to_string(),
            prompt: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/api/embeddings", url))
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .map_err(EmbeddingError::Http)?
            .json::<OllamaEmbeddingResponse>()
            .await?;

        Ok(response.embedding)
    }

    async fn embed_openai(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| EmbeddingError::InvalidResponse("API key required".to_string()))?;

        let request = OpenAiEmbeddingRequest {
            model: self.model.clone(),
            input: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.url.trim_end_matches('/')))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .map_err(EmbeddingError::Http)?
            .json::<OpenAiEmbeddingResponse>()
            .await?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::InvalidResponse("No embedding in response".to_string()))
    }

    async fn embed_with_fallback(
        &self,
        text: &str,
        primary_error: EmbeddingError,
    ) -> Result<Vec<f32>, EmbeddingError> {
        info!(
            "Primary embedding provider unavailable, falling back to {}/{}",
            self.fallback_url, self.fallback_model
        );

        match self
            .embed_ollama(&self.fallback_url, &self.fallback_model, text)
            .await
        {
            Ok(embedding) => {
                self.fallback_count.fetch_add(1, Ordering::SeqCst);
                Ok(embedding)
            }
            Err(fallback_error) => Err(EmbeddingError::BothFailed(
                primary_error.to_string(),
                fallback_error.to_string(),
            )),
        }
    }
}

#[async_trait]
impl Embedder for EmbeddingGenerator {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyText);
        }

        let key = self.cache_key(text);
        if let Some(cached) = self.cache_get(&key) {
            debug!("Embedding cache HIT: {}", crate::safe_truncate(text, 40));
            return Ok(cached);
        }

        let result = match self.provider.as_str() {
            "ollama" => self.embed_ollama(&self.url, &self.model, text).await,
            "openai" | "groq" => self.embed_openai(text).await,
            other => Err(EmbeddingError::NotImplemented(other.to_string())),
        };

        let embedding = match result {
            Ok(embedding) => embedding,
            Err(e) if self.fallback_enabled && self.provider != "ollama" => {
                warn!("Embedding failed: {}", e);
                self.embed_with_fallback(text, e).await?
            }
            Err(e) => return Err(e),
        };

        self.cache_put(key, embedding.clone());
        Ok(embedding)
    }
}
