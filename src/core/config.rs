use serde::{Deserialize, Serialize};

/// Top-level runtime configuration: embedding/LLM providers plus the
/// reasoning knobs. Everything has a sensible local default so the crate
/// runs against a stock Ollama with zero environment setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BairroConfig {
    pub embedding_provider: String,
    pub embedding_model: String,
    pub embedding_url: String,
    pub embedding_api_key: Option<String>,

    pub embedding_fallback_enabled: bool,
    pub embedding_fallback_url: String,
    pub embedding_fallback_model: String,

    pub llm_provider: String,
    pub llm_model: String,
    pub llm_url: String,
    pub llm_api_key: Option<String>,
    pub llm_temperature: f64,

    pub timeout_secs: u64,
    pub cache_size: usize,
    pub cache_ttl_secs: u64,

    pub navigator: NavigatorConfig,
    pub scorer: ScorerConfig,
    pub aggregator: AggregatorConfig,
}

impl BairroConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(provider) = std::env::var("BAIRRO_EMBEDDING_PROVIDER") {
            config.embedding_provider = provider;
        }
        if let Ok(model) = std::env::var("BAIRRO_EMBEDDING_MODEL") {
            config.embedding_model = model;
        }
        if let Ok(url) = std::env::var("BAIRRO_EMBEDDING_URL") {
            config.embedding_url = url;
        }
        if let Ok(key) = std::env::var("BAIRRO_EMBEDDING_API_KEY") {
            config.embedding_api_key = Some(key);
        }
        if let Ok(provider) = std::env::var("BAIRRO_LLM_PROVIDER") {
            config.llm_provider = provider;
        }
        if let Ok(model) = std::env::var("BAIRRO_LLM_MODEL") {
            config.llm_model = model;
        }
        if let Ok(url) = std::env::var("BAIRRO_LLM_URL") {
            config.llm_url = url;
        }
        if let Ok(key) = std::env::var("BAIRRO_LLM_API_KEY") {
            config.llm_api_key = Some(key);
        }
        if let Ok(depth) = std::env::var("BAIRRO_MAX_DEPTH") {
            if let Ok(depth) = depth.parse() {
                config.navigator.max_depth = depth;
            }
        }
        if let Ok(beam) = std::env::var("BAIRRO_BEAM_WIDTH") {
            if let Ok(beam) = beam.parse() {
                config.navigator.beam_width = beam;
            }
        }

        config
    }
}

impl Default for BairroConfig {
    fn default() -> Self {
        Self {
            embedding_provider: "ollama".to_string(),
            embedding_model: crate::DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_url: crate::DEFAULT_OLLAMA_URL.to_string(),
            embedding_api_key: None,

            embedding_fallback_enabled: true,
            embedding_fallback_url: crate::DEFAULT_OLLAMA_URL.to_string(),
            embedding_fallback_model: crate::DEFAULT_EMBEDDING_MODEL.to_string(),

            llm_provider: "ollama".to_string(),
            llm_model: crate::DEFAULT_LLM_MODEL.to_string(),
            llm_url: crate::DEFAULT_OLLAMA_URL.to_string(),
            llm_api_key: None,
            llm_temperature: 0.3,

            timeout_secs: 30,
            cache_size: crate::DEFAULT_CACHE_SIZE,
            cache_ttl_secs: crate::DEFAULT_CACHE_TTL,

            navigator: NavigatorConfig::default(),
            scorer: ScorerConfig::default(),
            aggregator: AggregatorConfig::default(),
        }
    }
}

/// Bounds for the best-first traversal. Every field is a hard budget;
/// together they guarantee the search terminates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigatorConfig {
    pub max_depth: usize,
    pub beam_width: usize,
    pub max_nodes_expanded: usize,
    pub min_score_threshold: f64,
    /// Wall-clock cap layered on top of the deterministic budgets.
    /// In-flight expansion is abandoned and the best paths found so far
    /// are returned.
    pub timeout_ms: Option<u64>,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            beam_width: 8,
            max_nodes_expanded: 200,
            min_score_threshold: 0.15,
            timeout_ms: None,
        }
    }
}

impl NavigatorConfig {
    pub fn from_mode(mode: &str) -> Self {
        match mode {
            "fast" => Self {
                max_depth: 2,
                beam_width: 4,
                max_nodes_expanded: 60,
                min_score_threshold: 0.25,
                ..Default::default()
            },
            "deep" => Self {
                max_depth: 4,
                beam_width: 12,
                max_nodes_expanded: 500,
                min_score_threshold: 0.1,
                ..Default::default()
            },
            _ => Self::default(),
        }
    }
}

/// Weights for fusing semantic similarity with edge-type priors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    pub semantic_weight: f64,
    pub edge_weight: f64,
    /// Per-hop multiplicative decay, `score *= decay^hop`.
    pub hop_decay: f64,
    /// Share of the parent path score carried into an extended path.
    pub path_carry: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            semantic_weight: 0.6,
            edge_weight: 0.4,
            hop_decay: 0.85,
            path_carry: 0.3,
        }
    }
}

/// Limits for context assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    pub max_context_size: usize,
    pub max_review_chars: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_context_size: 12,
            max_review_chars: 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_navigator_bounds() {
        let config = NavigatorConfig::default();
        assert_eq!(config.max_depth, 3);
        assert!(config.beam_width > 0);
        assert!(config.max_nodes_expanded > 0);
    }

    #[test]
    fn test_mode_presets() {
        let fast = NavigatorConfig::from_mode("fast");
        let deep = NavigatorConfig::from_mode("deep");
        assert!(fast.max_nodes_expanded < deep.max_nodes_expanded);
        assert!(fast.max_depth < deep.max_depth);

        let unknown = NavigatorConfig::from_mode("whatever");
        assert_eq!(unknown.max_depth, NavigatorConfig::default().max_depth);
    }

    #[test]
    fn test_scorer_weights_sum_to_one() {
        let config = ScorerConfig::default();
        assert!((config.semantic_weight + config.edge_weight - 1.0).abs() < 1e-9);
    }
}
