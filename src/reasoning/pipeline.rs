use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::BairroConfig;
use crate::core::error::{BairroError, Result};
use crate::graph::GraphSnapshot;
use crate::llm::embeddings::Embedder;
use crate::llm::synthesizer::{SynthesisError, Synthesizer};
use super::aggregator::ContextAggregator;
use super::linker::EntityLinker;
use super::models::{ContextBlock, Navigation, Question, ReasoningPath, RouteKind, RouteOutcome, StructuredAnswer};
use super::navigator::GraphNavigator;
use super::router::{RoutedQuestion, Router};
use super::scorer::RelevanceScorer;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Structured query failed: {0}")]
    Query(String),

    #[error("Agent unreachable: {0}")]
    Unavailable(String),
}

/// The direct-query collaborator: translates a question straight into a
/// graph query and executes it. `Ok(None)` means NoMatch.
#[async_trait]
pub trait StructuredQueryAgent: Send + Sync {
    async fn execute(&self, question: &str) -> std::result::Result<Option<StructuredAnswer>, AgentError>;
}

/// End-to-end question answering over one immutable snapshot.
///
/// The pipeline owns the deterministic core (router, linker, navigator,
/// aggregator) and borrows the three injected capabilities: embedding,
/// structured query and synthesis. `answer` never returns an error; every
/// failure mode degrades to a well-formed [`RouteOutcome::Insufficient`].
pub struct ReasoningPipeline {
    router: Router,
    linker: EntityLinker,
    navigator: GraphNavigator,
    aggregator: ContextAggregator,
    embedder: Arc<dyn Embedder>,
    agent: Arc<dyn StructuredQueryAgent>,
    synthesizer: Arc<dyn Synthesizer>,
}

impl ReasoningPipeline {
    pub fn new(
        snapshot: Arc<GraphSnapshot>,
        config: &BairroConfig,
        embedder: Arc<dyn Embedder>,
        agent: Arc<dyn StructuredQueryAgent>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        Self {
            router: Router::new(),
            linker: EntityLinker::new(Arc::clone(&snapshot)),
            navigator: GraphNavigator::new(
                Arc::clone(&snapshot),
                RelevanceScorer::new(config.scorer.clone()),
                config.navigator.clone(),
            ),
            aggregator: ContextAggregator::new(snapshot, config.aggregator.clone()),
            embedder,
            agent,
            synthesizer,
        }
    }

    /// Classify a question without executing anything.
    pub fn route(&self, text: &str) -> RoutedQuestion {
        self.router.route(text)
    }

    /// Seed, embed and traverse: the exploratory half on its own, for
    /// callers that want ranked paths rather than prose.
    pub async fn navigate(&self, text: &str) -> Result<Navigation> {
        let routed = self.router.route(text);
        let seeds = self.linker.link(&routed.question)?;
        let embedding = self.embed_with_retry(&routed.question.text).await?;
        self.navigator.navigate(&seeds, &embedding, routed.question.intent)
    }

    /// Merge ranked paths into deduplicated context blocks.
    pub fn aggregate(&self, paths: &[ReasoningPath]) -> Vec<ContextBlock> {
        self.aggregator.aggregate(paths)
    }

    /// Answer a question, choosing the direct or exploratory route.
    pub async fn answer(&self, text: &str) -> RouteOutcome {
        let session = Uuid::new_v4();
        let routed = self.router.route(text);
        info!(
            "[{}] Answering ({:?}/{:?}): {}",
            session,
            routed.kind,
            routed.question.intent,
            crate::safe_truncate(text, 80)
        );

        match routed.kind {
            RouteKind::Direct => match self.direct_with_retry(text).await {
                Ok(Some(answer)) => RouteOutcome::Direct { answer },
                Ok(None) => {
                    debug!("[{}] Direct lookup found no match, trying exploratory", session);
                    self.exploratory(&routed.question).await
                }
                Err(e) => self.insufficient(&routed.question, e.to_string(), vec![]),
            },
            RouteKind::Exploratory => self.exploratory(&routed.question).await,
        }
    }

    async fn exploratory(&self, question: &Question) -> RouteOutcome {
        let seeds = match self.linker.link(question) {
            Ok(seeds) => seeds,
            Err(BairroError::NoCandidates(_)) => {
                // No seed to traverse from; the structured agent gets one
                // shot before we give up.
                info!("No seed candidates, falling back to direct lookup");
                return match self.direct_with_retry(&question.text).await {
                    Ok(Some(answer)) => RouteOutcome::Direct { answer },
                    Ok(None) => self.insufficient(
                        question,
                        "no entities recognized and direct lookup found nothing".to_string(),
                        vec![],
                    ),
                    Err(e) => self.insufficient(question, e.to_string(), vec![]),
                };
            }
            Err(e) => return self.insufficient(question, e.to_string(), vec![]),
        };

        let embedding = match self.embed_with_retry(&question.text).await {
            Ok(embedding) => embedding,
            Err(e) => return self.insufficient(question, e.to_string(), vec![]),
        };

        let navigation = match self.navigator.navigate(&seeds, &embedding, question.intent) {
            Ok(navigation) => navigation,
            Err(e) => return self.insufficient(question, e.to_string(), vec![]),
        };

        if navigation.paths.is_empty() {
            return self.insufficient(
                question,
                "no qualifying evidence above the score threshold".to_string(),
                vec![],
            );
        }

        let blocks = self.aggregator.aggregate(&navigation.paths);
        if blocks.is_empty() {
            return self.insufficient(
                question,
                "traversal produced no usable evidence".to_string(),
                navigation.paths,
            );
        }

        match self.synthesize_with_retry(&question.text, &blocks).await {
            Ok(answer) => RouteOutcome::Exploratory {
                answer,
                blocks,
                paths: navigation.paths,
            },
            Err(e) => self.insufficient(question, e.to_string(), navigation.paths),
        }
    }

    fn insufficient(
        &self,
        question: &Question,
        reason: String,
        partial_paths: Vec<ReasoningPath>,
    ) -> RouteOutcome {
        warn!(
            "Insufficient answer for '{}': {} ({} partial path(s))",
            crate::safe_truncate(&question.text, 60),
            reason,
            partial_paths.len()
        );
        RouteOutcome::Insufficient {
            question: question.text.clone(),
            reason,
            partial_paths,
        }
    }

    async fn embed_with_retry(&self, text: &str) -> Result<Vec<f32>> {
        match self.embedder.embed(text).await {
            Ok(embedding) => Ok(embedding),
            Err(first) => {
                let first = BairroError::from(first);
                if !first.is_retryable() {
                    return Err(first);
                }
                warn!("Embedding failed, retrying once: {}", first);
                self.embedder
                    .embed(text)
                    .await
                    .map_err(|e| BairroError::Upstream(format!("embedding: {}", e)))
            }
        }
    }

    async fn direct_with_retry(
        &self,
        text: &str,
    ) -> std::result::Result<Option<StructuredAnswer>, AgentError> {
        match self.agent.execute(text).await {
            Err(AgentError::Unavailable(first)) => {
                warn!("Structured agent unavailable, retrying once: {}", first);
                self.agent.execute(text).await
            }
            other => other,
        }
    }

    async fn synthesize_with_retry(
        &self,
        text: &str,
        blocks: &[ContextBlock],
    ) -> Result<String> {
        match self.synthesizer.synthesize(text, blocks).await {
            Ok(answer) => Ok(answer),
            Err(SynthesisError::Generation(first)) => {
                let first = BairroError::from(first);
                if !first.is_retryable() {
                    return Err(first);
                }
                warn!("Synthesis failed, retrying once: {}", first);
                self.synthesizer
                    .synthesize(text, blocks)
                    .await
                    .map_err(|e| BairroError::Upstream(format!("synthesis: {}", e)))
            }
        }
    }
}
