use std::sync::Arc;

use async_trait::async_trait;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bairro::graph::{GraphSnapshot, NodeType};
use bairro::llm::{create_provider, EmbeddingGenerator, LlmSynthesizer};
use bairro::reasoning::{AgentError, StructuredAnswer, StructuredQueryAgent};
use bairro::{BairroConfig, ReasoningPipeline};

/// The diagnostic binary carries no structured-query backend; direct
/// questions fall through to the exploratory path.
struct NoDirectBackend;

#[async_trait]
impl StructuredQueryAgent for NoDirectBackend {
    async fn execute(&self, _question: &str) -> Result<Option<StructuredAnswer>, AgentError> {
        Ok(None)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bairro=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(snapshot_path), Some(question)) = (args.next(), args.next()) else {
        eprintln!("usage: ask <snapshot.json> \"<question>\"");
        std::process::exit(2);
    };

    let raw = std::fs::read_to_string(&snapshot_path)?;
    let snapshot: Arc<GraphSnapshot> = Arc::new(serde_json::from_str(&raw)?);
    eprintln!(
        "snapshot: {} nodes ({} neighborhoods, {} places, {} reviews), {} edges",
        snapshot.node_count(),
        snapshot.count_by_type(NodeType::Neighborhood),
        snapshot.count_by_type(NodeType::Place),
        snapshot.count_by_type(NodeType::Review),
        snapshot.edge_count(),
    );

    let config = BairroConfig::from_env();
    let embedder = Arc::new(EmbeddingGenerator::from_config(&config));
    let synthesizer = Arc::new(LlmSynthesizer::new(create_provider(&config)?));

    let pipeline = ReasoningPipeline::new(
        snapshot,
        &config,
        embedder,
        Arc::new(NoDirectBackend),
        synthesizer,
    );

    let routed = pipeline.route(&question);
    eprintln!("route: {:?}, intent: {:?}", routed.kind, routed.question.intent);

    let outcome = pipeline.answer(&question).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
