pub mod aggregator;
pub mod linker;
pub mod models;
pub mod navigator;
pub mod patterns;
pub mod pipeline;
pub mod router;
pub mod scorer;

pub use aggregator::ContextAggregator;
pub use linker::EntityLinker;
pub use models::{
    ContextBlock, Navigation, PathStep, Question, QuestionIntent, ReasoningPath, RouteKind,
    RouteOutcome, SeedCandidate, StructuredAnswer,
};
pub use navigator::GraphNavigator;
pub use pipeline::{AgentError, ReasoningPipeline, StructuredQueryAgent};
pub use router::{RoutedQuestion, Router};
pub use scorer::{cosine_similarity, RelevanceScorer};
