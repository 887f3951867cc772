use serde::{Deserialize, Serialize};
use tracing::debug;

use super::models::{Question, QuestionIntent, RouteKind};
use super::patterns;

/// A question with its routing decision attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutedQuestion {
    pub question: Question,
    pub kind: RouteKind,
}

/// Lexical question classifier.
///
/// Exploratory cues win over direct cues: a comparison or opinion
/// question that also mentions an attribute still needs traversal, and
/// when neither side fires we deliberately prefer the richer, slower
/// exploratory answer over a possibly wrong direct one.
#[derive(Debug, Default)]
pub struct Router;

impl Router {
    pub fn new() -> Self {
        Self
    }

    pub fn route(&self, text: &str) -> RoutedQuestion {
        let question = self.analyze(text);

        let exploratory = patterns::EXPLORATORY_CUES.iter().any(|re| re.is_match(text));
        let direct = patterns::DIRECT_CUES.iter().any(|re| re.is_match(text));

        let kind = if exploratory {
            RouteKind::Exploratory
        } else if direct {
            RouteKind::Direct
        } else {
            RouteKind::Exploratory
        };

        debug!(
            "Routed question (kind={:?}, intent={:?}): {}",
            kind,
            question.intent,
            crate::safe_truncate(text, 80)
        );

        RoutedQuestion { question, kind }
    }

    fn analyze(&self, text: &str) -> Question {
        let intent = if patterns::OPINION_CUES.is_match(text) {
            QuestionIntent::Opinion
        } else if patterns::PROXIMITY_CUES.is_match(text) {
            QuestionIntent::Proximity
        } else if patterns::FACTUAL_CUES.is_match(text) {
            QuestionIntent::Factual
        } else {
            QuestionIntent::General
        };

        let tokens: Vec<String> = text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.len() > 1 && !patterns::is_stopword(t))
            .map(str::to_string)
            .collect();

        Question {
            text: text.to_string(),
            intent,
            tokens,
        }
    }
}
