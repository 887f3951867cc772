use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::core::config::AggregatorConfig;
use crate::graph::{GraphSnapshot, Node};
use crate::utils::safe_truncate_ellipsis;
use super::models::{ContextBlock, ReasoningPath};

/// Merges ranked paths into deduplicated, score-ordered context blocks.
///
/// Pure function of its inputs: no external calls, no mutation of the
/// snapshot. Seed (hop-0) nodes are skipped; they are the question's own
/// entities, not evidence for answering it.
pub struct ContextAggregator {
    snapshot: Arc<GraphSnapshot>,
    config: AggregatorConfig,
}

impl ContextAggregator {
    pub fn new(snapshot: Arc<GraphSnapshot>, config: AggregatorConfig) -> Self {
        Self { snapshot, config }
    }

    pub fn aggregate(&self, paths: &[ReasoningPath]) -> Vec<ContextBlock> {
        // One block per node id, keeping the highest score encountered
        // across all paths that visit it.
        let mut best: HashMap<String, f64> = HashMap::new();
        for path in paths {
            for step in path.steps.iter().skip(1) {
                let entry = best.entry(step.node_id.clone()).or_insert(step.score);
                if step.score > *entry {
                    *entry = step.score;
                }
            }
        }

        let mut blocks: Vec<ContextBlock> = best
            .into_iter()
            .filter_map(|(node_id, score)| {
                let node = self.snapshot.node(&node_id)?;
                Some(ContextBlock {
                    text: self.render(node),
                    node_id,
                    score,
                })
            })
            .collect();

        blocks.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.node_id.cmp(&b.node_id))
        });

        if blocks.len() > self.config.max_context_size {
            debug!(
                "Context overflow: dropping {} lowest-scoring block(s)",
                blocks.len() - self.config.max_context_size
            );
            blocks.truncate(self.config.max_context_size);
        }

        blocks
    }

    /// Review nodes render their (truncated) text; everything else gets a
    /// templated attribute summary.
    fn render(&self, node: &Node) -> String {
        if node.node_type.is_leaf() {
            let text = node
                .attrs
                .get("text")
                .map(|v| v.to_string())
                .unwrap_or_default();
            return format!(
                "Review: \"{}\"",
                safe_truncate_ellipsis(&text, self.config.max_review_chars)
            );
        }

        let name = node.name().unwrap_or(&node.id);
        let mut extra: Vec<String> = node
            .attrs
            .iter()
            .filter(|(k, _)| k.as_str() != "name")
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect();
        extra.sort();

        if extra.is_empty() {
            format!("{} '{}'", node.node_type, name)
        } else {
            format!("{} '{}' ({})", node.node_type, name, extra.join(", "))
        }
    }
}
