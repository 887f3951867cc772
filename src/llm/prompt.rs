use crate::reasoning::models::ContextBlock;

pub const SYNTHESIS_SYSTEM_PROMPT: &str = "\
You are an assistant answering questions about a city's neighborhoods, \
places, roads and reviews. Answer using ONLY the numbered evidence blocks \
provided. If the evidence is not enough to answer, say so plainly. Keep \
the answer short and cite block numbers like [1].";

/// Assemble the user prompt from the question and its evidence blocks.
pub fn build_synthesis_prompt(question: &str, blocks: &[ContextBlock]) -> String {
    let mut prompt = String::with_capacity(256);
    prompt.push_str("Question: ");
    prompt.push_str(question);
    prompt.push_str("\n\nEvidence:\n");

    for (i, block) in blocks.iter().enumerate() {
        prompt.push_str(&format!(
            "[{}] (relevance {:.2}) {}\n",
            i + 1,
            block.score,
            block.text
        ));
    }

    prompt.push_str("\nAnswer:");
    prompt
}
