use crate::retrieval::CandidateResult;

pub const SYSTEM_PROMPT: &str = "You are an expert search result ranker. Given the original user \
query and a list of search results, your task is to rank the results based on their relevance to \
the query. The most relevant results should be ranked highest followed by less relevant ones.";

const RULES: &str = "In your response, just share the re-ranked list (array) of product IDs in \
order of relevance, and say nothing else. For example: [ID1, ID2, ID3, ID4]
- No markdown
- No code blocks or JSON blocks
- No additional text
- No explanations
- No creation of new product IDs
- Do not remove any product ID from the provided list; return all of them in the new order.
- When relevance is comparable, group results of the same brand together.
- Relevance is the only ranking criterion. Most relevant result on top and the rest to follow.";

/// One line per candidate: id, name and category path.
pub fn candidate_line(candidate: &CandidateResult) -> String {
    format!(
        "ID: {} | Name: {} | Category Hierarchy: {}",
        candidate.product_id,
        candidate.name,
        candidate.hierarchy.path()
    )
}

/// User message for one rerank request.
pub fn build_prompt(query: &str, candidates: &[CandidateResult]) -> String {
    let listing = candidates
        .iter()
        .map(candidate_line)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Here is the user's original query: {}\n\n\
         Here is the list of search results to be ranked:\n{}\n\n{}",
        query, listing, RULES
    )
}
