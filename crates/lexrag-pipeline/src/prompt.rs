//! Grounded answer prompt.
//!
//! The prompt fences the model in: the reference fragment may only clarify
//! terminology, the ranked articles are the sole factual basis, and every
//! claim must cite an article id. Answer language and the "not found"
//! sentence follow the detected direction of the query.

use lexrag_core::lang::detect_direction;
use lexrag_core::types::RankedHit;

const RULE: &str = "--------------------------------------------------";

/// Formats ranked hits as citation blocks, in rerank order.
pub fn citation_blocks(hits: &[RankedHit]) -> String {
    hits.iter()
        .map(|h| format!("[Article {}]: {}\n\n", h.fragment_id, h.content))
        .collect()
}

/// Assembles the answer prompt. Pure and deterministic.
pub fn build_prompt(query: &str, hits: &[RankedHit], reference: &str) -> String {
    let direction = detect_direction(query);
    let language = direction.language_name();
    let sentinel = direction.not_found_sentinel();

    let mut prompt = String::new();
    prompt.push_str("### ROLE\n");
    prompt.push_str("You are an expert legal assistant specializing in labor law.\n");
    prompt.push_str("Answer the user's query strictly from the provided context.\n\n");

    prompt.push_str("### REFERENCE DEFINITIONS\n");
    prompt.push_str("Official definitions of the legal terms used in this law. Use them only to\n");
    prompt.push_str("interpret terminology such as \"Worker\", \"Employer\" or \"Wage\"; they are not a source of answers.\n");
    prompt.push_str(&format!("{RULE}\n{reference}\n{RULE}\n\n"));

    prompt.push_str("### RELEVANT ARTICLES\n");
    prompt.push_str("The legal articles retrieved for this query.\n");
    prompt.push_str(&format!("{RULE}\n{}{RULE}\n\n", citation_blocks(hits)));

    prompt.push_str("### USER QUERY\n");
    prompt.push_str(query);
    prompt.push_str("\n\n");

    prompt.push_str("### INSTRUCTIONS\n");
    prompt.push_str("1. Terminology: consult the Reference Definitions only to interpret key terms.\n");
    prompt.push_str("2. Grounding: answer using only the information in the Relevant Articles.\n");
    prompt.push_str("3. Citations: end every claim with the article id in brackets, e.g. [Article 12].\n");
    prompt.push_str(&format!("4. Language: answer in the same language as the query ({language}).\n"));
    prompt.push_str(&format!(
        "5. Unknowns: if the answer is not in the Relevant Articles, reply exactly: \"{sentinel}\" Do not invent content.\n"
    ));
    prompt.push_str("6. Scope: politely decline queries unrelated to labor law.\n");
    prompt.push_str("Use clear sections and bullet points where they help readability; keep a precise, professional tone.\n\n");

    prompt.push_str("### ANSWER\n");
    prompt
}
