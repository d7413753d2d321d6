//! Instruction building for the extraction service

use crate::schema::FieldSchema;

/// System message sent with every extraction request
pub const SYSTEM_PROMPT: &str = "You are a document analysis assistant. \
    Extract the requested facts from the supplied document and return them \
    as a single JSON object. Return JSON only, with no commentary.";

/// Build the per-segment instruction embedding the field schema and the text
pub fn build_prompt(schema: &FieldSchema, text: &str) -> String {
    let mut prompt = String::with_capacity(text.len() + 1024);

    prompt.push_str(&format!(
        "You are analyzing a {}. Extract ONLY facts that are explicitly \
         stated in the document.\n\n",
        schema.doc_label
    ));

    prompt.push_str("=== DOCUMENT ===\n");
    prompt.push_str(text);
    prompt.push_str("\n=== END DOCUMENT ===\n\n");

    prompt.push_str("=== REQUESTED FIELDS ===\n");
    prompt.push_str(&schema.render());
    prompt.push('\n');

    prompt.push_str(
        "=== RULES ===\n\
         1. Use the field names above verbatim as JSON keys.\n\
         2. A fact that is not in the document is null. Never guess.\n\
         3. Numbers are JSON numbers, booleans are true/false, not strings.\n\
         4. Return exactly one JSON object.\n",
    );

    prompt
}
