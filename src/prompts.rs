//! Prompts for the table reorganizer.
//!
//! Kept in one place so the wording can be inspected by tests and changed
//! without touching the call and error-handling code in
//! [`crate::pipeline::reorganize`].

/// System instruction sent with every reorganisation request.
pub const TABLE_SYSTEM_PROMPT: &str = "You are a data extraction specialist. Extract raw table data and preserve it in clean, structured table formats. Maintain data integrity and original values exactly as they appear.";

/// Instruction placed before the document in the user turn.
const TABLE_INSTRUCTIONS: &str = r#"Extract and organize ALL tables from this document. For each table:

1. Preserve the exact raw data values (no summarization or modification)
2. Maintain the original column headers
3. Keep all rows of data
4. Format as clean markdown tables

Output format:
- Label each table clearly (e.g., "Table 1: [Original Table Title if available]")
- Present tables in the order they appear
- Include ALL numeric values exactly as shown
- Preserve dates in their original format
- Keep any reference numbers, transaction IDs, or codes intact

Do not summarize, analyze, or omit any data. I need the complete raw data from every table in the document."#;

/// Build the user message for one document.
pub fn table_extraction_request(markdown: &str) -> String {
    format!("{TABLE_INSTRUCTIONS}\n\n{markdown}")
}
