use crate::document::{parse_timestamp, MessageMetadata};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentNameError {
    #[error("timestamp {0:?} is neither epoch milliseconds nor RFC 3339")]
    InvalidTimestamp(String),
}

/// Deterministic, filesystem-safe document name: `{YYYY-MM-DD}-{message_id}.md`.
///
/// The date is the UTC day of the message timestamp.
pub fn document_filename(metadata: &MessageMetadata) -> Result<String, DocumentNameError> {
    let date = parse_timestamp(&metadata.timestamp)
        .ok_or_else(|| DocumentNameError::InvalidTimestamp(metadata.timestamp.clone()))?;
    let id = sanitize_component(&metadata.message_id);
    Ok(format!("{}-{id}.md", date.format("%Y-%m-%d")))
}

fn sanitize_component(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]);
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned.to_string()
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}
