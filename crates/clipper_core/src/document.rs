use chrono::{DateTime, SecondsFormat, Utc};

use crate::content::{Content, Source, UnknownSource};

const DELIMITER: &str = "---";
const TAG_SEPARATOR: &str = ", ";

/// Message data that ends up in the front-matter next to the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageMetadata {
    pub timestamp: String,
    pub message_id: String,
}

impl MessageMetadata {
    pub fn new(timestamp: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            message_id: message_id.into(),
        }
    }
}

/// Parse a message timestamp: decimal epoch milliseconds or RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        let millis: i64 = raw.parse().ok()?;
        return DateTime::from_timestamp_millis(millis);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// ISO-8601 UTC with millisecond precision, or the raw value if unparseable.
pub fn iso_date(timestamp: &str) -> String {
    match parse_timestamp(timestamp) {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => timestamp.to_string(),
    }
}

/// Render the front-matter block followed by a blank line and the verbatim body.
pub fn assemble_document(content: &Content, metadata: &MessageMetadata) -> String {
    let mut lines = vec![
        DELIMITER.to_string(),
        field("title", content.title()),
        field("date", &iso_date(&metadata.timestamp)),
        field("source", content.source().as_str()),
        field("messageId", &metadata.message_id),
    ];
    if let Some(url) = content.url() {
        lines.push(field("url", url));
    }
    lines.push(field("tags", &content.tags().join(TAG_SEPARATOR)));
    lines.push(DELIMITER.to_string());
    lines.push(String::new());
    lines.push(content.content().to_string());
    lines.join("\n")
}

fn field(key: &str, value: &str) -> String {
    format!("{key}: {}", encode_value(value))
}

// Keeps the block one line per key: anything that would not survive a
// plain `key: value` read is written as a JSON string.
fn encode_value(value: &str) -> String {
    let needs_quotes =
        value.contains(['\n', '\r']) || value.starts_with('"') || value.trim() != value;
    if needs_quotes {
        serde_json::Value::String(value.to_string()).to_string()
    } else {
        value.to_string()
    }
}

fn decode_value(key: &str, raw: &str) -> Result<String, FrontMatterError> {
    if raw.starts_with('"') {
        serde_json::from_str(raw).map_err(|err| FrontMatterError::InvalidValue {
            key: key.to_string(),
            message: err.to_string(),
        })
    } else {
        Ok(raw.to_string())
    }
}

/// Fields recovered from an assembled document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub date: String,
    pub source: Source,
    pub message_id: String,
    pub url: Option<String>,
    pub tags: Vec<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrontMatterError {
    #[error("document does not start with a front-matter block")]
    MissingOpening,
    #[error("front-matter block is not closed")]
    Unterminated,
    #[error("malformed front-matter line {0:?}")]
    MalformedLine(String),
    #[error("front-matter is missing required key {0}")]
    MissingKey(&'static str),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
    #[error(transparent)]
    Source(#[from] UnknownSource),
}

/// Read back a document produced by [`assemble_document`].
pub fn parse_front_matter(document: &str) -> Result<FrontMatter, FrontMatterError> {
    let rest = document
        .strip_prefix("---\n")
        .ok_or(FrontMatterError::MissingOpening)?;

    let mut title = None;
    let mut date = None;
    let mut source = None;
    let mut message_id = None;
    let mut url = None;
    let mut tags = None;

    let mut offset = 0;
    let body_start = loop {
        let line_end = rest[offset..].find('\n').map(|idx| offset + idx);
        let line = &rest[offset..line_end.unwrap_or(rest.len())];
        if line == DELIMITER {
            break line_end.map_or(rest.len(), |end| end + 1);
        }
        let Some(end) = line_end else {
            return Err(FrontMatterError::Unterminated);
        };

        let (key, raw) = line
            .split_once(':')
            .ok_or_else(|| FrontMatterError::MalformedLine(line.to_string()))?;
        let raw = raw.strip_prefix(' ').unwrap_or(raw);
        let value = decode_value(key, raw)?;
        match key {
            "title" => title = Some(value),
            "date" => date = Some(value),
            "source" => source = Some(value.parse::<Source>()?),
            "messageId" => message_id = Some(value),
            "url" => url = Some(value),
            "tags" => tags = Some(split_tags(&value)),
            _ => {}
        }
        offset = end + 1;
    };

    let body = &rest[body_start..];
    let body = body.strip_prefix('\n').unwrap_or(body);

    Ok(FrontMatter {
        title: title.ok_or(FrontMatterError::MissingKey("title"))?,
        date: date.ok_or(FrontMatterError::MissingKey("date"))?,
        source: source.ok_or(FrontMatterError::MissingKey("source"))?,
        message_id: message_id.ok_or(FrontMatterError::MissingKey("messageId"))?,
        url,
        tags: tags.ok_or(FrontMatterError::MissingKey("tags"))?,
        body: body.to_string(),
    })
}

fn split_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
